//! Owner of a bound album projection.
//!
//! Loads albums through the [`CollectionService`], applies events, and sends
//! every non-empty batch of [`ProjectionChange`]s to the view over a channel.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use super::{AlbumProjection, CollectionEvent, ProjectionChange, ProjectionEvent};
use crate::collection::{AlbumItem, AlbumOrder, CollectionService};
use crate::model::ticks;

/// Drives one [`AlbumProjection`].
///
/// Cheap to clone; clones share the projection.
#[derive(Clone)]
pub struct ProjectionController {
    service: CollectionService,
    state: Arc<Mutex<AlbumProjection>>,
    /// Bumped by every reload; a reload that finishes after a newer one started is dropped
    generation: Arc<AtomicU64>,
    changes_tx: mpsc::UnboundedSender<Vec<ProjectionChange>>,
}

impl ProjectionController {
    /// Create a controller and the receiver its change batches arrive on.
    pub fn new(
        service: CollectionService,
        order: AlbumOrder,
        love_only: bool,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<ProjectionChange>>) {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        let controller = Self {
            service,
            state: Arc::new(Mutex::new(AlbumProjection::new(order, love_only))),
            generation: Arc::new(AtomicU64::new(0)),
            changes_tx,
        };
        (controller, changes_rx)
    }

    /// Visible albums, in display order.
    pub fn visible(&self) -> Vec<AlbumItem> {
        self.state.lock().visible().cloned().collect()
    }

    pub fn order(&self) -> AlbumOrder {
        self.state.lock().order()
    }

    /// Load every visible album and rebuild the projection.
    ///
    /// Returns false when a newer reload started meanwhile; its result wins.
    pub async fn reload(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut albums = self.service.get_all_albums().await;
        let artwork = self.service.artwork_paths(None).await;
        for album in &mut albums {
            album.artwork_path = artwork.get(&album.album_key).cloned();
        }
        let order = self.order();
        let albums = self.service.order_albums(albums, order).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(target: "projection", generation, "Discarding superseded reload");
            return false;
        }

        let changes = self.state.lock().fill_ordered(albums, order);
        self.publish(changes);
        true
    }

    /// Apply an event to the projection.
    pub async fn handle(&self, event: CollectionEvent) {
        let event = match event {
            CollectionEvent::AlbumArtworkAdded(album_keys) => {
                ProjectionEvent::ArtworkChanged(self.service.artwork_paths(Some(&album_keys)).await)
            }
            CollectionEvent::PlaybackCountersChanged(counters) => {
                ProjectionEvent::PlaybackCountersChanged(counters)
            }
            CollectionEvent::AlbumLoveChanged {
                album_key,
                love,
                date_loved,
            } => ProjectionEvent::AlbumLoveChanged {
                album_key,
                love,
                date_loved,
            },
            CollectionEvent::SearchTextChanged(text) => ProjectionEvent::SearchTextChanged(text),
        };

        let changes = self.state.lock().reconcile(event);
        self.publish(changes);
    }

    /// Persist an album's love state, then reflect it in the view.
    ///
    /// Loving stamps the current time; unloving keeps the stored date.
    pub async fn set_album_love(&self, album_key: &str, love: bool) -> bool {
        let date_loved = love.then(ticks::now);
        let updated = self
            .service
            .repository()
            .update_album_love(album_key, love, date_loved)
            .await;

        if updated {
            self.handle(CollectionEvent::AlbumLoveChanged {
                album_key: album_key.to_string(),
                love,
                date_loved,
            })
            .await;
        }
        updated
    }

    /// Switch to the next album order.
    pub fn toggle_album_order(&self) -> AlbumOrder {
        let mut state = self.state.lock();
        let changes = state.toggle_album_order();
        let order = state.order();
        drop(state);

        tracing::debug!(target: "projection", %order, "Album order toggled");
        self.publish(changes);
        order
    }

    pub fn set_love_only(&self, love_only: bool) {
        let changes = self.state.lock().set_love_only(love_only);
        self.publish(changes);
    }

    fn publish(&self, changes: Vec<ProjectionChange>) {
        if changes.is_empty() {
            return;
        }
        if self.changes_tx.send(changes).is_err() {
            tracing::debug!(target: "projection", "View dropped its change receiver");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SqliteTrackRepository;
    use crate::model::PlaybackCounter;
    use crate::test_utils::{insert_album, insert_album_artwork, insert_visible_track, mock_track, temp_db};
    use sqlx::SqlitePool;

    async fn controller_with_albums(
        love_only: bool,
    ) -> (
        ProjectionController,
        mpsc::UnboundedReceiver<Vec<ProjectionChange>>,
        tempfile::TempDir,
        SqlitePool,
    ) {
        let (pool, dir) = temp_db().await;
        for (key, title) in [("k1", "Alpha"), ("k2", "Beta")] {
            insert_album(&pool, key, None, None).await;
            let mut track = mock_track(&format!("/music/{key}-1.mp3"), key);
            track.album_title = Some(title.to_string());
            insert_visible_track(&pool, &track).await;
            // Second track of the same album
            let mut track = mock_track(&format!("/music/{key}-2.mp3"), key);
            track.album_title = Some(title.to_string());
            insert_visible_track(&pool, &track).await;
        }
        insert_album_artwork(&pool, "k2", "art-2").await;

        let service = CollectionService::new(
            Arc::new(SqliteTrackRepository::new(pool.clone())),
            dir.path().join("artwork"),
        );
        let (controller, rx) = ProjectionController::new(service, AlbumOrder::Alphabetical, love_only);
        (controller, rx, dir, pool)
    }

    #[tokio::test]
    async fn test_reload_publishes_reset() {
        let (controller, mut rx, dir, _pool) = controller_with_albums(false).await;

        assert!(controller.reload().await);
        assert_eq!(rx.recv().await, Some(vec![ProjectionChange::Reset]));

        let visible = controller.visible();
        let keys: Vec<_> = visible.iter().map(|a| a.album_key.as_str()).collect();
        assert_eq!(keys, ["k1", "k2"]);
        assert_eq!(visible[1].artwork_path, Some(dir.path().join("artwork").join("art-2.jpg")));
    }

    #[tokio::test]
    async fn test_love_album_in_love_only_view_appears_once() {
        let (controller, mut rx, _dir, _pool) = controller_with_albums(true).await;
        controller.reload().await;
        rx.recv().await;
        assert!(controller.visible().is_empty());

        assert!(controller.set_album_love("k1", true).await);
        assert!(controller.set_album_love("k1", true).await);

        let keys: Vec<_> = controller.visible().into_iter().map(|a| a.album_key).collect();
        assert_eq!(keys, ["k1"]);

        // Persisted too
        let album = controller.service.repository().get_album("k1").await.unwrap();
        assert!(album.is_loved());
        assert!(album.date_album_loved.is_some());
    }

    #[tokio::test]
    async fn test_superseded_reload_is_discarded() {
        let (controller, mut rx, _dir, _pool) = controller_with_albums(false).await;

        let stale = controller.clone();
        let stale_reload = stale.reload();
        tokio::pin!(stale_reload);
        // Takes generation 1 and parks on the database
        assert!(futures::poll!(&mut stale_reload).is_pending());

        assert!(controller.reload().await);
        assert!(!stale_reload.await);

        // Only the winning reload published
        assert_eq!(rx.recv().await, Some(vec![ProjectionChange::Reset]));
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.visible().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_album_order_publishes() {
        let (controller, mut rx, _dir, _pool) = controller_with_albums(false).await;
        controller.reload().await;
        rx.recv().await;

        assert_eq!(controller.toggle_album_order(), AlbumOrder::ByDateAdded);
        assert_eq!(rx.recv().await, Some(vec![ProjectionChange::Reset]));
    }

    #[tokio::test]
    async fn test_artwork_added_resolves_paths_for_those_albums() {
        let (controller, mut rx, dir, pool) = controller_with_albums(false).await;
        controller.reload().await;
        rx.recv().await;

        insert_album_artwork(&pool, "k1", "art-1").await;
        controller
            .handle(CollectionEvent::AlbumArtworkAdded(vec!["k1".to_string()]))
            .await;

        assert_eq!(
            rx.recv().await,
            Some(vec![ProjectionChange::Update {
                album_key: "k1".to_string()
            }])
        );
        let visible = controller.visible();
        assert_eq!(visible[0].artwork_path, Some(dir.path().join("artwork").join("art-1.jpg")));
        assert_eq!(visible[1].artwork_path, Some(dir.path().join("artwork").join("art-2.jpg")));
    }

    #[tokio::test]
    async fn test_playback_counters_update_album_in_place() {
        let (controller, mut rx, _dir, _pool) = controller_with_albums(false).await;
        controller.reload().await;
        rx.recv().await;

        let counter = PlaybackCounter {
            album_key: Some("k2".to_string()),
            date_last_played: Some(99),
            play_count_incremented: true,
            ..Default::default()
        };
        controller
            .handle(CollectionEvent::PlaybackCountersChanged(vec![counter]))
            .await;

        // Alphabetical order: updated, not moved
        assert_eq!(
            rx.recv().await,
            Some(vec![ProjectionChange::Update {
                album_key: "k2".to_string()
            }])
        );
        let visible = controller.visible();
        assert_eq!(visible[1].album_key, "k2");
        assert_eq!(visible[1].date_last_played, Some(99));

        // Unknown album: nothing published
        let unknown = PlaybackCounter {
            album_key: Some("missing".to_string()),
            ..Default::default()
        };
        controller
            .handle(CollectionEvent::PlaybackCountersChanged(vec![unknown]))
            .await;
        assert!(rx.try_recv().is_err());
    }
}
