//! Album listings for collection views.
//!
//! Turns repository aggregates into [`AlbumItem`]s, orders them and resolves
//! their cached artwork.
//!
//! # Example
//!
//! ```ignore
//! use music_collection::collection::{AlbumOrder, CollectionService};
//!
//! let service = CollectionService::new(repo, artwork_dir);
//! let albums = service.get_all_albums().await;
//! let albums = service.order_albums(albums, AlbumOrder::ByYearDescending).await;
//! ```

mod item;
mod order;
mod sortable;

pub use item::{AlbumItem, search_terms};
pub use order::{AlbumOrder, compare, order_albums};
pub use sortable::to_sortable;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::model::{AlbumData, ArtistType};
use crate::repository::TrackRepository;

/// Album listings over a [`TrackRepository`].
#[derive(Clone)]
pub struct CollectionService {
    repository: Arc<dyn TrackRepository>,
    artwork_cache_dir: PathBuf,
}

impl CollectionService {
    pub fn new(repository: Arc<dyn TrackRepository>, artwork_cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            artwork_cache_dir: artwork_cache_dir.into(),
        }
    }

    pub fn repository(&self) -> &Arc<dyn TrackRepository> {
        &self.repository
    }

    /// Every visible album, unordered.
    pub async fn get_all_albums(&self) -> Vec<AlbumItem> {
        to_items(self.repository.get_all_album_data().await)
    }

    /// Visible albums of the given artists; all albums when `artists` is empty.
    pub async fn get_artist_albums(
        &self,
        artists: &[String],
        artist_type: ArtistType,
    ) -> Vec<AlbumItem> {
        to_items(
            self.repository
                .get_artist_album_data(artists, artist_type)
                .await,
        )
    }

    /// Visible albums in the given genres; all albums when `genres` is empty.
    pub async fn get_genre_albums(&self, genres: &[String]) -> Vec<AlbumItem> {
        to_items(self.repository.get_genre_album_data(genres).await)
    }

    /// Order albums on a blocking thread.
    pub async fn order_albums(&self, mut albums: Vec<AlbumItem>, order: AlbumOrder) -> Vec<AlbumItem> {
        let count = albums.len();
        match tokio::task::spawn_blocking(move || {
            order_albums(&mut albums, order);
            albums
        })
        .await
        {
            Ok(albums) => albums,
            Err(e) => {
                tracing::error!(target: "collection", count, error = %e, "Ordering albums failed");
                Vec::new()
            }
        }
    }

    /// Where the cached artwork with this id lives.
    pub fn artwork_path(&self, artwork_id: &str) -> PathBuf {
        artwork_file(&self.artwork_cache_dir, artwork_id)
    }

    /// Artwork paths per album key, limited to `album_keys` when given.
    pub async fn artwork_paths(&self, album_keys: Option<&[String]>) -> HashMap<String, PathBuf> {
        let mut paths = HashMap::new();
        for artwork in self.repository.get_album_artwork().await {
            if album_keys.is_some_and(|keys| !keys.contains(&artwork.album_key)) {
                continue;
            }
            paths
                .entry(artwork.album_key)
                .or_insert_with(|| artwork_file(&self.artwork_cache_dir, &artwork.artwork_id));
        }
        paths
    }
}

fn artwork_file(dir: &Path, artwork_id: &str) -> PathBuf {
    dir.join(format!("{artwork_id}.jpg"))
}

fn to_items(data: Vec<AlbumData>) -> Vec<AlbumItem> {
    data.into_iter().map(AlbumItem::from_data).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SqliteTrackRepository;
    use crate::test_utils::{insert_album, insert_album_artwork, insert_visible_track, mock_track, temp_db};

    #[tokio::test]
    async fn test_get_and_order_albums() {
        let (pool, dir) = temp_db().await;
        insert_album(&pool, "k1", None, None).await;
        insert_album(&pool, "k2", None, None).await;

        let mut a = mock_track("/music/a.mp3", "k1");
        a.album_title = Some("Zebra".to_string());
        insert_visible_track(&pool, &a).await;
        let mut b = mock_track("/music/b.mp3", "k2");
        b.album_title = Some("The Apple".to_string());
        insert_visible_track(&pool, &b).await;

        let service = CollectionService::new(
            Arc::new(SqliteTrackRepository::new(pool)),
            dir.path().join("artwork"),
        );
        let albums = service.get_all_albums().await;
        let ordered = service.order_albums(albums, AlbumOrder::Alphabetical).await;
        let titles: Vec<_> = ordered.iter().map(|a| a.album_title.as_str()).collect();
        assert_eq!(titles, ["The Apple", "Zebra"]);
    }

    #[tokio::test]
    async fn test_artwork_paths() {
        let (pool, dir) = temp_db().await;
        insert_album_artwork(&pool, "k1", "art-1").await;
        insert_album_artwork(&pool, "k2", "art-2").await;

        let cache = dir.path().join("artwork");
        let service = CollectionService::new(Arc::new(SqliteTrackRepository::new(pool)), &cache);

        assert_eq!(service.artwork_path("x"), cache.join("x.jpg"));

        let all = service.artwork_paths(None).await;
        assert_eq!(all.len(), 2);

        let only = service.artwork_paths(Some(&["k2".to_string()])).await;
        assert_eq!(only.len(), 1);
        assert_eq!(only["k2"], cache.join("art-2.jpg"));
    }
}
