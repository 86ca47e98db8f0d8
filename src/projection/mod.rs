//! Incremental album view synchronization.
//!
//! [`AlbumProjection`] owns two lists: the *holder* (every album the view
//! loaded, in the current order) and the *visible* projection (indices into
//! the holder that pass the active filters). Events are applied through
//! [`AlbumProjection::reconcile`], which mutates both lists in place and
//! reports what moved as [`ProjectionChange`]s, so a view can patch itself
//! instead of reloading.
//!
//! Filters:
//! - With an empty search text, the secondary filter applies: love-only
//!   views keep loved albums, and [`AlbumOrder::ByDateLastPlayed`] keeps
//!   albums that were played at least once.
//! - With a search text, only the search filter applies and events never
//!   change positions.

mod controller;

pub use controller::ProjectionController;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::collection::{AlbumItem, AlbumOrder, compare, order_albums, search_terms};
use crate::model::PlaybackCounter;

/// Events a collection view reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// Artwork was cached for these albums
    AlbumArtworkAdded(Vec<String>),
    /// Tracks were played or skipped
    PlaybackCountersChanged(Vec<PlaybackCounter>),
    /// An album was loved or unloved
    AlbumLoveChanged {
        album_key: String,
        love: bool,
        date_loved: Option<i64>,
    },
    /// The debounced search text changed
    SearchTextChanged(String),
}

/// Events [`AlbumProjection::reconcile`] applies.
///
/// Same as [`CollectionEvent`], except that artwork arrives already resolved
/// to file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionEvent {
    ArtworkChanged(HashMap<String, PathBuf>),
    PlaybackCountersChanged(Vec<PlaybackCounter>),
    AlbumLoveChanged {
        album_key: String,
        love: bool,
        date_loved: Option<i64>,
    },
    SearchTextChanged(String),
}

/// One edit to the visible list. Indices refer to the list as it was when
/// the edit was applied, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionChange {
    /// The visible list was rebuilt from scratch
    Reset,
    Insert { index: usize, album_key: String },
    Remove { index: usize, album_key: String },
    Move { from: usize, to: usize },
    /// An album's data changed without moving
    Update { album_key: String },
}

/// Holder and visible lists of one collection view.
#[derive(Debug, Clone, Default)]
pub struct AlbumProjection {
    holder: Vec<AlbumItem>,
    /// Album key -> holder index
    index: HashMap<String, usize>,
    /// Holder indices, in display order
    visible: Vec<usize>,
    order: AlbumOrder,
    love_only: bool,
    search_text: String,
    search_terms: Vec<String>,
}

impl AlbumProjection {
    pub fn new(order: AlbumOrder, love_only: bool) -> Self {
        Self {
            order,
            love_only,
            ..Default::default()
        }
    }

    pub fn order(&self) -> AlbumOrder {
        self.order
    }

    pub fn love_only(&self) -> bool {
        self.love_only
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Whether nothing was loaded yet.
    pub fn is_empty(&self) -> bool {
        self.holder.is_empty()
    }

    /// Every loaded album.
    pub fn holder(&self) -> &[AlbumItem] {
        &self.holder
    }

    /// Visible albums, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &AlbumItem> + '_ {
        self.visible.iter().map(|&i| &self.holder[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_keys(&self) -> Vec<&str> {
        self.visible().map(|a| a.album_key.as_str()).collect()
    }

    /// Replace the holder with freshly loaded albums and re-derive the view.
    pub fn fill(&mut self, albums: Vec<AlbumItem>) -> Vec<ProjectionChange> {
        self.holder = albums;
        self.rebuild()
    }

    /// Drop everything.
    pub fn clear(&mut self) -> Vec<ProjectionChange> {
        self.holder.clear();
        self.index.clear();
        self.visible.clear();
        vec![ProjectionChange::Reset]
    }

    /// Like [`fill`](Self::fill) for albums already sorted under `ordered_by`.
    ///
    /// Skips the sort unless the order changed since the albums were sorted.
    pub fn fill_ordered(
        &mut self,
        albums: Vec<AlbumItem>,
        ordered_by: AlbumOrder,
    ) -> Vec<ProjectionChange> {
        self.holder = albums;
        if ordered_by != self.order {
            order_albums(&mut self.holder, self.order);
        }
        self.reindex();
        self.refilter()
    }

    /// Re-sort the holder under the current order and re-derive the view.
    pub fn rebuild(&mut self) -> Vec<ProjectionChange> {
        order_albums(&mut self.holder, self.order);
        self.reindex();
        self.refilter()
    }

    fn reindex(&mut self) {
        self.index = self
            .holder
            .iter()
            .enumerate()
            .map(|(i, a)| (a.album_key.clone(), i))
            .collect();
    }

    /// Re-derive the visible list without re-sorting.
    fn refilter(&mut self) -> Vec<ProjectionChange> {
        self.visible = (0..self.holder.len())
            .filter(|&i| self.passes_filter(&self.holder[i]))
            .collect();
        vec![ProjectionChange::Reset]
    }

    /// Switch to the next order in the toggle sequence.
    pub fn toggle_album_order(&mut self) -> Vec<ProjectionChange> {
        self.set_album_order(self.order.next())
    }

    pub fn set_album_order(&mut self, order: AlbumOrder) -> Vec<ProjectionChange> {
        self.order = order;
        self.rebuild()
    }

    pub fn set_love_only(&mut self, love_only: bool) -> Vec<ProjectionChange> {
        if self.love_only == love_only {
            return Vec::new();
        }
        self.love_only = love_only;
        // Counter promotions only reorder the visible list, so re-sort first
        self.rebuild()
    }

    fn searching(&self) -> bool {
        !self.search_text.is_empty()
    }

    fn passes_filter(&self, album: &AlbumItem) -> bool {
        if self.searching() {
            album.matches_search(&self.search_terms)
        } else {
            self.passes_secondary_filter(album)
        }
    }

    fn passes_secondary_filter(&self, album: &AlbumItem) -> bool {
        if self.love_only && !album.album_love {
            return false;
        }
        match self.order {
            AlbumOrder::ByDateLastPlayed => album.date_last_played.is_some(),
            _ => true,
        }
    }

    fn visible_position(&self, holder_index: usize) -> Option<usize> {
        self.visible.iter().position(|&i| i == holder_index)
    }

    /// Apply one event and report the edits made to the visible list.
    pub fn reconcile(&mut self, event: ProjectionEvent) -> Vec<ProjectionChange> {
        match event {
            ProjectionEvent::ArtworkChanged(paths) => self.apply_artwork(paths),
            ProjectionEvent::PlaybackCountersChanged(counters) => self.apply_counters(&counters),
            ProjectionEvent::AlbumLoveChanged {
                album_key,
                love,
                date_loved,
            } => self.apply_album_love(&album_key, love, date_loved),
            ProjectionEvent::SearchTextChanged(text) => self.apply_search(&text),
        }
    }

    fn apply_artwork(&mut self, paths: HashMap<String, PathBuf>) -> Vec<ProjectionChange> {
        let mut changes = Vec::new();
        for (album_key, path) in paths {
            let Some(&i) = self.index.get(&album_key) else {
                continue;
            };
            let album = &mut self.holder[i];
            if album.artwork_path.as_ref() != Some(&path) {
                album.artwork_path = Some(path);
                changes.push(ProjectionChange::Update { album_key });
            }
        }
        changes
    }

    fn apply_counters(&mut self, counters: &[PlaybackCounter]) -> Vec<ProjectionChange> {
        let mut changes = Vec::new();
        let promote = self.order == AlbumOrder::ByDateLastPlayed && !self.searching();

        for counter in counters {
            let Some(album_key) = counter.album_key.as_deref() else {
                continue;
            };
            let Some(&i) = self.index.get(album_key) else {
                continue;
            };

            self.holder[i].update_counters(counter);
            changes.push(ProjectionChange::Update {
                album_key: album_key.to_string(),
            });

            if !(promote && counter.play_count_incremented) {
                continue;
            }

            match self.visible_position(i) {
                Some(0) => {}
                Some(from) => {
                    self.visible.remove(from);
                    self.visible.insert(0, i);
                    changes.push(ProjectionChange::Move { from, to: 0 });
                }
                None if self.passes_secondary_filter(&self.holder[i]) => {
                    self.visible.insert(0, i);
                    changes.push(ProjectionChange::Insert {
                        index: 0,
                        album_key: album_key.to_string(),
                    });
                }
                None => {}
            }
        }
        changes
    }

    fn apply_album_love(
        &mut self,
        album_key: &str,
        love: bool,
        date_loved: Option<i64>,
    ) -> Vec<ProjectionChange> {
        let Some(&i) = self.index.get(album_key) else {
            return Vec::new();
        };

        self.holder[i].update_love(love, date_loved);
        let mut changes = vec![ProjectionChange::Update {
            album_key: album_key.to_string(),
        }];

        if !self.love_only || self.searching() {
            return changes;
        }

        match (love, self.visible_position(i)) {
            (true, None) if self.passes_secondary_filter(&self.holder[i]) => {
                let album = &self.holder[i];
                let index = self
                    .visible
                    .iter()
                    .position(|&j| compare(&self.holder[j], album, self.order).is_gt())
                    .unwrap_or(self.visible.len());
                self.visible.insert(index, i);
                changes.push(ProjectionChange::Insert {
                    index,
                    album_key: album_key.to_string(),
                });
            }
            (false, Some(index)) => {
                self.visible.remove(index);
                changes.push(ProjectionChange::Remove {
                    index,
                    album_key: album_key.to_string(),
                });
            }
            _ => {}
        }
        changes
    }

    fn apply_search(&mut self, text: &str) -> Vec<ProjectionChange> {
        let text = text.trim();
        if text == self.search_text {
            return Vec::new();
        }

        let was_searching = self.searching();
        self.search_text = text.to_string();
        self.search_terms = search_terms(text);

        if was_searching != self.searching() {
            // Entering or leaving search re-applies the secondary filter
            self.rebuild()
        } else {
            self.refilter()
        }
    }
}
