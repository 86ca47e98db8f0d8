//! Album orderings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::item::AlbumItem;

/// How a collection view orders its albums.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AlbumOrder {
    /// Title A-Z
    #[default]
    Alphabetical,
    /// Most recently added first
    ByDateAdded,
    /// Most recently created files first
    ByDateCreated,
    /// Album artist A-Z
    ByAlbumArtist,
    /// Oldest first
    ByYearAscending,
    /// Newest first
    ByYearDescending,
    /// Most recently played first; never-played albums are hidden
    ByDateLastPlayed,
}

impl AlbumOrder {
    /// Every order, in toggle sequence.
    pub const ALL: [AlbumOrder; 7] = [
        AlbumOrder::Alphabetical,
        AlbumOrder::ByDateAdded,
        AlbumOrder::ByDateCreated,
        AlbumOrder::ByAlbumArtist,
        AlbumOrder::ByYearAscending,
        AlbumOrder::ByYearDescending,
        AlbumOrder::ByDateLastPlayed,
    ];

    /// The order a toggle switches to.
    pub fn next(self) -> Self {
        match self {
            AlbumOrder::Alphabetical => AlbumOrder::ByDateAdded,
            AlbumOrder::ByDateAdded => AlbumOrder::ByDateCreated,
            AlbumOrder::ByDateCreated => AlbumOrder::ByAlbumArtist,
            AlbumOrder::ByAlbumArtist => AlbumOrder::ByYearAscending,
            AlbumOrder::ByYearAscending => AlbumOrder::ByYearDescending,
            AlbumOrder::ByYearDescending => AlbumOrder::ByDateLastPlayed,
            AlbumOrder::ByDateLastPlayed => AlbumOrder::Alphabetical,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            AlbumOrder::Alphabetical => "A-Z",
            AlbumOrder::ByDateAdded => "By date added",
            AlbumOrder::ByDateCreated => "By date created",
            AlbumOrder::ByAlbumArtist => "By album artist",
            AlbumOrder::ByYearAscending => "By year ascending",
            AlbumOrder::ByYearDescending => "By year descending",
            AlbumOrder::ByDateLastPlayed => "Last played",
        }
    }
}

impl std::fmt::Display for AlbumOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ascending on known values, unknown values last.
fn asc_known_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending on known values, unknown values last.
fn desc_known_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_title(a: &AlbumItem, b: &AlbumItem) -> Ordering {
    a.sort_title
        .cmp(&b.sort_title)
        .then_with(|| a.sort_artist.cmp(&b.sort_artist))
}

/// Total order of two albums under `order`.
///
/// Ties on the order's own key fall back to title, artist and finally the
/// album key, so two distinct albums never compare equal.
pub fn compare(a: &AlbumItem, b: &AlbumItem, order: AlbumOrder) -> Ordering {
    let primary = match order {
        AlbumOrder::Alphabetical => Ordering::Equal,
        AlbumOrder::ByDateAdded => desc_known_first(a.date_added, b.date_added),
        AlbumOrder::ByDateCreated => desc_known_first(a.date_file_created, b.date_file_created),
        AlbumOrder::ByAlbumArtist => a.sort_artist.cmp(&b.sort_artist),
        AlbumOrder::ByYearAscending => asc_known_first(a.year, b.year),
        AlbumOrder::ByYearDescending => desc_known_first(a.year, b.year),
        AlbumOrder::ByDateLastPlayed => desc_known_first(a.date_last_played, b.date_last_played),
    };

    primary
        .then_with(|| by_title(a, b))
        .then_with(|| a.album_key.cmp(&b.album_key))
}

/// Sort albums in place.
pub fn order_albums(albums: &mut [AlbumItem], order: AlbumOrder) {
    albums.sort_by(|a, b| compare(a, b, order));
}
