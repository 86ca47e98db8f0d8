//! Core data models for the music collection.
//!
//! Defines the stored entities ([`Track`], [`Album`], [`AlbumArtwork`],
//! [`Folder`], [`RemovedTrack`]) and the read-only projections built from
//! them ([`AlbumData`], [`PlaybackCounter`]). All of them map to SQLx rows.
//!
//! # Database Schema
//!
//! Column names are PascalCase and match existing library files:
//! - `Track` - one row per audio file, identified by `SafePath`
//! - `Album` - love state per `AlbumKey`, created lazily during indexing
//! - `AlbumArtwork` - cached artwork id per `AlbumKey`
//! - `Folder` / `FolderTrack` - collection folders and their tracks
//! - `QueuedTrack` - the persisted play queue
//! - `RemovedTrack` - paths the user removed from the collection

pub mod multi_value;
pub mod ticks;

use serde::Serialize;
use smallvec::SmallVec;
use sqlx::FromRow;

/// Normalized, case-insensitive identity of a file path.
///
/// Every lookup by path goes through this, so `C:\Music\A.mp3` and
/// `c:\music\a.mp3` address the same track.
pub fn to_safe_path(path: &str) -> String {
    path.to_lowercase()
}

/// Which artist columns an artist filter matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ArtistType {
    /// Track artists or album artists
    #[default]
    All,
    /// Track artists only
    Track,
    /// Album artists only
    Album,
}

/// A track (audio file) in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct Track {
    #[sqlx(rename = "TrackID")]
    pub track_id: i64,
    /// Delimited multi-value, see [`multi_value`]
    pub artists: Option<String>,
    pub composers: Option<String>,
    pub genres: Option<String>,
    pub album_title: Option<String>,
    pub album_artists: Option<String>,
    /// Derived album identity; not a foreign key
    pub album_key: Option<String>,
    /// Display path
    pub path: String,
    /// Unique identity, see [`to_safe_path`]
    pub safe_path: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub bit_rate: Option<i64>,
    pub sample_rate: Option<i64>,
    pub track_title: Option<String>,
    pub track_number: Option<i64>,
    pub track_count: Option<i64>,
    pub disc_number: Option<i64>,
    pub disc_count: Option<i64>,
    /// Duration in milliseconds
    pub duration: Option<i64>,
    pub year: Option<i64>,
    pub has_lyrics: Option<i64>,
    pub date_added: Option<i64>,
    pub date_file_created: Option<i64>,
    pub date_last_synced: Option<i64>,
    pub date_file_modified: Option<i64>,
    pub needs_indexing: Option<i64>,
    pub needs_album_artwork_indexing: Option<i64>,
    pub indexing_success: Option<i64>,
    pub indexing_failure_reason: Option<String>,
    /// 0-5
    pub rating: Option<i64>,
    /// Boolean stored as 0/1
    pub love: Option<i64>,
    pub play_count: Option<i64>,
    pub skip_count: Option<i64>,
    pub date_last_played: Option<i64>,
}

impl Track {
    /// Create an empty track for `path` with its safe path filled in.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            safe_path: to_safe_path(&path),
            path,
            ..Default::default()
        }
    }

    /// Whether the user loved this track.
    pub fn is_loved(&self) -> bool {
        self.love.unwrap_or(0) != 0
    }

    /// Split track artists.
    pub fn artist_list(&self) -> SmallVec<[String; 4]> {
        multi_value::split(self.artists.as_deref())
    }

    /// Split album artists.
    pub fn album_artist_list(&self) -> SmallVec<[String; 4]> {
        multi_value::split(self.album_artists.as_deref())
    }

    /// Split genres.
    pub fn genre_list(&self) -> SmallVec<[String; 4]> {
        multi_value::split(self.genres.as_deref())
    }
}

/// An album row: only the user data that cannot be derived from tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct Album {
    pub album_key: String,
    /// Tri-state: never set, unloved, loved
    pub album_love: Option<i64>,
    pub date_album_loved: Option<i64>,
}

impl Album {
    /// A fresh album row with no love state.
    pub fn create_default(album_key: impl Into<String>) -> Self {
        Self {
            album_key: album_key.into(),
            ..Default::default()
        }
    }

    /// Whether the album is loved. `NULL` counts as not loved.
    pub fn is_loved(&self) -> bool {
        self.album_love.unwrap_or(0) != 0
    }
}

/// Cached artwork reference for an album.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct AlbumArtwork {
    #[sqlx(rename = "AlbumArtworkID")]
    pub album_artwork_id: i64,
    pub album_key: String,
    #[sqlx(rename = "ArtworkID")]
    pub artwork_id: String,
}

/// Aggregate of all tracks sharing an `AlbumKey`, joined with the album row.
///
/// Never stored; always produced by a `GROUP BY AlbumKey` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct AlbumData {
    pub album_key: String,
    pub album_title: Option<String>,
    pub album_artists: Option<String>,
    pub track_title: Option<String>,
    pub artists: Option<String>,
    /// Max year over the album's tracks
    pub year: Option<i64>,
    /// Most recent file creation
    pub date_file_created: Option<i64>,
    /// Earliest addition to the collection
    pub date_added: Option<i64>,
    /// Most recent play
    pub date_last_played: Option<i64>,
    /// From the `Album` row
    pub album_love: Option<i64>,
    pub date_album_loved: Option<i64>,
}

/// The slice of a track touched by play/skip events.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct PlaybackCounter {
    pub path: String,
    pub safe_path: String,
    pub play_count: Option<i64>,
    pub skip_count: Option<i64>,
    pub date_last_played: Option<i64>,
    pub album_key: Option<String>,
    /// Set by the playback side when this event is a completed play
    #[sqlx(skip)]
    pub play_count_incremented: bool,
}

/// A collection folder.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct Folder {
    #[sqlx(rename = "FolderID")]
    pub folder_id: i64,
    pub path: Option<String>,
    pub safe_path: Option<String>,
    pub show_in_collection: i64,
}

/// A path the user removed from the collection.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[sqlx(rename_all = "PascalCase")]
pub struct RemovedTrack {
    #[sqlx(rename = "TrackID")]
    pub track_id: i64,
    pub path: Option<String>,
    pub safe_path: Option<String>,
    pub date_removed: Option<i64>,
}
