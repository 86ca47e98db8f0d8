//! Track repository: the collection's only gateway to the database.
//!
//! The free functions in [`tracks`], [`albums`] and [`folders`] are fallible
//! and return [`crate::error::Result`]. [`TrackRepository`] is the seam the
//! rest of the application talks to: its methods never fail. The SQLite
//! implementation logs each failure with the operation name and hands back an
//! empty value instead.
//!
//! # Example
//!
//! ```ignore
//! use music_collection::repository::{SqliteTrackRepository, TrackRepository};
//!
//! let repo = SqliteTrackRepository::new(pool);
//! for album in repo.get_all_album_data().await {
//!     println!("{}", album.album_key);
//! }
//! ```

pub mod albums;
pub mod folders;
pub mod tracks;

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::error::LogOnError;
use crate::model::{
    Album, AlbumArtwork, AlbumData, ArtistType, Folder, PlaybackCounter, RemovedTrack, Track,
};
use crate::query::{Column, Predicate};

/// Outcome of [`TrackRepository::remove_tracks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTracksResult {
    /// Every track was removed
    Success,
    /// Nothing was removed; the batch was rolled back
    Error,
}

/// Non-failing access to tracks, albums and folders.
///
/// Implement this trait to substitute an in-memory collection in tests.
#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Visible tracks, optionally narrowed by `filter`.
    async fn get_visible_tracks(&self, filter: Option<Predicate>) -> Vec<Track>;

    /// Visible tracks at the given paths.
    async fn get_tracks_for_paths(&self, paths: &[String]) -> Vec<Track> {
        self.get_visible_tracks(Some(Predicate::paths(paths))).await
    }

    /// Visible tracks whose track or album artists contain any of `artists`.
    async fn get_artist_tracks(&self, artists: &[String]) -> Vec<Track> {
        self.get_visible_tracks(Some(Predicate::artists(artists, ArtistType::All)))
            .await
    }

    /// Visible tracks in any of `genres`.
    async fn get_genre_tracks(&self, genres: &[String]) -> Vec<Track> {
        self.get_visible_tracks(Some(Predicate::genres(genres))).await
    }

    /// Visible tracks of the given albums.
    async fn get_album_tracks(&self, album_keys: &[String]) -> Vec<Track> {
        self.get_visible_tracks(Some(Predicate::album_keys(album_keys)))
            .await
    }

    /// Any track by path, visible or not.
    async fn get_track(&self, path: &str) -> Option<Track>;

    /// Insert a track and return its id.
    async fn add_track(&self, track: &Track) -> Option<i64>;

    /// Remove tracks in one all-or-nothing batch.
    async fn remove_tracks(&self, tracks: &[Track]) -> RemoveTracksResult;

    async fn get_removed_tracks(&self) -> Vec<RemovedTrack>;

    async fn clear_removed_tracks(&self) -> bool;

    /// Overwrite a track by primary key.
    async fn update_track(&self, track: &Track) -> bool;

    /// Re-read file size and modification time from disk.
    async fn update_track_file_information(&self, path: &str) -> bool;

    /// Distinct genres over visible tracks.
    async fn get_genres(&self) -> Vec<String>;

    /// Distinct track artists over visible tracks.
    async fn get_track_artists(&self) -> Vec<String>;

    /// Distinct album artists over visible tracks.
    async fn get_album_artists(&self) -> Vec<String>;

    async fn get_last_modified_track_for_album_key(&self, album_key: &str) -> Option<Track>;

    async fn get_earliest_track_for_album_key(&self, album_key: &str) -> Option<Track>;

    async fn disable_needs_album_artwork_indexing(&self, album_key: &str) -> bool;

    async fn disable_needs_album_artwork_indexing_for_all_tracks(&self) -> bool;

    /// Flag tracks for artwork indexing, optionally only albums without cached artwork.
    async fn enable_needs_album_artwork_indexing_for_all_tracks(
        &self,
        only_when_has_no_cover: bool,
    ) -> bool;

    async fn update_rating(&self, path: &str, rating: i64) -> bool;

    async fn update_love(&self, path: &str, love: bool) -> bool;

    /// Set album love; `date_loved` is only written when given.
    async fn update_album_love(&self, album_key: &str, love: bool, date_loved: Option<i64>)
    -> bool;

    async fn update_playback_counters(&self, counter: &PlaybackCounter) -> bool;

    async fn get_playback_counters(&self, path: &str) -> Option<PlaybackCounter>;

    async fn get_all_album_data(&self) -> Vec<AlbumData>;

    async fn get_artist_album_data(
        &self,
        artists: &[String],
        artist_type: ArtistType,
    ) -> Vec<AlbumData>;

    async fn get_genre_album_data(&self, genres: &[String]) -> Vec<AlbumData>;

    async fn get_album_data_for_keys(&self, album_keys: &[String]) -> Vec<AlbumData>;

    async fn get_album_data(&self, album_key: &str) -> Option<AlbumData>;

    /// Albums without cached artwork that still need artwork indexing.
    async fn get_album_data_to_index(&self) -> Vec<AlbumData>;

    async fn get_albums(&self, album_keys: &[String]) -> HashMap<String, Album>;

    async fn get_album(&self, album_key: &str) -> Option<Album>;

    /// Album keys used by tracks but missing an album row.
    async fn get_albums_to_index(&self) -> Vec<String>;

    /// Create missing album rows; returns how many were created.
    async fn add_albums(&self, album_keys: &[String]) -> u64;

    /// Delete album rows no track references; returns how many were deleted.
    async fn delete_unused_albums(&self) -> u64;

    async fn get_album_artwork(&self) -> Vec<AlbumArtwork>;

    async fn add_folder(&self, path: &str, show_in_collection: bool) -> Option<i64>;

    async fn add_folder_track(&self, folder_id: i64, track_id: i64) -> bool;

    async fn set_folder_show_in_collection(&self, folder_id: i64, show: bool) -> bool;

    async fn get_folders(&self) -> Vec<Folder>;
}

/// [`TrackRepository`] over a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteTrackRepository {
    pool: SqlitePool,
}

impl SqliteTrackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackRepository for SqliteTrackRepository {
    async fn get_visible_tracks(&self, filter: Option<Predicate>) -> Vec<Track> {
        tracks::visible_tracks(&self.pool, filter.as_ref())
            .await
            .or_log_default("get_visible_tracks")
    }

    async fn get_track(&self, path: &str) -> Option<Track> {
        tracks::track(&self.pool, path)
            .await
            .or_log_default("get_track")
    }

    async fn add_track(&self, track: &Track) -> Option<i64> {
        tracks::add_track(&self.pool, track)
            .await
            .map(Some)
            .or_log_default("add_track")
    }

    async fn remove_tracks(&self, tracks: &[Track]) -> RemoveTracksResult {
        tracks::remove_tracks(&self.pool, tracks)
            .await
            .map(|()| {
                tracing::info!(target: "repository", count = tracks.len(), "Removed tracks");
                RemoveTracksResult::Success
            })
            .or_log("remove_tracks", RemoveTracksResult::Error)
    }

    async fn get_removed_tracks(&self) -> Vec<RemovedTrack> {
        tracks::removed_tracks(&self.pool)
            .await
            .or_log_default("get_removed_tracks")
    }

    async fn clear_removed_tracks(&self) -> bool {
        tracks::clear_removed_tracks(&self.pool)
            .await
            .map(|_| true)
            .or_log_default("clear_removed_tracks")
    }

    async fn update_track(&self, track: &Track) -> bool {
        tracks::update_track(&self.pool, track)
            .await
            .or_log_default("update_track")
    }

    async fn update_track_file_information(&self, path: &str) -> bool {
        tracks::update_track_file_information(&self.pool, path)
            .await
            .or_log_default("update_track_file_information")
    }

    async fn get_genres(&self) -> Vec<String> {
        tracks::distinct_values(&self.pool, Column::Genres)
            .await
            .or_log_default("get_genres")
    }

    async fn get_track_artists(&self) -> Vec<String> {
        tracks::distinct_values(&self.pool, Column::Artists)
            .await
            .or_log_default("get_track_artists")
    }

    async fn get_album_artists(&self) -> Vec<String> {
        tracks::distinct_values(&self.pool, Column::AlbumArtists)
            .await
            .or_log_default("get_album_artists")
    }

    async fn get_last_modified_track_for_album_key(&self, album_key: &str) -> Option<Track> {
        tracks::last_modified_track_for_album_key(&self.pool, album_key)
            .await
            .or_log_default("get_last_modified_track_for_album_key")
    }

    async fn get_earliest_track_for_album_key(&self, album_key: &str) -> Option<Track> {
        tracks::earliest_track_for_album_key(&self.pool, album_key)
            .await
            .or_log_default("get_earliest_track_for_album_key")
    }

    async fn disable_needs_album_artwork_indexing(&self, album_key: &str) -> bool {
        tracks::set_needs_album_artwork_indexing(&self.pool, Some(album_key), false)
            .await
            .map(|n| n > 0)
            .or_log_default("disable_needs_album_artwork_indexing")
    }

    async fn disable_needs_album_artwork_indexing_for_all_tracks(&self) -> bool {
        tracks::set_needs_album_artwork_indexing(&self.pool, None, false)
            .await
            .map(|_| true)
            .or_log_default("disable_needs_album_artwork_indexing_for_all_tracks")
    }

    async fn enable_needs_album_artwork_indexing_for_all_tracks(
        &self,
        only_when_has_no_cover: bool,
    ) -> bool {
        let result = if only_when_has_no_cover {
            tracks::enable_needs_album_artwork_indexing_without_cover(&self.pool).await
        } else {
            tracks::set_needs_album_artwork_indexing(&self.pool, None, true).await
        };
        result
            .map(|_| true)
            .or_log_default("enable_needs_album_artwork_indexing_for_all_tracks")
    }

    async fn update_rating(&self, path: &str, rating: i64) -> bool {
        tracks::update_rating(&self.pool, path, rating)
            .await
            .or_log_default("update_rating")
    }

    async fn update_love(&self, path: &str, love: bool) -> bool {
        tracks::update_love(&self.pool, path, love)
            .await
            .or_log_default("update_love")
    }

    async fn update_album_love(
        &self,
        album_key: &str,
        love: bool,
        date_loved: Option<i64>,
    ) -> bool {
        albums::update_album_love(&self.pool, album_key, love, date_loved)
            .await
            .or_log_default("update_album_love")
    }

    async fn update_playback_counters(&self, counter: &PlaybackCounter) -> bool {
        tracks::update_playback_counters(&self.pool, counter)
            .await
            .or_log_default("update_playback_counters")
    }

    async fn get_playback_counters(&self, path: &str) -> Option<PlaybackCounter> {
        tracks::playback_counters(&self.pool, path)
            .await
            .or_log_default("get_playback_counters")
    }

    async fn get_all_album_data(&self) -> Vec<AlbumData> {
        albums::all_album_data(&self.pool)
            .await
            .or_log_default("get_all_album_data")
    }

    async fn get_artist_album_data(
        &self,
        artists: &[String],
        artist_type: ArtistType,
    ) -> Vec<AlbumData> {
        albums::artist_album_data(&self.pool, artists, artist_type)
            .await
            .or_log_default("get_artist_album_data")
    }

    async fn get_genre_album_data(&self, genres: &[String]) -> Vec<AlbumData> {
        albums::genre_album_data(&self.pool, genres)
            .await
            .or_log_default("get_genre_album_data")
    }

    async fn get_album_data_for_keys(&self, album_keys: &[String]) -> Vec<AlbumData> {
        albums::album_data_for_keys(&self.pool, album_keys)
            .await
            .or_log_default("get_album_data_for_keys")
    }

    async fn get_album_data(&self, album_key: &str) -> Option<AlbumData> {
        albums::album_data(&self.pool, album_key)
            .await
            .or_log_default("get_album_data")
    }

    async fn get_album_data_to_index(&self) -> Vec<AlbumData> {
        albums::album_data_to_index(&self.pool)
            .await
            .or_log_default("get_album_data_to_index")
    }

    async fn get_albums(&self, album_keys: &[String]) -> HashMap<String, Album> {
        albums::albums(&self.pool, album_keys)
            .await
            .or_log_default("get_albums")
    }

    async fn get_album(&self, album_key: &str) -> Option<Album> {
        albums::album(&self.pool, album_key)
            .await
            .or_log_default("get_album")
    }

    async fn get_albums_to_index(&self) -> Vec<String> {
        albums::albums_to_index(&self.pool)
            .await
            .or_log_default("get_albums_to_index")
    }

    async fn add_albums(&self, album_keys: &[String]) -> u64 {
        albums::add_albums(&self.pool, album_keys)
            .await
            .or_log_default("add_albums")
    }

    async fn delete_unused_albums(&self) -> u64 {
        albums::delete_unused_albums(&self.pool)
            .await
            .or_log_default("delete_unused_albums")
    }

    async fn get_album_artwork(&self) -> Vec<AlbumArtwork> {
        albums::album_artwork(&self.pool)
            .await
            .or_log_default("get_album_artwork")
    }

    async fn add_folder(&self, path: &str, show_in_collection: bool) -> Option<i64> {
        folders::add_folder(&self.pool, path, show_in_collection)
            .await
            .map(Some)
            .or_log_default("add_folder")
    }

    async fn add_folder_track(&self, folder_id: i64, track_id: i64) -> bool {
        folders::add_folder_track(&self.pool, folder_id, track_id)
            .await
            .map(|()| true)
            .or_log_default("add_folder_track")
    }

    async fn set_folder_show_in_collection(&self, folder_id: i64, show: bool) -> bool {
        folders::set_show_in_collection(&self.pool, folder_id, show)
            .await
            .or_log_default("set_folder_show_in_collection")
    }

    async fn get_folders(&self) -> Vec<Folder> {
        folders::folders(&self.pool)
            .await
            .or_log_default("get_folders")
    }
}
