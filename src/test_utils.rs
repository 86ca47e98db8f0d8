//! Test utilities and fixtures for music-collection tests.
//!
//! This module provides a throwaway database, mock factories, and helpers
//! that insert rows already linked the way the collection expects, to reduce
//! boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_collection::test_utils::{temp_db, mock_track, insert_visible_track};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     insert_visible_track(&pool, &mock_track("/music/a.mp3", "k1")).await;
//!     // ... test logic
//! }
//! ```

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::model::{AlbumData, Track, to_safe_path};
use crate::repository::{albums, folders, tracks};

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically.
///
/// # Returns
///
/// A tuple of (connection pool, temp directory handle).
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_url = crate::db::db_url(Some(&dir.path().join("test.db")));

    let pool = crate::db::init_db(&db_url, 2)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Creates a fully indexed mock track.
///
/// Use struct update syntax or field assignment to customize:
///
/// ```ignore
/// let mut track = mock_track("/music/a.mp3", "k1");
/// track.year = Some(1999);
/// ```
pub fn mock_track(path: &str, album_key: &str) -> Track {
    Track {
        album_key: Some(album_key.to_string()),
        track_title: Some("Test Song".to_string()),
        album_title: Some("Test Album".to_string()),
        file_name: path.rsplit(['/', '\\']).next().map(str::to_string),
        indexing_success: Some(1),
        needs_indexing: Some(0),
        needs_album_artwork_indexing: Some(1),
        ..Track::new(path)
    }
}

/// Creates a mock album aggregate.
pub fn mock_album_data(album_key: &str, title: &str, artist: &str) -> AlbumData {
    AlbumData {
        album_key: album_key.to_string(),
        album_title: Some(title.to_string()),
        album_artists: crate::model::multi_value::join([artist]),
        ..Default::default()
    }
}

/// Returns the id of the folder at `path`, creating it if needed.
pub async fn insert_folder(pool: &SqlitePool, path: &str, show: bool) -> i64 {
    let existing: Option<i64> = sqlx::query_scalar("SELECT FolderID FROM Folder WHERE SafePath = ?")
        .bind(to_safe_path(path))
        .fetch_optional(pool)
        .await
        .expect("Failed to look up folder");

    match existing {
        Some(id) => id,
        None => folders::add_folder(pool, path, show)
            .await
            .expect("Failed to add folder"),
    }
}

/// Inserts a track linked to a shown folder and returns its id.
pub async fn insert_visible_track(pool: &SqlitePool, track: &Track) -> i64 {
    let folder = insert_folder(pool, "/music", true).await;
    insert_linked_track(pool, folder, track).await
}

/// Inserts a track linked to a hidden folder and returns its id.
pub async fn insert_hidden_track(pool: &SqlitePool, track: &Track) -> i64 {
    let folder = insert_folder(pool, "/hidden", false).await;
    insert_linked_track(pool, folder, track).await
}

async fn insert_linked_track(pool: &SqlitePool, folder: i64, track: &Track) -> i64 {
    let id = tracks::add_track(pool, track)
        .await
        .expect("Failed to add track");
    folders::add_folder_track(pool, folder, id)
        .await
        .expect("Failed to link track");
    id
}

/// Inserts an album row with the given love state.
pub async fn insert_album(
    pool: &SqlitePool,
    album_key: &str,
    album_love: Option<i64>,
    date_album_loved: Option<i64>,
) {
    sqlx::query("INSERT INTO Album (AlbumKey, AlbumLove, DateAlbumLoved) VALUES (?, ?, ?)")
        .bind(album_key)
        .bind(album_love)
        .bind(date_album_loved)
        .execute(pool)
        .await
        .expect("Failed to insert album");
}

/// Inserts cached artwork for an album.
pub async fn insert_album_artwork(pool: &SqlitePool, album_key: &str, artwork_id: &str) {
    albums::add_album_artwork(pool, album_key, artwork_id)
        .await
        .expect("Failed to insert artwork");
}

/// Puts a path in the play queue.
pub async fn insert_queued_track(pool: &SqlitePool, path: &str) {
    sqlx::query(
        "INSERT INTO QueuedTrack (Path, SafePath, IsPlaying, ProgressSeconds, OrderID) \
         VALUES (?, ?, 0, 0, 0)",
    )
    .bind(path)
    .bind(to_safe_path(path))
    .execute(pool)
    .await
    .expect("Failed to queue track");
}
