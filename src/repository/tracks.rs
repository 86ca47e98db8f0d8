//! Track queries and mutations.
//!
//! Every function acquires its own scoped connection and runs one statement
//! or one transaction. Failures are returned, never logged here; the
//! [`super::SqliteTrackRepository`] decorator does the logging.

use futures::TryStreamExt;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool};
use sqlx::{Connection, QueryBuilder};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::db;
use crate::error::{Result, ResultExt};
use crate::model::{PlaybackCounter, RemovedTrack, Track, multi_value, ticks, to_safe_path};
use crate::query::{Column, Predicate};

/// Joins and conditions shared by every "visible tracks" query.
pub(crate) const VISIBLE_TRACKS_FROM: &str = "FROM Track t \
     INNER JOIN FolderTrack ft ON ft.TrackID = t.TrackID \
     INNER JOIN Folder f ON ft.FolderID = f.FolderID \
     WHERE f.ShowInCollection = 1 AND t.IndexingSuccess = 1 AND t.NeedsIndexing = 0";

/// Writable track columns, in bind order.
const TRACK_COLUMNS: [&str; 34] = [
    "Artists",
    "Composers",
    "Genres",
    "AlbumTitle",
    "AlbumArtists",
    "AlbumKey",
    "Path",
    "SafePath",
    "FileName",
    "MimeType",
    "FileSize",
    "BitRate",
    "SampleRate",
    "TrackTitle",
    "TrackNumber",
    "TrackCount",
    "DiscNumber",
    "DiscCount",
    "Duration",
    "Year",
    "HasLyrics",
    "DateAdded",
    "DateFileCreated",
    "DateLastSynced",
    "DateFileModified",
    "NeedsIndexing",
    "NeedsAlbumArtworkIndexing",
    "IndexingSuccess",
    "IndexingFailureReason",
    "Rating",
    "Love",
    "PlayCount",
    "SkipCount",
    "DateLastPlayed",
];

fn bind_track_columns<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    track: &'q Track,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(&track.artists)
        .bind(&track.composers)
        .bind(&track.genres)
        .bind(&track.album_title)
        .bind(&track.album_artists)
        .bind(&track.album_key)
        .bind(&track.path)
        .bind(&track.safe_path)
        .bind(&track.file_name)
        .bind(&track.mime_type)
        .bind(track.file_size)
        .bind(track.bit_rate)
        .bind(track.sample_rate)
        .bind(&track.track_title)
        .bind(track.track_number)
        .bind(track.track_count)
        .bind(track.disc_number)
        .bind(track.disc_count)
        .bind(track.duration)
        .bind(track.year)
        .bind(track.has_lyrics)
        .bind(track.date_added)
        .bind(track.date_file_created)
        .bind(track.date_last_synced)
        .bind(track.date_file_modified)
        .bind(track.needs_indexing)
        .bind(track.needs_album_artwork_indexing)
        .bind(track.indexing_success)
        .bind(&track.indexing_failure_reason)
        .bind(track.rating)
        .bind(track.love)
        .bind(track.play_count)
        .bind(track.skip_count)
        .bind(track.date_last_played)
}

/// Visible tracks, optionally narrowed by `filter`.
pub async fn visible_tracks(pool: &SqlitePool, filter: Option<&Predicate>) -> Result<Vec<Track>> {
    let mut conn = db::connect(pool).await?;

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT DISTINCT t.* ");
    qb.push(VISIBLE_TRACKS_FROM);
    if let Some(filter) = filter {
        qb.push(" AND ");
        filter.push_sql(&mut qb);
    }

    let tracks = qb.build_query_as::<Track>().fetch_all(&mut *conn).await?;
    Ok(tracks)
}

/// Any track (visible or not) by path.
pub async fn track(pool: &SqlitePool, path: &str) -> Result<Option<Track>> {
    let mut conn = db::connect(pool).await?;
    let track = sqlx::query_as::<_, Track>("SELECT * FROM Track WHERE SafePath = ?")
        .bind(to_safe_path(path))
        .fetch_optional(&mut *conn)
        .await?;
    Ok(track)
}

/// Insert a new track row and return its id.
///
/// The safe path is recomputed from `track.path`, so callers cannot store
/// a mismatching identity.
pub async fn add_track(pool: &SqlitePool, track: &Track) -> Result<i64> {
    let mut conn = db::connect(pool).await?;

    let mut track = track.clone();
    track.safe_path = to_safe_path(&track.path);

    let placeholders = vec!["?"; TRACK_COLUMNS.len()].join(", ");
    let sql = format!(
        "INSERT INTO Track ({}) VALUES ({placeholders})",
        TRACK_COLUMNS.join(", ")
    );

    let result = bind_track_columns(sqlx::query(&sql), &track)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Overwrite every column of the track with `track.track_id`.
///
/// Returns false when no row has that id.
pub async fn update_track(pool: &SqlitePool, track: &Track) -> Result<bool> {
    let mut conn = db::connect(pool).await?;

    let assignments = TRACK_COLUMNS
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE Track SET {assignments} WHERE TrackID = ?");

    let result = bind_track_columns(sqlx::query(&sql), track)
        .bind(track.track_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Refresh size and modification time of a track from the filesystem.
///
/// Returns false when the track is not in the collection.
pub async fn update_track_file_information(pool: &SqlitePool, path: &str) -> Result<bool> {
    let Some(db_track) = track(pool, path).await? else {
        return Ok(false);
    };

    let file = PathBuf::from(path);
    let metadata = tokio::task::spawn_blocking(move || std::fs::metadata(&file))
        .await
        .map_err(std::io::Error::other)?
        .with_context(format!("Could not read file information for {path}"))?;

    let size = metadata.len() as i64;
    let modified = metadata.modified().ok().map(ticks::from_system_time);

    let mut conn = db::connect(pool).await?;
    let result = sqlx::query(
        "UPDATE Track SET FileSize = ?, DateFileModified = ?, DateLastSynced = ? WHERE TrackID = ?",
    )
    .bind(size)
    .bind(modified)
    .bind(ticks::now())
    .bind(db_track.track_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove tracks from the collection in a single transaction.
///
/// For each track: log its path in `RemovedTrack` (once per safe path),
/// drop it from the play queue and from its folders, then delete the row.
/// Any failure rolls the whole batch back.
pub async fn remove_tracks(pool: &SqlitePool, tracks: &[Track]) -> Result<()> {
    let mut conn = db::connect(pool).await?;
    let mut tx = conn.begin().await?;
    let date_removed = ticks::now();

    let outcome: Result<()> = async {
        for track in tracks {
            let safe_path = to_safe_path(&track.path);

            sqlx::query(
                "INSERT INTO RemovedTrack (DateRemoved, Path, SafePath) \
                 SELECT ?, ?, ? WHERE NOT EXISTS (SELECT 1 FROM RemovedTrack WHERE SafePath = ?)",
            )
            .bind(date_removed)
            .bind(&track.path)
            .bind(&safe_path)
            .bind(&safe_path)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM QueuedTrack WHERE SafePath = ?")
                .bind(&safe_path)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                "DELETE FROM FolderTrack WHERE TrackID IN (SELECT TrackID FROM Track WHERE SafePath = ?)",
            )
            .bind(&safe_path)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM Track WHERE SafePath = ?")
                .bind(&safe_path)
                .execute(&mut *tx)
                .await?;
        }
        Ok(())
    }
    .await;

    match outcome {
        Ok(()) => {
            tx.commit().await?;
            Ok(())
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(target: "repository", error = %rollback, "Rollback failed");
            }
            Err(e)
        }
    }
}

/// Every logged removal.
pub async fn removed_tracks(pool: &SqlitePool) -> Result<Vec<RemovedTrack>> {
    let mut conn = db::connect(pool).await?;
    let rows = sqlx::query_as::<_, RemovedTrack>("SELECT * FROM RemovedTrack ORDER BY TrackID")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Forget all logged removals.
pub async fn clear_removed_tracks(pool: &SqlitePool) -> Result<u64> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query("DELETE FROM RemovedTrack")
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Distinct values of a multi-valued column over visible tracks, in first-seen order.
pub async fn distinct_values(pool: &SqlitePool, column: Column) -> Result<Vec<String>> {
    let mut conn = db::connect(pool).await?;
    let sql = format!("SELECT DISTINCT {} {VISIBLE_TRACKS_FROM}", column.as_sql());

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    let mut rows = sqlx::query_scalar::<_, Option<String>>(&sql).fetch(&mut *conn);
    while let Some(column_value) = rows.try_next().await? {
        for value in multi_value::split(column_value.as_deref()) {
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
    }
    Ok(values)
}

/// The most recently modified track of an album.
pub async fn last_modified_track_for_album_key(
    pool: &SqlitePool,
    album_key: &str,
) -> Result<Option<Track>> {
    let mut conn = db::connect(pool).await?;
    let track = sqlx::query_as::<_, Track>(
        "SELECT * FROM Track WHERE AlbumKey = ? ORDER BY DateFileModified DESC LIMIT 1",
    )
    .bind(album_key)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(track)
}

/// The track with the lowest track number of an album.
pub async fn earliest_track_for_album_key(
    pool: &SqlitePool,
    album_key: &str,
) -> Result<Option<Track>> {
    let mut conn = db::connect(pool).await?;
    let track = sqlx::query_as::<_, Track>(
        "SELECT * FROM Track WHERE AlbumKey = ? ORDER BY TrackNumber ASC LIMIT 1",
    )
    .bind(album_key)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(track)
}

/// Set `NeedsAlbumArtworkIndexing` for one album (`Some`) or all tracks (`None`).
pub async fn set_needs_album_artwork_indexing(
    pool: &SqlitePool,
    album_key: Option<&str>,
    needs: bool,
) -> Result<u64> {
    let mut conn = db::connect(pool).await?;
    let result = match album_key {
        Some(key) => {
            sqlx::query("UPDATE Track SET NeedsAlbumArtworkIndexing = ? WHERE AlbumKey = ?")
                .bind(needs as i64)
                .bind(key)
                .execute(&mut *conn)
                .await?
        }
        None => {
            sqlx::query("UPDATE Track SET NeedsAlbumArtworkIndexing = ?")
                .bind(needs as i64)
                .execute(&mut *conn)
                .await?
        }
    };
    Ok(result.rows_affected())
}

/// Flag tracks of albums without cached artwork for re-indexing.
pub async fn enable_needs_album_artwork_indexing_without_cover(pool: &SqlitePool) -> Result<u64> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query(
        "UPDATE Track SET NeedsAlbumArtworkIndexing = 1 \
         WHERE AlbumKey NOT IN (SELECT AlbumKey FROM AlbumArtwork)",
    )
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Set a track's rating, clamped to 0-5.
pub async fn update_rating(pool: &SqlitePool, path: &str, rating: i64) -> Result<bool> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query("UPDATE Track SET Rating = ? WHERE SafePath = ?")
        .bind(rating.clamp(0, 5))
        .bind(to_safe_path(path))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Set a track's love flag.
pub async fn update_love(pool: &SqlitePool, path: &str, love: bool) -> Result<bool> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query("UPDATE Track SET Love = ? WHERE SafePath = ?")
        .bind(love as i64)
        .bind(to_safe_path(path))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Persist play/skip counters of one track.
pub async fn update_playback_counters(pool: &SqlitePool, counter: &PlaybackCounter) -> Result<bool> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query(
        "UPDATE Track SET PlayCount = ?, SkipCount = ?, DateLastPlayed = ? WHERE SafePath = ?",
    )
    .bind(counter.play_count)
    .bind(counter.skip_count)
    .bind(counter.date_last_played)
    .bind(to_safe_path(&counter.path))
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Current play/skip counters of one track.
pub async fn playback_counters(pool: &SqlitePool, path: &str) -> Result<Option<PlaybackCounter>> {
    let mut conn = db::connect(pool).await?;
    let counter = sqlx::query_as::<_, PlaybackCounter>(
        "SELECT Path, SafePath, PlayCount, SkipCount, DateLastPlayed, AlbumKey \
         FROM Track WHERE SafePath = ?",
    )
    .bind(to_safe_path(path))
    .fetch_optional(&mut *conn)
    .await?;
    Ok(counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtistType;
    use crate::test_utils::{
        insert_hidden_track, insert_queued_track, insert_visible_track, mock_track, temp_db,
    };

    #[tokio::test]
    async fn test_visible_tracks_follow_visibility_rule() {
        let (pool, _dir) = temp_db().await;

        insert_visible_track(&pool, &mock_track("/music/ok.mp3", "k1")).await;
        insert_hidden_track(&pool, &mock_track("/hidden/no.mp3", "k1")).await;

        let mut failed = mock_track("/music/failed.mp3", "k1");
        failed.indexing_success = Some(0);
        insert_visible_track(&pool, &failed).await;

        let mut pending = mock_track("/music/pending.mp3", "k1");
        pending.needs_indexing = Some(1);
        insert_visible_track(&pool, &pending).await;

        let tracks = visible_tracks(&pool, None).await.unwrap();
        let paths: Vec<_> = tracks.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, ["/music/ok.mp3"]);
    }

    #[tokio::test]
    async fn test_visible_tracks_with_artist_filter() {
        let (pool, _dir) = temp_db().await;

        let mut air = mock_track("/music/air.mp3", "k1");
        air.artists = multi_value::join(["Air"]);
        insert_visible_track(&pool, &air).await;

        let mut artemis = mock_track("/music/artemis.mp3", "k2");
        artemis.artists = multi_value::join(["Artemis"]);
        insert_visible_track(&pool, &artemis).await;

        let mut compilation = mock_track("/music/va.mp3", "k3");
        compilation.artists = multi_value::join(["Beck"]);
        compilation.album_artists = multi_value::join(["Air", "Beck"]);
        insert_visible_track(&pool, &compilation).await;

        // Whole-value match: "Art" hits nobody
        let filter = Predicate::artists(&["Art"], ArtistType::All);
        assert!(visible_tracks(&pool, Some(&filter)).await.unwrap().is_empty());

        let filter = Predicate::artists(&["air"], ArtistType::All);
        let mut paths: Vec<_> = visible_tracks(&pool, Some(&filter))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.path)
            .collect();
        paths.sort();
        assert_eq!(paths, ["/music/air.mp3", "/music/va.mp3"]);

        let filter = Predicate::artists(&["Air"], ArtistType::Track);
        assert_eq!(visible_tracks(&pool, Some(&filter)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_track_lookup_is_case_insensitive() {
        let (pool, _dir) = temp_db().await;
        insert_visible_track(&pool, &mock_track("/Music/Song.mp3", "k1")).await;

        let found = track(&pool, "/music/SONG.mp3").await.unwrap().unwrap();
        assert_eq!(found.path, "/Music/Song.mp3");
        assert!(track(&pool, "/music/other.mp3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_track_rejects_duplicate_safe_path() {
        let (pool, _dir) = temp_db().await;
        add_track(&pool, &mock_track("/music/a.mp3", "k1")).await.unwrap();
        assert!(add_track(&pool, &mock_track("/MUSIC/A.mp3", "k1")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_track_by_primary_key() {
        let (pool, _dir) = temp_db().await;
        let id = insert_visible_track(&pool, &mock_track("/music/a.mp3", "k1")).await;

        let mut stored = track(&pool, "/music/a.mp3").await.unwrap().unwrap();
        assert_eq!(stored.track_id, id);
        stored.track_title = Some("Renamed".to_string());
        assert!(update_track(&pool, &stored).await.unwrap());

        let reloaded = track(&pool, "/music/a.mp3").await.unwrap().unwrap();
        assert_eq!(reloaded.track_title.as_deref(), Some("Renamed"));

        stored.track_id = 9999;
        assert!(!update_track(&pool, &stored).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_track_file_information() {
        let (pool, dir) = temp_db().await;
        let file = dir.path().join("song.mp3");
        std::fs::write(&file, b"0123456789").unwrap();
        let path = file.to_string_lossy().to_string();

        insert_visible_track(&pool, &mock_track(&path, "k1")).await;
        assert!(update_track_file_information(&pool, &path).await.unwrap());

        let stored = track(&pool, &path).await.unwrap().unwrap();
        assert_eq!(stored.file_size, Some(10));
        assert!(stored.date_file_modified.is_some());
        assert!(stored.date_last_synced.is_some());

        // Unknown track: nothing to update
        assert!(!update_track_file_information(&pool, "/nope.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_tracks_logs_once_and_cleans_queue() {
        let (pool, _dir) = temp_db().await;
        insert_visible_track(&pool, &mock_track("/music/a.mp3", "k1")).await;
        insert_queued_track(&pool, "/music/a.mp3").await;

        remove_tracks(&pool, &[mock_track("/music/a.mp3", "k1")]).await.unwrap();
        // Removing the same path again still logs it only once
        remove_tracks(&pool, &[mock_track("/MUSIC/a.mp3", "k1")]).await.unwrap();

        assert!(track(&pool, "/music/a.mp3").await.unwrap().is_none());
        assert_eq!(removed_tracks(&pool).await.unwrap().len(), 1);

        let queued: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM QueuedTrack")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(queued, 0);

        let folder_tracks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM FolderTrack")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(folder_tracks, 0);

        assert_eq!(clear_removed_tracks(&pool).await.unwrap(), 1);
        assert!(removed_tracks(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_tracks_is_atomic() {
        let (pool, _dir) = temp_db().await;
        insert_visible_track(&pool, &mock_track("/music/a.mp3", "k1")).await;
        insert_visible_track(&pool, &mock_track("/music/b.mp3", "k1")).await;
        insert_queued_track(&pool, "/music/a.mp3").await;

        // Fail halfway through the batch
        sqlx::query(
            "CREATE TRIGGER fail_delete BEFORE DELETE ON Track \
             WHEN OLD.SafePath = '/music/b.mp3' BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let batch = [mock_track("/music/a.mp3", "k1"), mock_track("/music/b.mp3", "k1")];
        assert!(remove_tracks(&pool, &batch).await.is_err());

        assert!(track(&pool, "/music/a.mp3").await.unwrap().is_some());
        assert!(track(&pool, "/music/b.mp3").await.unwrap().is_some());
        assert!(removed_tracks(&pool).await.unwrap().is_empty());
        let queued: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM QueuedTrack")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(queued, 1);
    }

    #[tokio::test]
    async fn test_distinct_values_split_multi_values() {
        let (pool, _dir) = temp_db().await;

        let mut a = mock_track("/music/a.mp3", "k1");
        a.genres = multi_value::join(["Rock", "Jazz"]);
        insert_visible_track(&pool, &a).await;

        let mut b = mock_track("/music/b.mp3", "k2");
        b.genres = multi_value::join(["Jazz"]);
        insert_visible_track(&pool, &b).await;

        let mut genres = distinct_values(&pool, Column::Genres).await.unwrap();
        genres.sort();
        assert_eq!(genres, ["Jazz", "Rock"]);
    }

    #[tokio::test]
    async fn test_album_key_track_lookups() {
        let (pool, _dir) = temp_db().await;

        let mut first = mock_track("/music/1.mp3", "k1");
        first.track_number = Some(1);
        first.date_file_modified = Some(100);
        insert_visible_track(&pool, &first).await;

        let mut second = mock_track("/music/2.mp3", "k1");
        second.track_number = Some(2);
        second.date_file_modified = Some(200);
        insert_visible_track(&pool, &second).await;

        let latest = last_modified_track_for_album_key(&pool, "k1").await.unwrap().unwrap();
        assert_eq!(latest.path, "/music/2.mp3");
        let earliest = earliest_track_for_album_key(&pool, "k1").await.unwrap().unwrap();
        assert_eq!(earliest.path, "/music/1.mp3");
        assert!(earliest_track_for_album_key(&pool, "k2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rating_love_and_counters() {
        let (pool, _dir) = temp_db().await;
        insert_visible_track(&pool, &mock_track("/music/a.mp3", "k1")).await;

        assert!(update_rating(&pool, "/music/a.mp3", 9).await.unwrap());
        assert!(update_love(&pool, "/MUSIC/a.mp3", true).await.unwrap());
        assert!(!update_love(&pool, "/music/missing.mp3", true).await.unwrap());

        let counter = PlaybackCounter {
            path: "/music/a.mp3".to_string(),
            play_count: Some(3),
            skip_count: Some(1),
            date_last_played: Some(42),
            ..Default::default()
        };
        assert!(update_playback_counters(&pool, &counter).await.unwrap());

        let stored = track(&pool, "/music/a.mp3").await.unwrap().unwrap();
        assert_eq!(stored.rating, Some(5));
        assert!(stored.is_loved());

        let counters = playback_counters(&pool, "/music/a.mp3").await.unwrap().unwrap();
        assert_eq!(counters.play_count, Some(3));
        assert_eq!(counters.skip_count, Some(1));
        assert_eq!(counters.date_last_played, Some(42));
        assert_eq!(counters.album_key.as_deref(), Some("k1"));
    }

    #[tokio::test]
    async fn test_artwork_indexing_flags() {
        let (pool, _dir) = temp_db().await;
        insert_visible_track(&pool, &mock_track("/music/a.mp3", "k1")).await;
        insert_visible_track(&pool, &mock_track("/music/b.mp3", "k2")).await;
        crate::test_utils::insert_album_artwork(&pool, "k1", "art-1").await;

        assert_eq!(set_needs_album_artwork_indexing(&pool, None, false).await.unwrap(), 2);
        assert_eq!(enable_needs_album_artwork_indexing_without_cover(&pool).await.unwrap(), 1);

        let b = track(&pool, "/music/b.mp3").await.unwrap().unwrap();
        assert_eq!(b.needs_album_artwork_indexing, Some(1));
        let a = track(&pool, "/music/a.mp3").await.unwrap().unwrap();
        assert_eq!(a.needs_album_artwork_indexing, Some(0));

        assert_eq!(
            set_needs_album_artwork_indexing(&pool, Some("k2"), false).await.unwrap(),
            1
        );
    }
}
