//! Album rows, album aggregates and artwork references.

use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::{Connection, QueryBuilder};
use std::collections::HashMap;

use crate::db;
use crate::error::Result;
use crate::model::{Album, AlbumArtwork, AlbumData, ArtistType};
use crate::query::Predicate;

/// One row per `AlbumKey`: textual fields and `Year` take the maximum over the
/// album's tracks, `DateAdded` the minimum, love state comes from `Album`.
const ALBUM_DATA_SELECT: &str = "SELECT t.AlbumKey AS AlbumKey, \
     MAX(t.AlbumTitle) AS AlbumTitle, \
     MAX(t.AlbumArtists) AS AlbumArtists, \
     MAX(t.TrackTitle) AS TrackTitle, \
     MAX(t.Artists) AS Artists, \
     MAX(t.Year) AS Year, \
     MAX(t.DateFileCreated) AS DateFileCreated, \
     MIN(t.DateAdded) AS DateAdded, \
     MAX(t.DateLastPlayed) AS DateLastPlayed, \
     MAX(a.AlbumLove) AS AlbumLove, \
     MAX(a.DateAlbumLoved) AS DateAlbumLoved \
     FROM Track t \
     INNER JOIN Album a ON a.AlbumKey = t.AlbumKey";

/// Visibility for albums: unlike track listings, tracks still waiting for
/// re-indexing keep their album on screen.
const ALBUM_DATA_VISIBLE: &str = " INNER JOIN FolderTrack ft ON ft.TrackID = t.TrackID \
     INNER JOIN Folder f ON ft.FolderID = f.FolderID \
     WHERE f.ShowInCollection = 1 AND t.IndexingSuccess = 1";

const GROUP_BY_ALBUM_KEY: &str = " GROUP BY t.AlbumKey";

fn visible_album_data_query(filter: Option<&Predicate>) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(ALBUM_DATA_SELECT);
    qb.push(ALBUM_DATA_VISIBLE);
    if let Some(filter) = filter {
        qb.push(" AND ");
        filter.push_sql(&mut qb);
    }
    qb.push(GROUP_BY_ALBUM_KEY);
    qb
}

async fn fetch_album_data(
    pool: &SqlitePool,
    mut qb: QueryBuilder<'_, Sqlite>,
) -> Result<Vec<AlbumData>> {
    let mut conn = db::connect(pool).await?;
    let albums = qb.build_query_as::<AlbumData>().fetch_all(&mut *conn).await?;
    Ok(albums)
}

/// Aggregates of every visible album.
pub async fn all_album_data(pool: &SqlitePool) -> Result<Vec<AlbumData>> {
    fetch_album_data(pool, visible_album_data_query(None)).await
}

/// Aggregates of visible albums with a track matching any of `artists`.
///
/// An empty artist list means no artist filter.
pub async fn artist_album_data(
    pool: &SqlitePool,
    artists: &[String],
    artist_type: ArtistType,
) -> Result<Vec<AlbumData>> {
    let filter = (!artists.is_empty()).then(|| Predicate::artists(artists, artist_type));
    fetch_album_data(pool, visible_album_data_query(filter.as_ref())).await
}

/// Aggregates of visible albums with a track in any of `genres`.
///
/// An empty genre list means no genre filter.
pub async fn genre_album_data(pool: &SqlitePool, genres: &[String]) -> Result<Vec<AlbumData>> {
    let filter = (!genres.is_empty()).then(|| Predicate::genres(genres));
    fetch_album_data(pool, visible_album_data_query(filter.as_ref())).await
}

/// Aggregates for the given keys, visible or not.
pub async fn album_data_for_keys(pool: &SqlitePool, album_keys: &[String]) -> Result<Vec<AlbumData>> {
    if album_keys.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::new(ALBUM_DATA_SELECT);
    qb.push(" WHERE ");
    Predicate::album_keys(album_keys).push_sql(&mut qb);
    qb.push(GROUP_BY_ALBUM_KEY);
    fetch_album_data(pool, qb).await
}

/// Aggregate for a single album.
pub async fn album_data(pool: &SqlitePool, album_key: &str) -> Result<Option<AlbumData>> {
    let mut albums = album_data_for_keys(pool, &[album_key.to_string()]).await?;
    Ok(albums.pop())
}

/// Albums that still need artwork: no cached artwork, a usable key and at
/// least one track flagged for artwork indexing.
pub async fn album_data_to_index(pool: &SqlitePool) -> Result<Vec<AlbumData>> {
    let mut qb = QueryBuilder::new(ALBUM_DATA_SELECT);
    qb.push(
        " WHERE t.AlbumKey NOT IN (SELECT AlbumKey FROM AlbumArtwork) \
         AND t.AlbumKey IS NOT NULL AND t.AlbumKey <> '' \
         AND t.NeedsAlbumArtworkIndexing = 1",
    );
    qb.push(GROUP_BY_ALBUM_KEY);
    fetch_album_data(pool, qb).await
}

/// Album rows for the given keys.
pub async fn albums(pool: &SqlitePool, album_keys: &[String]) -> Result<HashMap<String, Album>> {
    if album_keys.is_empty() {
        return Ok(HashMap::new());
    }

    let mut conn = db::connect(pool).await?;
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT a.* FROM Album a WHERE ");
    let mut keys = qb.separated(", ");
    keys.push_unseparated("a.AlbumKey IN (");
    for key in album_keys {
        keys.push_bind(key.as_str());
    }
    keys.push_unseparated(")");

    let rows = qb.build_query_as::<Album>().fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().map(|a| (a.album_key.clone(), a)).collect())
}

/// A single album row.
pub async fn album(pool: &SqlitePool, album_key: &str) -> Result<Option<Album>> {
    let mut conn = db::connect(pool).await?;
    let album = sqlx::query_as::<_, Album>("SELECT * FROM Album WHERE AlbumKey = ?")
        .bind(album_key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(album)
}

/// Album keys referenced by tracks but missing an `Album` row.
pub async fn albums_to_index(pool: &SqlitePool) -> Result<Vec<String>> {
    let mut conn = db::connect(pool).await?;
    let keys = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT t.AlbumKey FROM Track t \
         WHERE t.AlbumKey NOT IN (SELECT AlbumKey FROM Album) \
         AND t.AlbumKey IS NOT NULL AND t.AlbumKey <> ''",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(keys)
}

/// Create default album rows for `album_keys`, skipping existing ones.
///
/// Returns how many rows were created.
pub async fn add_albums(pool: &SqlitePool, album_keys: &[String]) -> Result<u64> {
    let mut conn = db::connect(pool).await?;
    let mut tx = conn.begin().await?;

    let mut added = 0;
    for key in album_keys {
        added += sqlx::query("INSERT OR IGNORE INTO Album (AlbumKey) VALUES (?)")
            .bind(key)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;
    Ok(added)
}

/// Set the love state of an album.
///
/// `DateAlbumLoved` is only written when `date_loved` is given.
pub async fn update_album_love(
    pool: &SqlitePool,
    album_key: &str,
    love: bool,
    date_loved: Option<i64>,
) -> Result<bool> {
    let mut conn = db::connect(pool).await?;
    let result = match date_loved {
        Some(date) => {
            sqlx::query("UPDATE Album SET AlbumLove = ?, DateAlbumLoved = ? WHERE AlbumKey = ?")
                .bind(love as i64)
                .bind(date)
                .bind(album_key)
                .execute(&mut *conn)
                .await?
        }
        None => {
            sqlx::query("UPDATE Album SET AlbumLove = ? WHERE AlbumKey = ?")
                .bind(love as i64)
                .bind(album_key)
                .execute(&mut *conn)
                .await?
        }
    };
    Ok(result.rows_affected() > 0)
}

/// Delete album rows no track references any more.
pub async fn delete_unused_albums(pool: &SqlitePool) -> Result<u64> {
    let mut conn = db::connect(pool).await?;
    // NOT IN over a NULL-bearing subquery never matches
    let result = sqlx::query(
        "DELETE FROM Album WHERE AlbumKey NOT IN \
         (SELECT DISTINCT AlbumKey FROM Track WHERE AlbumKey IS NOT NULL)",
    )
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// All cached artwork references.
pub async fn album_artwork(pool: &SqlitePool) -> Result<Vec<AlbumArtwork>> {
    let mut conn = db::connect(pool).await?;
    let rows = sqlx::query_as::<_, AlbumArtwork>("SELECT * FROM AlbumArtwork")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Record cached artwork for an album.
pub async fn add_album_artwork(pool: &SqlitePool, album_key: &str, artwork_id: &str) -> Result<i64> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query("INSERT INTO AlbumArtwork (AlbumKey, ArtworkID) VALUES (?, ?)")
        .bind(album_key)
        .bind(artwork_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}
