//! Collection folders and the track-to-folder links that drive visibility.

use sqlx::sqlite::SqlitePool;

use crate::db;
use crate::error::Result;
use crate::model::{Folder, to_safe_path};

/// Register a folder and return its id.
pub async fn add_folder(pool: &SqlitePool, path: &str, show_in_collection: bool) -> Result<i64> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query("INSERT INTO Folder (Path, SafePath, ShowInCollection) VALUES (?, ?, ?)")
        .bind(path)
        .bind(to_safe_path(path))
        .bind(show_in_collection as i64)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Link a track to a folder.
pub async fn add_folder_track(pool: &SqlitePool, folder_id: i64, track_id: i64) -> Result<()> {
    let mut conn = db::connect(pool).await?;
    sqlx::query("INSERT INTO FolderTrack (FolderID, TrackID) VALUES (?, ?)")
        .bind(folder_id)
        .bind(track_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Show or hide a folder's tracks in the collection.
pub async fn set_show_in_collection(pool: &SqlitePool, folder_id: i64, show: bool) -> Result<bool> {
    let mut conn = db::connect(pool).await?;
    let result = sqlx::query("UPDATE Folder SET ShowInCollection = ? WHERE FolderID = ?")
        .bind(show as i64)
        .bind(folder_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All folders.
pub async fn folders(pool: &SqlitePool) -> Result<Vec<Folder>> {
    let mut conn = db::connect(pool).await?;
    let rows = sqlx::query_as::<_, Folder>("SELECT * FROM Folder ORDER BY SafePath")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}
