//! Database connection handling.
//!
//! Uses SQLx with SQLite for the embedded library file. This module is the
//! connection factory: it creates the file, builds the pool and runs the
//! embedded migrations. Queries live in [`crate::repository`].
//!
//! # Example
//!
//! ```ignore
//! use music_collection::db::{db_url, init_db};
//!
//! let pool = init_db(&db_url(None), 5).await?;
//! ```

use sqlx::migrate::MigrateDatabase;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};

use crate::error::{Error, Result};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "music_collection.db";

/// Default pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to `max_connections` connections, and runs all pending
/// migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str, max_connections: u32) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        Sqlite::create_database(db_url)
            .await
            .map_err(Error::connection)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(db_url)
        .await
        .map_err(Error::connection)?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(target: "db", url = db_url, "Database ready");
    Ok(pool)
}

/// Acquire a scoped connection from the pool.
///
/// The connection goes back to the pool when dropped. Failures are reported
/// as [`Error::Connection`] so they can be told apart from statement errors.
pub async fn connect(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>> {
    pool.acquire().await.map_err(Error::connection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let url = db_url(Some(&db_path));

        let pool = init_db(&url, 2).await.expect("Failed to init db");
        assert!(db_path.exists());

        // Every table of the schema is queryable
        for table in [
            "Track",
            "Album",
            "AlbumArtwork",
            "Folder",
            "FolderTrack",
            "QueuedTrack",
            "RemovedTrack",
        ] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} should start empty");
        }
    }

    #[tokio::test]
    async fn test_init_db_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = db_url(Some(&temp_dir.path().join("test.db")));

        let first = init_db(&url, 1).await.unwrap();
        first.close().await;
        init_db(&url, 1).await.expect("Reopening should not re-run migrations");
    }

    #[tokio::test]
    async fn test_connect_on_closed_pool_is_connection_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = db_url(Some(&temp_dir.path().join("test.db")));
        let pool = init_db(&url, 1).await.unwrap();
        pool.close().await;

        let err = connect(&pool).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    }

    #[test]
    fn test_db_url_default() {
        assert_eq!(db_url(None), "sqlite:music_collection.db");
    }
}
