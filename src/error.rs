//! Application-wide error types.
//!
//! Library modules return [`Result`] with the unified [`Error`] enum, while
//! the CLI uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum, classified by [`Error::kind`]
//! - [`ResultExt`]: attach operation context to a failure
//! - [`LogOnError`]: log a failure and fall back to a default value. This is
//!   what the repository seam uses so callers never see a database error.
//!
//! # Example
//!
//! ```ignore
//! use music_collection::error::{LogOnError, ResultExt};
//!
//! let tracks = tracks::visible_tracks(&pool, None)
//!     .await
//!     .with_context("Could not get the visible tracks")
//!     .or_log_default("get_visible_tracks");
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The database handle could not be opened or acquired
    #[error("Could not connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed (malformed SQL, constraint violation, I/O error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Cannot open or acquire the database handle
    ConnectionFailure,
    /// A specific statement failed
    QueryFailure,
    /// Something expected to exist does not
    NotFound,
    /// Anything else (I/O, config)
    Other,
}

impl ErrorKind {
    /// Stable name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConnectionFailure => "connection_failure",
            ErrorKind::QueryFailure => "query_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Other => "other",
        }
    }
}

impl Error {
    /// Create a connection error.
    pub fn connection(source: sqlx::Error) -> Self {
        Self::Connection(source)
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Classify this error, looking through any context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection(_) => ErrorKind::ConnectionFailure,
            Error::Database(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) => {
                ErrorKind::ConnectionFailure
            }
            Error::Database(_) | Error::Migration(_) => ErrorKind::QueryFailure,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(_) | Error::Config(_) => ErrorKind::Other,
            Error::WithContext { source, .. } => source.kind(),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}

/// Log-and-default for operations whose callers have no error path.
pub trait LogOnError<T> {
    /// Log the failure under `operation` and return `T::default()`.
    fn or_log_default(self, operation: &str) -> T
    where
        T: Default;

    /// Log the failure under `operation` and return `fallback`.
    fn or_log(self, operation: &str, fallback: T) -> T;
}

impl<T> LogOnError<T> for Result<T> {
    fn or_log_default(self, operation: &str) -> T
    where
        T: Default,
    {
        self.or_log(operation, T::default())
    }

    fn or_log(self, operation: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(
                    target: "repository",
                    operation,
                    kind = e.kind().as_str(),
                    error = %e,
                    "Operation failed"
                );
                fallback
            }
        }
    }
}
