//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `albums`: Album listing, interactive browsing and album love
//! - `tracks`: Track listing, rating and removal
//! - `maintenance`: Album row upkeep and configuration

mod albums;
mod maintenance;
mod tracks;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::collection::AlbumOrder;
use crate::config::Config;
use crate::db;
use crate::model::ArtistType;
use crate::repository::SqliteTrackRepository;

pub use albums::{AlbumsArgs, cmd_albums, cmd_browse, cmd_love_album};
pub use maintenance::{cmd_config, cmd_gc};
pub use tracks::{TracksArgs, cmd_rate, cmd_remove, cmd_tracks};

/// Music Collection CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Library database (overrides the configured path)
    #[arg(long, global = true, env = "MUSIC_COLLECTION_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List albums in collection order
    Albums {
        /// Album order (default: configured order)
        #[arg(short, long, value_enum)]
        order: Option<AlbumOrder>,
        /// Only show loved albums
        #[arg(long)]
        love_only: bool,
        /// Search text matched against title, artist and year
        #[arg(short, long)]
        search: Option<String>,
        /// Restrict to albums of these artists
        #[arg(long)]
        artist: Vec<String>,
        /// Which artist columns `--artist` matches
        #[arg(long, value_enum, default_value = "all")]
        artist_type: ArtistType,
        /// Restrict to albums in these genres
        #[arg(long)]
        genre: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Browse albums, reading search text from stdin line by line
    Browse {
        /// Album order (default: configured order)
        #[arg(short, long, value_enum)]
        order: Option<AlbumOrder>,
        /// Only show loved albums
        #[arg(long)]
        love_only: bool,
    },
    /// List visible tracks
    Tracks {
        /// Tracks whose track or album artists include these
        #[arg(long)]
        artist: Vec<String>,
        /// Tracks in these genres
        #[arg(long)]
        genre: Vec<String>,
        /// Tracks of these album keys
        #[arg(long)]
        album: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Love or unlove an album
    LoveAlbum {
        /// Album key
        album_key: String,
        /// Remove the love instead
        #[arg(long)]
        unlove: bool,
    },
    /// Rate a track (0-5)
    Rate {
        /// Path to the track
        path: String,
        /// Rating, clamped to 0-5
        rating: i64,
    },
    /// Remove tracks from the collection
    Remove {
        /// Paths of the tracks to remove
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Create missing album rows and delete unused ones
    Gc,
    /// Print the config file location and effective settings
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        write: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let Some(command) = &cli.command else {
        return Ok(false);
    };

    let config = crate::config::load();
    let rt = Runtime::new()?;
    let db = cli.db.as_deref();

    match command {
        Commands::Albums {
            order,
            love_only,
            search,
            artist,
            artist_type,
            genre,
            json,
        } => {
            let args = AlbumsArgs {
                order: order.unwrap_or(config.collection.album_order),
                love_only: *love_only || config.collection.love_only,
                search: search.as_deref(),
                artists: artist,
                artist_type: *artist_type,
                genres: genre,
                json: *json,
            };
            cmd_albums(&rt, db, &config, &args)?;
        }
        Commands::Browse { order, love_only } => {
            cmd_browse(
                &rt,
                db,
                &config,
                order.unwrap_or(config.collection.album_order),
                *love_only || config.collection.love_only,
            )?;
        }
        Commands::Tracks {
            artist,
            genre,
            album,
            json,
        } => {
            let args = TracksArgs {
                artists: artist,
                genres: genre,
                album_keys: album,
                json: *json,
            };
            cmd_tracks(&rt, db, &config, &args)?;
        }
        Commands::LoveAlbum { album_key, unlove } => {
            cmd_love_album(&rt, db, &config, album_key, !unlove)?;
        }
        Commands::Rate { path, rating } => {
            cmd_rate(&rt, db, &config, path, *rating)?;
        }
        Commands::Remove { paths } => {
            cmd_remove(&rt, db, &config, paths)?;
        }
        Commands::Gc => {
            cmd_gc(&rt, db, &config)?;
        }
        Commands::Config { write } => {
            cmd_config(&rt, db, &config, *write)?;
        }
    }
    Ok(true)
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// The library file to open: `--db` wins over the configured path.
pub(crate) fn library_path(db: Option<&Path>, config: &Config) -> PathBuf {
    db.map(Path::to_path_buf)
        .unwrap_or_else(|| config.database.resolved_path())
}

/// Open the library and wrap it in a repository.
pub(crate) async fn open_repository(
    db: Option<&Path>,
    config: &Config,
) -> anyhow::Result<SqliteTrackRepository> {
    let path = library_path(db, config);
    let pool = db::init_db(&db::db_url(Some(&path)), config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open library {}", path.display()))?;
    Ok(SqliteTrackRepository::new(pool))
}
