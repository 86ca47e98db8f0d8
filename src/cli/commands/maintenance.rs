//! Album row upkeep and configuration commands.

use std::path::Path;
use tokio::runtime::Runtime;
use tracing::info;

use super::{library_path, open_repository};
use crate::config::{self, Config};
use crate::repository::TrackRepository;

/// Create album rows for new album keys and delete rows no track uses
pub fn cmd_gc(rt: &Runtime, db: Option<&Path>, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let repo = open_repository(db, config).await?;

        let missing = repo.get_albums_to_index().await;
        let created = repo.add_albums(&missing).await;
        let deleted = repo.delete_unused_albums().await;

        info!(target: "cli::gc", created, deleted, "Album rows updated");
        println!("Created {} album rows, deleted {} unused.", created, deleted);
        Ok(())
    })
}

/// Print the config file location and the effective settings
pub fn cmd_config(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    write: bool,
) -> anyhow::Result<()> {
    if write {
        let path = rt.block_on(config::save_async(config.clone()))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    match config::config_path() {
        Some(path) if path.exists() => println!("# Config file: {}", path.display()),
        Some(path) => println!("# Config file: {} (not created, using defaults)", path.display()),
        None => println!("# No config directory on this platform"),
    }
    println!("# Library: {}", library_path(db, config).display());
    println!(
        "# Artwork cache: {}",
        config.collection.resolved_artwork_dir().display()
    );
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
