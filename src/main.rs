//! Music Collection - the collection engine of a music player.
//!
//! Keeps a SQLite library of tracks and albums, aggregates albums for
//! collection views, and keeps an ordered, filtered album projection in sync
//! with love, playback and artwork changes. The binary exposes the library
//! through CLI commands.

pub mod cli;
pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod projection;
pub mod query;
pub mod repository;
pub mod search;
#[cfg(test)]
pub mod test_utils;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over the configured default
    let default_filter = config::load().logging.filter;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_filter))
        .unwrap_or_else(|_| EnvFilter::new("music_collection=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if !cli::run_command(&args)? {
        // No command specified
        cli::Cli::command().print_help()?;
        println!();
    }
    Ok(())
}
