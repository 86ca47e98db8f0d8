//! Command-line interface for music-collection.
//!
//! This module provides CLI commands for browsing and maintaining a
//! collection library file.

mod commands;

pub use commands::{Cli, Commands, run_command};
