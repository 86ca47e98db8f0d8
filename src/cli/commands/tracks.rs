//! Track listing, rating and removal commands.

use std::path::Path;
use tokio::runtime::Runtime;
use tracing::warn;

use super::open_repository;
use crate::config::Config;
use crate::model::{ArtistType, Track, multi_value};
use crate::query::Predicate;
use crate::repository::{RemoveTracksResult, TrackRepository};

/// Options for [`cmd_tracks`].
pub struct TracksArgs<'a> {
    pub artists: &'a [String],
    pub genres: &'a [String],
    pub album_keys: &'a [String],
    pub json: bool,
}

impl TracksArgs<'_> {
    /// All given filters combined; `None` lists every visible track.
    fn predicate(&self) -> Option<Predicate> {
        let mut filters = Vec::new();
        if !self.artists.is_empty() {
            filters.push(Predicate::artists(self.artists, ArtistType::All));
        }
        if !self.genres.is_empty() {
            filters.push(Predicate::genres(self.genres));
        }
        if !self.album_keys.is_empty() {
            filters.push(Predicate::album_keys(self.album_keys));
        }
        filters.into_iter().reduce(Predicate::and)
    }
}

/// List visible tracks
pub fn cmd_tracks(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    args: &TracksArgs<'_>,
) -> anyhow::Result<()> {
    let tracks = rt.block_on(async {
        let repo = open_repository(db, config).await?;
        anyhow::Ok(repo.get_visible_tracks(args.predicate()).await)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
        return Ok(());
    }

    for track in &tracks {
        print_track(track);
    }
    println!();
    println!("{} tracks", tracks.len());
    Ok(())
}

fn print_track(track: &Track) {
    let artists = multi_value::split(track.artists.as_deref()).join(", ");
    let title = track
        .track_title
        .as_deref()
        .or(track.file_name.as_deref())
        .unwrap_or(&track.path);
    println!("{} - {} [{}]", artists, title, track.path);
}

/// Rate a track
pub fn cmd_rate(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    path: &str,
    rating: i64,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let repo = open_repository(db, config).await?;
        if repo.update_rating(path, rating).await {
            println!("Rated {} ({}/5)", path, rating.clamp(0, 5));
            Ok(())
        } else {
            anyhow::bail!("No track at {}", path)
        }
    })
}

/// Remove tracks from the collection
pub fn cmd_remove(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    paths: &[String],
) -> anyhow::Result<()> {
    rt.block_on(async {
        let repo = open_repository(db, config).await?;

        let mut tracks = Vec::with_capacity(paths.len());
        for path in paths {
            match repo.get_track(path).await {
                Some(track) => tracks.push(track),
                None => warn!(target: "cli::remove", path = %path, "Track not in collection"),
            }
        }
        if tracks.is_empty() {
            println!("Nothing to remove.");
            return Ok(());
        }

        match repo.remove_tracks(&tracks).await {
            RemoveTracksResult::Success => {
                println!("Removed {} tracks.", tracks.len());
                Ok(())
            }
            RemoveTracksResult::Error => {
                anyhow::bail!("Removal failed; no tracks were removed")
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_combines_filters() {
        let artists = vec!["Air".to_string()];
        let genres = vec!["Jazz".to_string()];
        let none: Vec<String> = Vec::new();

        let args = TracksArgs {
            artists: &none,
            genres: &none,
            album_keys: &none,
            json: false,
        };
        assert!(args.predicate().is_none());

        let args = TracksArgs {
            artists: &artists,
            genres: &genres,
            album_keys: &none,
            json: false,
        };
        assert_eq!(
            args.predicate(),
            Some(Predicate::artists(&artists[..], ArtistType::All).and(Predicate::genres(&genres)))
        );
    }
}
