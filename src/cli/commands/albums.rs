//! Album listing and album love commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use super::open_repository;
use crate::collection::{AlbumItem, AlbumOrder, CollectionService};
use crate::config::Config;
use crate::model::{ArtistType, ticks};
use crate::projection::{
    AlbumProjection, CollectionEvent, ProjectionChange, ProjectionController, ProjectionEvent,
};
use crate::search::SearchService;

/// Options for [`cmd_albums`].
pub struct AlbumsArgs<'a> {
    pub order: AlbumOrder,
    pub love_only: bool,
    pub search: Option<&'a str>,
    pub artists: &'a [String],
    pub artist_type: ArtistType,
    pub genres: &'a [String],
    pub json: bool,
}

/// List albums the way a collection view shows them
pub fn cmd_albums(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    args: &AlbumsArgs<'_>,
) -> anyhow::Result<()> {
    let albums = rt.block_on(async {
        let repo = open_repository(db, config).await?;
        let service = CollectionService::new(
            Arc::new(repo),
            config.collection.resolved_artwork_dir(),
        );

        let mut albums = if !args.artists.is_empty() {
            service
                .get_artist_albums(args.artists, args.artist_type)
                .await
        } else if !args.genres.is_empty() {
            service.get_genre_albums(args.genres).await
        } else {
            service.get_all_albums().await
        };

        let artwork = service.artwork_paths(None).await;
        for album in &mut albums {
            album.artwork_path = artwork.get(&album.album_key).cloned();
        }
        anyhow::Ok(service.order_albums(albums, args.order).await)
    })?;

    let mut projection = AlbumProjection::new(args.order, args.love_only);
    projection.fill(albums);
    if let Some(search) = args.search {
        projection.reconcile(ProjectionEvent::SearchTextChanged(search.to_string()));
    }

    if args.json {
        let visible: Vec<&AlbumItem> = projection.visible().collect();
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    for album in projection.visible() {
        print_album(album);
    }
    println!();
    println!(
        "{} albums ({})",
        projection.visible_len(),
        projection.order().label()
    );
    Ok(())
}

fn print_album(album: &AlbumItem) {
    let love = if album.album_love { "♥" } else { " " };
    let year = album
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let mut line = format!("{} {} {} - {}", love, year, album.album_artist, album.album_title);
    if let Some(played) = album.date_last_played.and_then(ticks::to_datetime) {
        line.push_str(&format!("  (played {})", played.format("%Y-%m-%d")));
    }
    println!("{}", line);
}

/// Browse albums; each line read from stdin replaces the search text
pub fn cmd_browse(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    order: AlbumOrder,
    love_only: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let repo = open_repository(db, config).await?;
        let service = CollectionService::new(
            Arc::new(repo),
            config.collection.resolved_artwork_dir(),
        );
        let (controller, changes) = ProjectionController::new(service, order, love_only);

        let (lines_tx, lines_rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else { break };
                if lines_tx.send(line).is_err() {
                    break;
                }
            }
        });

        browse(
            &controller,
            changes,
            lines_rx,
            config.collection.search_timeout(),
            |albums| {
                println!("---");
                for album in albums {
                    print_album(album);
                }
                println!("{} albums ({})", albums.len(), controller.order().label());
            },
        )
        .await;
        Ok(())
    })
}

/// Feed `lines` through a debounced search into `controller`, calling `show`
/// with the visible albums after every change. Returns once `lines` closes
/// and the last pending search has been applied.
async fn browse(
    controller: &ProjectionController,
    mut changes: mpsc::UnboundedReceiver<Vec<ProjectionChange>>,
    mut lines: mpsc::UnboundedReceiver<String>,
    search_timeout: Duration,
    mut show: impl FnMut(&[AlbumItem]),
) {
    let (search, mut searches) = SearchService::start(search_timeout);
    controller.reload().await;

    loop {
        tokio::select! {
            Some(text) = searches.recv() => {
                controller.handle(CollectionEvent::SearchTextChanged(text)).await;
            }
            Some(_) = changes.recv() => show(&controller.visible()),
            line = lines.recv() => match line {
                Some(line) => search.set_text(line),
                None => break,
            },
        }
    }

    // Input ended; let a search still being debounced fire
    tokio::time::sleep(search_timeout * 2).await;
    while let Ok(text) = searches.try_recv() {
        controller.handle(CollectionEvent::SearchTextChanged(text)).await;
    }
    let mut changed = false;
    while changes.try_recv().is_ok() {
        changed = true;
    }
    if changed {
        show(&controller.visible());
    }
}

/// Love or unlove an album
pub fn cmd_love_album(
    rt: &Runtime,
    db: Option<&Path>,
    config: &Config,
    album_key: &str,
    love: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let repo = open_repository(db, config).await?;
        let service = CollectionService::new(
            Arc::new(repo),
            config.collection.resolved_artwork_dir(),
        );
        let (controller, _changes) = ProjectionController::new(
            service,
            config.collection.album_order,
            config.collection.love_only,
        );

        if controller.set_album_love(album_key, love).await {
            println!(
                "{} {}",
                if love { "Loved" } else { "Unloved" },
                album_key
            );
            Ok(())
        } else {
            anyhow::bail!("No album row for key {:?} (run `gc` to create missing albums)", album_key)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SqliteTrackRepository;
    use crate::test_utils::{insert_album, insert_visible_track, mock_track, temp_db};

    #[tokio::test]
    async fn test_browse_applies_debounced_search() {
        let (pool, dir) = temp_db().await;
        for (key, title) in [("k1", "Alpha"), ("k2", "Beta")] {
            insert_album(&pool, key, None, None).await;
            let mut track = mock_track(&format!("/music/{key}.mp3"), key);
            track.album_title = Some(title.to_string());
            insert_visible_track(&pool, &track).await;
        }
        let service = CollectionService::new(
            Arc::new(SqliteTrackRepository::new(pool)),
            dir.path().join("artwork"),
        );
        let (controller, changes) =
            ProjectionController::new(service, AlbumOrder::Alphabetical, false);

        let (lines_tx, lines_rx) = mpsc::unbounded_channel();
        lines_tx.send("bet".to_string()).unwrap();
        lines_tx.send("beta".to_string()).unwrap();
        drop(lines_tx);

        let mut shown: Vec<Vec<String>> = Vec::new();
        browse(
            &controller,
            changes,
            lines_rx,
            Duration::from_millis(20),
            |albums| shown.push(albums.iter().map(|a| a.album_key.clone()).collect()),
        )
        .await;

        assert_eq!(shown.last(), Some(&vec!["k2".to_string()]));
    }
}
