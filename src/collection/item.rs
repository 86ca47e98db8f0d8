//! Album entries shown in collection views.

use serde::Serialize;
use std::path::PathBuf;

use super::sortable::to_sortable;
use crate::model::{AlbumData, PlaybackCounter, multi_value};

/// One album as the collection views see it.
///
/// Built from an [`AlbumData`] aggregate. Sort keys are computed once so
/// ordering a large collection does not re-normalize strings per comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumItem {
    pub album_key: String,
    pub album_title: String,
    /// First album artist, falling back to the first track artist
    pub album_artist: String,
    /// `None` when unknown (missing or zero)
    pub year: Option<i64>,
    pub date_added: Option<i64>,
    pub date_file_created: Option<i64>,
    pub date_last_played: Option<i64>,
    pub album_love: bool,
    pub date_album_loved: Option<i64>,
    pub artwork_path: Option<PathBuf>,
    #[serde(skip)]
    pub(crate) sort_title: String,
    #[serde(skip)]
    pub(crate) sort_artist: String,
}

impl AlbumItem {
    pub fn from_data(data: AlbumData) -> Self {
        let album_title = data.album_title.unwrap_or_default().trim().to_string();
        let album_artist = multi_value::split(data.album_artists.as_deref())
            .into_iter()
            .next()
            .or_else(|| multi_value::split(data.artists.as_deref()).into_iter().next())
            .unwrap_or_default();

        Self {
            sort_title: to_sortable(&album_title),
            sort_artist: to_sortable(&album_artist),
            album_key: data.album_key,
            album_title,
            album_artist,
            year: data.year.filter(|y| *y > 0),
            date_added: data.date_added,
            date_file_created: data.date_file_created,
            date_last_played: data.date_last_played,
            album_love: data.album_love.unwrap_or(0) != 0,
            date_album_loved: data.date_album_loved,
            artwork_path: None,
        }
    }

    /// Apply a playback counter event.
    pub fn update_counters(&mut self, counter: &PlaybackCounter) {
        if let Some(played) = counter.date_last_played {
            self.date_last_played = Some(played);
        }
    }

    /// Apply an album love event. The loved date only changes when given.
    pub fn update_love(&mut self, love: bool, date_loved: Option<i64>) {
        self.album_love = love;
        if date_loved.is_some() {
            self.date_album_loved = date_loved;
        }
    }

    /// Whether every search term appears in the title, the artist or the year.
    ///
    /// `terms` must already be lowercase.
    pub fn matches_search(&self, terms: &[String]) -> bool {
        let title = self.album_title.to_lowercase();
        let artist = self.album_artist.to_lowercase();
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();

        terms.iter().all(|term| {
            title.contains(term.as_str()) || artist.contains(term.as_str()) || year.contains(term.as_str())
        })
    }
}

impl From<AlbumData> for AlbumItem {
    fn from(data: AlbumData) -> Self {
        Self::from_data(data)
    }
}

/// Split a search text into lowercase terms.
pub fn search_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_album_data;

    #[test]
    fn test_from_data() {
        let mut data = mock_album_data("k1", " The Wall ", "Pink Floyd");
        data.year = Some(0);
        data.album_love = Some(1);
        let item = AlbumItem::from_data(data);

        assert_eq!(item.album_title, "The Wall");
        assert_eq!(item.sort_title, "wall");
        assert_eq!(item.album_artist, "Pink Floyd");
        assert_eq!(item.year, None);
        assert!(item.album_love);
    }

    #[test]
    fn test_artist_falls_back_to_track_artists() {
        let mut data = mock_album_data("k1", "Odelay", "x");
        data.album_artists = None;
        data.artists = multi_value::join(["Beck", "Dust Brothers"]);
        assert_eq!(AlbumItem::from_data(data).album_artist, "Beck");
    }

    #[test]
    fn test_update_love_keeps_date_without_new_one() {
        let mut item = AlbumItem::from_data(mock_album_data("k1", "A", "B"));
        item.update_love(true, Some(10));
        item.update_love(false, None);
        assert!(!item.album_love);
        assert_eq!(item.date_album_loved, Some(10));
    }

    #[test]
    fn test_matches_search() {
        let mut data = mock_album_data("k1", "Moon Safari", "Air");
        data.year = Some(1998);
        let item = AlbumItem::from_data(data);

        assert!(item.matches_search(&search_terms("moon")));
        assert!(item.matches_search(&search_terms("AIR 1998")));
        assert!(!item.matches_search(&search_terms("moon beck")));
        assert!(item.matches_search(&[]));
    }
}
