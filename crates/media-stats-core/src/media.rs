use std::str::FromStr;

use serde::Serialize;

use crate::diagnostic::SkipReason;

/// A record kind that can be built from one five-field input line.
pub trait Record: Sized {
    /// Dataset name, lowercase plural ("tracks", "videos")
    const KIND: &'static str;
    /// Expected header columns, in file order
    const COLUMNS: [&'static str; 5];

    fn from_fields(fields: [&str; 5]) -> Result<Self, SkipReason>;
    fn title(&self) -> &str;
    /// Duration in seconds
    fn duration(&self) -> i32;
}

fn parse_int<T: FromStr>(column: &'static str, value: &str) -> Result<T, SkipReason> {
    value.parse().map_err(|_| SkipReason::InvalidNumber {
        column,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    title: String,
    artist: String,
    genre: String,
    duration: i32,
    rating: i32,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
        duration: i32,
        rating: i32,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            genre: genre.into(),
            duration,
            rating,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// Nominally 1..=10, not enforced
    pub fn rating(&self) -> i32 {
        self.rating
    }
}

impl Record for Track {
    const KIND: &'static str = "tracks";
    const COLUMNS: [&'static str; 5] = ["Title", "Artist", "Genre", "Duration", "Rating"];

    fn from_fields([title, artist, genre, duration, rating]: [&str; 5]) -> Result<Self, SkipReason> {
        Ok(Track::new(
            title,
            artist,
            genre,
            parse_int("Duration", duration)?,
            parse_int("Rating", rating)?,
        ))
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn duration(&self) -> i32 {
        self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    title: String,
    channel: String,
    category: String,
    duration: i32,
    views: i64,
}

impl Video {
    pub fn new(
        title: impl Into<String>,
        channel: impl Into<String>,
        category: impl Into<String>,
        duration: i32,
        views: i64,
    ) -> Self {
        Self {
            title: title.into(),
            channel: channel.into(),
            category: category.into(),
            duration,
            views,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn views(&self) -> i64 {
        self.views
    }
}

impl Record for Video {
    const KIND: &'static str = "videos";
    const COLUMNS: [&'static str; 5] = ["Title", "Channel", "Category", "Duration", "Views"];

    fn from_fields([title, channel, category, duration, views]: [&str; 5]) -> Result<Self, SkipReason> {
        Ok(Video::new(
            title,
            channel,
            category,
            parse_int("Duration", duration)?,
            parse_int("Views", views)?,
        ))
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn duration(&self) -> i32 {
        self.duration
    }
}

/// Ordered collection of same-kind records. Insertion order is kept, duplicates allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist<R> {
    items: Vec<R>,
}

impl<R> Playlist<R> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, item: R) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<R> Default for Playlist<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> FromIterator<R> for Playlist<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, R> IntoIterator for &'a Playlist<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_from_fields() {
        let t = Track::from_fields(["Shape of You", "Ed Sheeran", "Pop", "240", "9"]).unwrap();
        assert_eq!(t.title(), "Shape of You");
        assert_eq!(t.artist(), "Ed Sheeran");
        assert_eq!(t.genre(), "Pop");
        assert_eq!(t.duration(), 240);
        assert_eq!(t.rating(), 9);
    }

    #[test]
    fn test_numeric_columns_are_named_on_failure() {
        let err = Track::from_fields(["A", "B", "Pop", "4:00", "9"]).unwrap_err();
        assert_eq!(
            err,
            SkipReason::InvalidNumber {
                column: "Duration",
                value: "4:00".to_string()
            }
        );

        let err = Video::from_fields(["A", "B", "Food", "60", "lots"]).unwrap_err();
        assert!(matches!(err, SkipReason::InvalidNumber { column: "Views", .. }));
    }

    #[test]
    fn test_out_of_range_values_are_accepted() {
        let t = Track::from_fields(["A", "B", "Rock", "-5", "42"]).unwrap();
        assert_eq!(t.duration(), -5);
        assert_eq!(t.rating(), 42);

        let v = Video::from_fields(["A", "B", "Sports", "+90", "3000000000"]).unwrap();
        assert_eq!(v.duration(), 90);
        assert_eq!(v.views(), 3_000_000_000);
    }

    #[test]
    fn test_playlist_keeps_insertion_order() {
        let mut playlist = Playlist::new();
        playlist.add(Track::new("B", "x", "Pop", 1, 1));
        playlist.add(Track::new("A", "x", "Pop", 1, 1));
        playlist.add(Track::new("B", "x", "Pop", 1, 1));
        let titles: Vec<&str> = playlist.items().iter().map(|t| t.title()).collect();
        assert_eq!(titles, ["B", "A", "B"]);
        assert_eq!(playlist.len(), 3);
    }
}
