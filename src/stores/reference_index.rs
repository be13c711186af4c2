//! Reference index - distinct normalized values drawn from the catalog
//!
//! Built once at startup and shared read-only by every request. Values keep
//! the order in which they first appear in the catalog, which decides which
//! mood or language wins when an utterance mentions several.

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use crate::models::{Column, TrackRecord};
use crate::stores::Catalog;

/// Distinct moods, artists, languages, albums and song names
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    moods: Vec<String>,
    artists: Vec<String>,
    languages: Vec<String>,
    albums: Vec<String>,
    song_names: Vec<String>,
    /// Whole-word pattern per artist, in `artists` order
    artist_patterns: Vec<(String, Regex)>,
}

impl ReferenceIndex {
    /// Build the index from a loaded catalog
    pub fn build(catalog: &Catalog) -> Self {
        let tracks = catalog.tracks();
        let artists = distinct(tracks, Column::ArtistName);

        let artist_patterns = artists
            .iter()
            .filter_map(|artist| {
                let pattern = format!(r"\b{}\b", regex::escape(artist));
                match Regex::new(&pattern) {
                    Ok(re) => Some((artist.clone(), re)),
                    Err(e) => {
                        warn!("Skipping word pattern for artist '{}': {}", artist, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            moods: distinct(tracks, Column::MoodLabel),
            languages: distinct(tracks, Column::Language),
            albums: distinct(tracks, Column::AlbumName),
            song_names: distinct(tracks, Column::SongName),
            artists,
            artist_patterns,
        }
    }

    pub fn moods(&self) -> &[String] {
        &self.moods
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn albums(&self) -> &[String] {
        &self.albums
    }

    pub fn song_names(&self) -> &[String] {
        &self.song_names
    }

    /// First artist whose full name appears as whole words in `text`
    pub fn artist_in_text(&self, text: &str) -> Option<&str> {
        self.artist_patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(artist, _)| artist.as_str())
    }
}

/// Distinct non-empty values of a column in first-appearance order
fn distinct(tracks: &[TrackRecord], column: Column) -> Vec<String> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .map(|t| t.field(column))
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(str::to_string)
        .collect()
}
