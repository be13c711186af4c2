//! Entity extraction - turns a chat utterance into a structured music query
//!
//! Mood and language are exact token matches and only act as modifiers.
//! Albums, artists and songs are resolved against the reference index with
//! fuzzy matching, using looser cutoffs only where a keyword ("album",
//! "movie", "songs by") makes the intent unambiguous.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::stores::ReferenceIndex;
use crate::utils::fuzzy::{best_match, extract_one, Scorer, ALL_SCORERS};
use crate::utils::normalize::{normalize_text, split_letter_digit};

/// Album match cutoff when the utterance says "album" or "movie"
const LOOSE_ALBUM_CUTOFF: f64 = 60.0;
/// Album match cutoff when no album keyword is present
const STRICT_ALBUM_CUTOFF: f64 = 95.0;
/// Artist cutoff among artists that contain the requested name
const ARTIST_SUBSTRING_CUTOFF: f64 = 70.0;
/// Artist cutoff against the whole artist list
const ARTIST_STRICT_CUTOFF: f64 = 80.0;
const SONG_CUTOFF: f64 = 75.0;

const ALBUM_KEYWORDS: [&str; 2] = ["album", "movie"];

const ALBUM_STOPWORDS: [&str; 8] = [
    "play", "movie", "album", "songs", "song", "music", "some", "from",
];

const SONG_STOPWORDS: [&str; 7] = ["play", "song", "songs", "music", "some", "by", "of"];

lazy_static! {
    // "songs by <artist>" / "songs of <artist>"
    static ref ARTIST_REQUEST_PATTERN: Regex = Regex::new(r"songs\s+(?:by|of)\s+(.+)").unwrap();
}

/// Everything recognised in one utterance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub artist: Option<String>,
    pub mood: Option<String>,
    pub language: Option<String>,
    pub album: Option<String>,
    pub song: Option<String>,
    /// The utterance mentions "album" or "movie"
    pub album_requested: bool,
}

/// Extracts [`Entities`] using the catalog's reference values
pub struct EntityExtractor<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> EntityExtractor<'a> {
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index }
    }

    pub fn extract(&self, utterance: &str) -> Entities {
        let lowered = utterance.to_lowercase();
        let query = split_letter_digit(&normalize_text(utterance));
        let tokens: Vec<&str> = query.split_whitespace().collect();

        let mood = first_token_match(self.index.moods(), &tokens);
        let language = first_token_match(self.index.languages(), &tokens);

        let album_requested = ALBUM_KEYWORDS.iter().any(|k| lowered.contains(k));
        let album = self.find_album(&query, &tokens, album_requested);
        let artist = self.find_artist(&lowered, &query);

        let song = if artist.is_none() && !album_requested {
            self.find_song(&query, &tokens, mood.as_deref(), language.as_deref())
        } else {
            None
        };

        let entities = Entities {
            artist,
            mood,
            language,
            album,
            song,
            album_requested,
        };
        debug!("Extracted entities from '{}': {:?}", utterance, entities);
        entities
    }

    fn find_album(&self, query: &str, tokens: &[&str], album_requested: bool) -> Option<String> {
        let albums = self.index.albums();

        if !album_requested {
            return extract_one(query, albums, Scorer::Ratio, STRICT_ALBUM_CUTOFF)
                .map(|m| m.value.to_string());
        }

        // "play bolidan movie songs" -> "bolidan"
        let candidate = tokens
            .iter()
            .filter(|t| !ALBUM_STOPWORDS.contains(*t))
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        if !candidate.is_empty() {
            if let Some(m) = extract_one(&candidate, albums, Scorer::Ratio, LOOSE_ALBUM_CUTOFF) {
                return Some(m.value.to_string());
            }
        }

        extract_one(query, albums, Scorer::TokenSetRatio, LOOSE_ALBUM_CUTOFF)
            .map(|m| m.value.to_string())
    }

    fn find_artist(&self, lowered: &str, query: &str) -> Option<String> {
        let requested = ARTIST_REQUEST_PATTERN
            .captures(lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| normalize_text(m.as_str()))
            .filter(|name| !name.is_empty());

        if let Some(name) = requested {
            let artists = self.index.artists();
            let containing: Vec<&str> = artists
                .iter()
                .map(String::as_str)
                .filter(|artist| artist.contains(name.as_str()))
                .collect();

            let found = if containing.is_empty() {
                extract_one(&name, artists, Scorer::Ratio, ARTIST_STRICT_CUTOFF)
                    .map(|m| m.value.to_string())
            } else {
                extract_one(&name, &containing, Scorer::PartialRatio, ARTIST_SUBSTRING_CUTOFF)
                    .map(|m| m.value.to_string())
            };

            if found.is_some() {
                return found;
            }
        }

        self.index.artist_in_text(query).map(str::to_string)
    }

    fn find_song(
        &self,
        query: &str,
        tokens: &[&str],
        mood: Option<&str>,
        language: Option<&str>,
    ) -> Option<String> {
        let remaining: Vec<&str> = tokens
            .iter()
            .filter(|t| !SONG_STOPWORDS.contains(*t))
            .copied()
            .collect();

        if is_generic_request(&remaining, mood, language) {
            return None;
        }

        let songs = self.index.song_names();
        if let Some(song) = songs.iter().find(|s| query.contains(s.as_str())) {
            return Some(song.clone());
        }

        best_match(query, songs, &ALL_SCORERS, SONG_CUTOFF).map(|m| {
            debug!("Fuzzy song match '{}' via {} ({:.1})", m.value, m.scorer.as_str(), m.score);
            m.value.to_string()
        })
    }
}

/// Nothing but mood and/or language words are left after stopword removal
fn is_generic_request(remaining: &[&str], mood: Option<&str>, language: Option<&str>) -> bool {
    if remaining.is_empty() {
        return true;
    }

    if let (Some(mood), Some(language)) = (mood, language) {
        let left: HashSet<&str> = remaining.iter().copied().collect();
        let pair: HashSet<&str> = [mood, language].into_iter().collect();
        if remaining.len() == 2 && left == pair {
            return true;
        }
    }

    let only = |word: Option<&str>| word.map_or(false, |w| remaining == [w]);
    only(language) || only(mood)
}

fn first_token_match(values: &[String], tokens: &[&str]) -> Option<String> {
    values
        .iter()
        .find(|value| tokens.contains(&value.as_str()))
        .cloned()
}
