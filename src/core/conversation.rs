//! Conversation state machine
//!
//! A new query is routed to exactly one branch (album, specific song, artist
//! or generic), which picks the suggestions and rewrites the session's
//! follow-up context. An affirmation ("yes") continues from that context
//! without repeating anything in the last batch, and `next_song` walks the
//! current batch.

use rand::Rng;
use tracing::{debug, info};

use crate::core::extractor::{Entities, EntityExtractor};
use crate::core::intent::{classify, Intent};
use crate::core::prompt::title_case;
use crate::models::{Column, SessionContext, TrackView};
use crate::stores::{Catalog, ReferenceIndex, Selection};

pub const GREETING_REPLY: &str = "Hello there! How can I help you with your music today?";

/// Songs per batch for artist, random and affirmation suggestions
pub const BATCH_SIZE: usize = 2;
/// Similar songs added after a specific song
const SIMILAR_SONG_LIMIT: usize = 4;
/// Random songs offered once a follow-up has nothing new left
const ALTERNATIVES_SIZE: usize = 5;

const MORE_LIKE_THIS: &str = "Here are more songs you may like.";
const RANDOM_PICKS: &str = "Here are some random song recommendations.";
const NOTHING_NEW: &str = "No new songs available, here are some alternatives.";

/// Which recommendation path a new query takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBranch {
    Album,
    SpecificSong,
    Artist,
    Generic,
}

impl QueryBranch {
    /// First match wins: album (only when asked for), then song, then artist
    pub fn select(entities: &Entities) -> Self {
        if entities.album_requested && entities.album.is_some() {
            QueryBranch::Album
        } else if entities.song.is_some() {
            QueryBranch::SpecificSong
        } else if entities.artist.is_some() {
            QueryBranch::Artist
        } else {
            QueryBranch::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryBranch::Album => "album",
            QueryBranch::SpecificSong => "specific_song",
            QueryBranch::Artist => "artist",
            QueryBranch::Generic => "generic",
        }
    }
}

/// Result of routing a new query
#[derive(Debug, Clone)]
pub struct QueryTurn {
    pub branch: QueryBranch,
    pub entities: Entities,
    pub suggestions: Vec<TrackView>,
    /// Question the reply should end with, empty when there is none
    pub follow_up: String,
}

/// Result of an affirmation
#[derive(Debug, Clone)]
pub struct AffirmationTurn {
    pub message: String,
    pub suggestions: Vec<TrackView>,
    /// The follow-up context had nothing new, `suggestions` are alternatives
    pub exhausted: bool,
}

/// How a chat utterance should be answered
#[derive(Debug, Clone)]
pub enum Reply {
    Greeting,
    /// Not about music, answered by the text generator alone
    SmallTalk,
    Recommendation(QueryTurn),
}

/// Result of stepping through the current batch
#[derive(Debug, Clone, PartialEq)]
pub enum NextSong {
    /// Nothing has been recommended yet
    Empty,
    EndOfList,
    Track { index: usize, track: TrackView },
}

pub struct ConversationEngine<'a> {
    catalog: &'a Catalog,
    index: &'a ReferenceIndex,
}

impl<'a> ConversationEngine<'a> {
    pub fn new(catalog: &'a Catalog, index: &'a ReferenceIndex) -> Self {
        Self { catalog, index }
    }

    /// Classify an utterance and route it if it asks for music.
    ///
    /// Greetings and small talk leave the session untouched.
    pub fn respond<R: Rng + ?Sized>(
        &self,
        session: &mut SessionContext,
        utterance: &str,
        rng: &mut R,
    ) -> Reply {
        let intent = classify(utterance, self.index);
        debug!("Classified '{}' as {}", utterance, intent.as_str());

        match intent {
            Intent::Greeting => Reply::Greeting,
            Intent::Conversation => Reply::SmallTalk,
            Intent::SongRequest => Reply::Recommendation(self.handle_query(session, utterance, rng)),
        }
    }

    /// Route a new query and replace the session's batch with its suggestions
    pub fn handle_query<R: Rng + ?Sized>(
        &self,
        session: &mut SessionContext,
        utterance: &str,
        rng: &mut R,
    ) -> QueryTurn {
        let entities = EntityExtractor::new(self.index).extract(utterance);
        if let Some(language) = &entities.language {
            session.remember_language(language);
        }

        let branch = QueryBranch::select(&entities);
        let (suggestions, follow_up) = match branch {
            QueryBranch::Album => self.album_songs(session, entities.album.as_deref()),
            QueryBranch::SpecificSong => {
                self.specific_song(session, entities.song.as_deref(), rng)
            }
            QueryBranch::Artist => self.artist_songs(
                session,
                entities.artist.as_deref(),
                entities.language.as_deref(),
            ),
            QueryBranch::Generic => {
                session.forget_criteria();
                let rows = entities
                    .language
                    .as_deref()
                    .map(|language| self.catalog.filter_equals(Column::Language, language))
                    .filter(|rows| !rows.is_empty())
                    .unwrap_or_else(|| self.catalog.sample(BATCH_SIZE, rng));
                (rows.into_views(), String::new())
            }
        };

        info!(
            "Query routed to {} branch with {} suggestions",
            branch.as_str(),
            suggestions.len()
        );
        session.replace_queue(suggestions.clone());

        QueryTurn {
            branch,
            entities,
            suggestions,
            follow_up,
        }
    }

    fn album_songs(
        &self,
        session: &mut SessionContext,
        album: Option<&str>,
    ) -> (Vec<TrackView>, String) {
        let Some(album) = album else {
            return (Vec::new(), String::new());
        };

        let rows = self
            .catalog
            .filter_equals(Column::AlbumName, album)
            .take(BATCH_SIZE);
        if rows.is_empty() {
            return (Vec::new(), String::new());
        }

        session.remember_album(album);
        let follow_up = format!(
            "Would you like to listen to more songs from the album {}?",
            title_case(album)
        );
        (rows.into_views(), follow_up)
    }

    fn specific_song<R: Rng + ?Sized>(
        &self,
        session: &mut SessionContext,
        song: Option<&str>,
        rng: &mut R,
    ) -> (Vec<TrackView>, String) {
        let Some(song) = song else {
            return (Vec::new(), String::new());
        };

        let matched = self.catalog.filter_equals(Column::SongName, song);
        let Some(first) = matched.first() else {
            return (Vec::new(), String::new());
        };

        let mood = non_empty(&first.mood_label);
        let language = non_empty(&first.language);
        session.remember_song(mood, language);

        let similar = match mood {
            Some(mood) => {
                let mut similar = self.catalog.filter_equals(Column::MoodLabel, mood);
                if let Some(language) = language {
                    similar = similar.filter_equals(Column::Language, language);
                }
                similar
                    .exclude_by(Column::SongName, &[song])
                    .sample(SIMILAR_SONG_LIMIT, rng)
            }
            None => Selection::default(),
        };

        let rows = matched.chain(similar).dedup_by_song_artist();
        (
            rows.into_views(),
            "Would you like to listen to more songs like this?".to_string(),
        )
    }

    fn artist_songs(
        &self,
        session: &mut SessionContext,
        artist: Option<&str>,
        language: Option<&str>,
    ) -> (Vec<TrackView>, String) {
        let Some(artist) = artist else {
            return (Vec::new(), String::new());
        };

        let mut rows = self.catalog.filter_equals(Column::ArtistName, artist);
        if let Some(language) = language {
            rows = rows.filter_equals(Column::Language, language);
        }
        if rows.is_empty() {
            debug!("No tracks for artist '{}' with language {:?}", artist, language);
            return (Vec::new(), String::new());
        }

        session.remember_artist(artist);
        let follow_up = format!(
            "Would you like to listen to more songs by {}?",
            title_case(artist)
        );
        (rows.take(BATCH_SIZE).into_views(), follow_up)
    }

    /// Continue from the follow-up context after the user said yes.
    ///
    /// Songs from the last batch are never repeated. When nothing new is
    /// left a handful of random alternatives is offered instead.
    pub fn handle_affirmation<R: Rng + ?Sized>(
        &self,
        session: &mut SessionContext,
        rng: &mut R,
    ) -> AffirmationTurn {
        let language = session.follow_up_language.as_deref();

        let (pool, message) = if session.was_specific_song {
            match session.follow_up_mood.as_deref() {
                Some(mood) => {
                    let mut pool = self.catalog.filter_equals(Column::MoodLabel, mood);
                    if let Some(language) = language {
                        pool = pool.filter_equals(Column::Language, language);
                    }
                    (pool, MORE_LIKE_THIS.to_string())
                }
                None => (self.catalog.sample(BATCH_SIZE, rng), RANDOM_PICKS.to_string()),
            }
        } else if let Some(artist) = session.follow_up_artist.as_deref() {
            let mut pool = self.catalog.filter_equals(Column::ArtistName, artist);
            if let Some(language) = language {
                pool = pool.filter_equals(Column::Language, language);
            }
            (pool, format!("Here are more songs by {}.", title_case(artist)))
        } else if let Some(album) = session.follow_up_album.as_deref() {
            let pool = self.catalog.filter_equals(Column::AlbumName, album);
            (
                pool,
                format!("Here are more songs from the album {}.", title_case(album)),
            )
        } else {
            (self.catalog.sample(BATCH_SIZE, rng), RANDOM_PICKS.to_string())
        };

        let shown: Vec<&str> = session
            .recommended_songs
            .iter()
            .map(|song| song.song_name.as_str())
            .collect();
        let eligible = pool.exclude_by(Column::SongName, &shown);

        let (rows, message, exhausted) = if eligible.is_empty() {
            (
                self.catalog.sample(ALTERNATIVES_SIZE, rng),
                NOTHING_NEW.to_string(),
                true,
            )
        } else if eligible.len() > BATCH_SIZE {
            (eligible.sample(BATCH_SIZE, rng), message, false)
        } else {
            (eligible, message, false)
        };

        let suggestions = rows.into_views();
        info!(
            "Affirmation produced {} suggestions (exhausted: {})",
            suggestions.len(),
            exhausted
        );
        session.replace_queue(suggestions.clone());

        AffirmationTurn {
            message,
            suggestions,
            exhausted,
        }
    }
}

/// Advance the cursor over the current batch
pub fn next_song(session: &mut SessionContext) -> NextSong {
    if session.recommended_songs.is_empty() {
        return NextSong::Empty;
    }

    let next = session.current_index + 1;
    match session.recommended_songs.get(next) {
        Some(track) => {
            let track = track.clone();
            session.current_index = next;
            NextSong::Track { index: next, track }
        }
        None => NextSong::EndOfList,
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
