//! Coarse intent classification of chat utterances

use serde::Serialize;

use crate::stores::ReferenceIndex;
use crate::utils::normalize::normalize_text;

const GREETINGS: [&str; 7] = ["hi", "hello", "hello friend", "hey", "namaste", "hloo", "hlw"];

const SONG_KEYWORDS: [&str; 4] = ["play", "listen", "song", "music"];

/// What the user is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SongRequest,
    Conversation,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::SongRequest => "song_request",
            Intent::Conversation => "conversation",
        }
    }
}

/// Classify an utterance. Greetings are checked first.
pub fn classify(utterance: &str, index: &ReferenceIndex) -> Intent {
    let lowered = utterance.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace().peekable();

    if tokens.peek().is_some() && tokens.all(|token| GREETINGS.contains(&token)) {
        return Intent::Greeting;
    }

    if SONG_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::SongRequest;
    }

    let normalized = normalize_text(utterance);
    if index
        .song_names()
        .iter()
        .any(|song| normalized.contains(song.as_str()))
    {
        return Intent::SongRequest;
    }

    Intent::Conversation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackRecord;
    use crate::stores::Catalog;

    fn index() -> ReferenceIndex {
        let catalog = Catalog::new(vec![
            TrackRecord::new("1", "Tum Hi Ho", "Arijit Singh", "Aashiqui 2", "Sad", "Hindi"),
            TrackRecord::new("2", "Kesariya", "Arijit Singh", "Brahmastra", "Romantic", "Hindi"),
        ]);
        ReferenceIndex::build(&catalog)
    }

    #[test]
    fn test_greetings() {
        let index = index();
        assert_eq!(classify("Hello", &index), Intent::Greeting);
        assert_eq!(classify("hey hi", &index), Intent::Greeting);
        assert_eq!(classify("  Namaste ", &index), Intent::Greeting);
        assert_eq!(classify("hello there", &index), Intent::Conversation);
    }

    #[test]
    fn test_greeting_takes_precedence() {
        let catalog = Catalog::new(vec![TrackRecord::new("1", "Hey", "Someone", "", "", "")]);
        let index = ReferenceIndex::build(&catalog);

        assert_eq!(classify("hey", &index), Intent::Greeting);
    }

    #[test]
    fn test_song_requests() {
        let index = index();
        assert_eq!(classify("Play something nice", &index), Intent::SongRequest);
        assert_eq!(classify("I want to listen", &index), Intent::SongRequest);
        assert_eq!(classify("hi, play music", &index), Intent::SongRequest);
        assert_eq!(classify("Kesariya!", &index), Intent::SongRequest);
        assert_eq!(classify("i love tum hi ho", &index), Intent::SongRequest);
    }

    #[test]
    fn test_conversation() {
        let index = index();
        assert_eq!(classify("how are you today?", &index), Intent::Conversation);
        assert_eq!(classify("", &index), Intent::Conversation);
    }
}
