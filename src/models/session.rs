//! Per-session conversation context

use serde::{Deserialize, Serialize};

use super::TrackView;

/// Follow-up context remembered between chat turns.
///
/// Only one of the artist, mood (+ language) or album criteria is
/// authoritative at a time; the `remember_*` helpers clear the others.
/// `follow_up_language` doubles as a modifier recorded whenever a query
/// names a language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// The last satisfied query was a single-song lookup
    #[serde(default)]
    pub was_specific_song: bool,
    #[serde(default)]
    pub follow_up_artist: Option<String>,
    #[serde(default)]
    pub follow_up_mood: Option<String>,
    #[serde(default)]
    pub follow_up_language: Option<String>,
    #[serde(default)]
    pub follow_up_album: Option<String>,
    /// Last batch shown to the user
    #[serde(default)]
    pub recommended_songs: Vec<TrackView>,
    /// Cursor into `recommended_songs`
    #[serde(default)]
    pub current_index: usize,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow-ups should stay in the tracks of `album`
    pub fn remember_album(&mut self, album: &str) {
        self.follow_up_album = Some(album.to_string());
        self.follow_up_artist = None;
        self.follow_up_mood = None;
        self.was_specific_song = false;
    }

    /// Follow-ups should look like a specific song
    pub fn remember_song(&mut self, mood: Option<&str>, language: Option<&str>) {
        self.follow_up_mood = mood.map(str::to_string);
        self.follow_up_language = language.map(str::to_string);
        self.was_specific_song = true;
        self.follow_up_artist = None;
        self.follow_up_album = None;
    }

    /// Follow-ups should stay with `artist`
    pub fn remember_artist(&mut self, artist: &str) {
        self.follow_up_artist = Some(artist.to_string());
        self.follow_up_mood = None;
        self.follow_up_album = None;
        self.was_specific_song = false;
    }

    /// Record a language mentioned in the latest query
    pub fn remember_language(&mut self, language: &str) {
        self.follow_up_language = Some(language.to_string());
    }

    /// Drop every follow-up criterion except the language modifier
    pub fn forget_criteria(&mut self) {
        self.was_specific_song = false;
        self.follow_up_artist = None;
        self.follow_up_mood = None;
        self.follow_up_album = None;
    }

    /// Replace the queue with a fresh batch and rewind the cursor
    pub fn replace_queue(&mut self, songs: Vec<TrackView>) {
        self.recommended_songs = songs;
        self.current_index = 0;
    }

    /// Attach a resolved stream url to a queued song
    pub fn set_audio_url(&mut self, index: usize, url: &str) {
        if let Some(song) = self.recommended_songs.get_mut(index) {
            song.audio_url = Some(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(song: &str) -> TrackView {
        TrackView {
            track_id: None,
            song_name: song.to_string(),
            artist_name: "someone".to_string(),
            album_name: None,
            mood_label: None,
            language: None,
            audio_url: None,
        }
    }

    #[test]
    fn test_artist_clears_mood_and_album() {
        let mut ctx = SessionContext::new();
        ctx.remember_song(Some("sad"), Some("hindi"));
        ctx.remember_artist("arijit singh");

        assert_eq!(ctx.follow_up_artist.as_deref(), Some("arijit singh"));
        assert_eq!(ctx.follow_up_mood, None);
        assert!(!ctx.was_specific_song);
        // language survives as a modifier
        assert_eq!(ctx.follow_up_language.as_deref(), Some("hindi"));
    }

    #[test]
    fn test_specific_song_clears_artist() {
        let mut ctx = SessionContext::new();
        ctx.remember_artist("arijit singh");
        ctx.remember_song(Some("romantic"), None);

        assert!(ctx.was_specific_song);
        assert_eq!(ctx.follow_up_artist, None);
        assert_eq!(ctx.follow_up_mood.as_deref(), Some("romantic"));
        assert_eq!(ctx.follow_up_language, None);
    }

    #[test]
    fn test_album_clears_others() {
        let mut ctx = SessionContext::new();
        ctx.remember_song(Some("sad"), Some("hindi"));
        ctx.remember_album("balidan");

        assert_eq!(ctx.follow_up_album.as_deref(), Some("balidan"));
        assert_eq!(ctx.follow_up_mood, None);
        assert!(!ctx.was_specific_song);
    }

    #[test]
    fn test_replace_queue_and_audio_url() {
        let mut ctx = SessionContext::new();
        ctx.current_index = 3;
        ctx.replace_queue(vec![view("kesariya"), view("tum hi ho")]);

        assert_eq!(ctx.current_index, 0);
        assert_eq!(ctx.recommended_songs.len(), 2);

        ctx.set_audio_url(1, "https://example.com/a.webm");
        ctx.set_audio_url(9, "https://example.com/ignored.webm");
        assert_eq!(
            ctx.recommended_songs[1].audio_url.as_deref(),
            Some("https://example.com/a.webm")
        );
    }
}
