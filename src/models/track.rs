//! Track models

use serde::{Deserialize, Serialize};

use crate::utils::normalize::{normalize_album, normalize_text};

/// Catalog column that can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SongName,
    ArtistName,
    AlbumName,
    MoodLabel,
    Language,
}

/// A raw catalog row as it appears in the CSV file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrackRow {
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub song_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    /// Album or movie the song belongs to
    #[serde(default, alias = "album_movie_name")]
    pub album_name: Option<String>,
    #[serde(default)]
    pub mood_label: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A catalog entry with every matchable field normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Opaque identifier, kept verbatim
    pub track_id: String,
    pub song_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub mood_label: String,
    pub language: String,
}

impl TrackRecord {
    /// Build a record, normalizing every text field exactly once
    pub fn new(
        track_id: &str,
        song_name: &str,
        artist_name: &str,
        album_name: &str,
        mood_label: &str,
        language: &str,
    ) -> Self {
        Self {
            track_id: track_id.trim().to_string(),
            song_name: normalize_text(song_name),
            artist_name: normalize_text(artist_name),
            album_name: normalize_album(album_name),
            mood_label: normalize_text(mood_label),
            language: normalize_text(language),
        }
    }

    /// Get the value of a column
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::SongName => &self.song_name,
            Column::ArtistName => &self.artist_name,
            Column::AlbumName => &self.album_name,
            Column::MoodLabel => &self.mood_label,
            Column::Language => &self.language,
        }
    }

    /// Client-facing view of this record, without an audio url yet
    pub fn to_view(&self) -> TrackView {
        TrackView {
            track_id: non_empty(&self.track_id),
            song_name: self.song_name.clone(),
            artist_name: self.artist_name.clone(),
            album_name: non_empty(&self.album_name),
            mood_label: non_empty(&self.mood_label),
            language: non_empty(&self.language),
            audio_url: None,
        }
    }
}

impl From<RawTrackRow> for TrackRecord {
    fn from(row: RawTrackRow) -> Self {
        Self::new(
            row.track_id.as_deref().unwrap_or_default(),
            row.song_name.as_deref().unwrap_or_default(),
            row.artist_name.as_deref().unwrap_or_default(),
            row.album_name.as_deref().unwrap_or_default(),
            row.mood_label.as_deref().unwrap_or_default(),
            row.language.as_deref().unwrap_or_default(),
        )
    }
}

/// A track as sent to the client and remembered in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackView {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub track_id: Option<String>,
    pub song_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub mood_label: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audio_url: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_normalized() {
        let record = TrackRecord::new(
            " t1 ",
            "Tum Hi Ho!",
            "Arijit Singh",
            "Aashiqui2 (OST)",
            "Sad",
            "Hindi",
        );

        assert_eq!(record.track_id, "t1");
        assert_eq!(record.song_name, "tum hi ho");
        assert_eq!(record.artist_name, "arijit singh");
        assert_eq!(record.album_name, "aashiqui 2");
        assert_eq!(record.field(Column::MoodLabel), "sad");
        assert_eq!(record.field(Column::Language), "hindi");
    }

    #[test]
    fn test_missing_fields_become_none_in_view() {
        let row = RawTrackRow {
            song_name: Some("Kesariya".to_string()),
            artist_name: Some("Arijit Singh".to_string()),
            ..Default::default()
        };
        let view = TrackRecord::from(row).to_view();

        assert_eq!(view.song_name, "kesariya");
        assert_eq!(view.album_name, None);
        assert_eq!(view.mood_label, None);
        assert_eq!(view.track_id, None);
    }

    #[test]
    fn test_view_serializes_snake_case() {
        let mut view = TrackRecord::new("7", "Kesariya", "Arijit Singh", "", "romantic", "hindi")
            .to_view();
        view.audio_url = Some("https://example.com/a.webm".to_string());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["song_name"], "kesariya");
        assert_eq!(json["artist_name"], "arijit singh");
        assert_eq!(json["album_name"], serde_json::Value::Null);
        assert_eq!(json["audio_url"], "https://example.com/a.webm");

        let bare = serde_json::to_value(TrackRecord::new("", "Solo", "", "", "", "").to_view()).unwrap();
        assert!(bare.get("track_id").is_none());
        assert!(bare.get("audio_url").is_none());
    }
}
