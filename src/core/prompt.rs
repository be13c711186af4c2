//! Prompt construction for the text generation collaborator

use crate::models::TrackView;

/// How many suggestions are spelled out in the prompt
const PROMPT_SONG_LIMIT: usize = 2;

/// Build the prompt for a recommendation reply.
///
/// `follow_up` is the question the reply should end with, if any.
pub fn recommendation_prompt(
    user_input: &str,
    artist: Option<&str>,
    mood: Option<&str>,
    language: Option<&str>,
    songs: &[TrackView],
    follow_up: &str,
) -> String {
    let mut prompt = format!(
        "You are a friendly music chatbot. The user said: '{}'.\n",
        user_input
    );

    if let Some(language) = language {
        prompt.push_str(&format!(
            "The user requested {} songs.\n",
            language.to_uppercase()
        ));
    }
    if let Some(artist) = artist {
        prompt.push_str(&format!(
            "The user seems interested in songs by {}.\n",
            title_case(artist)
        ));
    }
    if let Some(mood) = mood {
        prompt.push_str(&format!("The mood of the query appears to be '{}'.\n", mood));
    }

    if !songs.is_empty() {
        prompt.push_str("Based on our dataset, here are some suggested songs:\n");
        for song in songs.iter().take(PROMPT_SONG_LIMIT) {
            prompt.push_str(&format!("- '{}' by {}\n", song.song_name, song.artist_name));
        }
    }

    prompt.push_str(
        "Respond in a friendly tone, mentioning only the song names and artists from the list above, \
         and ask if they would like to listen to any of these songs.",
    );

    if !follow_up.is_empty() {
        prompt.push(' ');
        prompt.push_str(follow_up);
    }

    prompt
}

/// Build the prompt for small talk that is not about music
pub fn conversation_prompt(user_input: &str) -> String {
    format!(
        "You are a friendly music chatbot. The user said: '{}'.\n\
         Reply briefly and warmly, and offer to play some music for them.",
        user_input
    )
}

/// Capitalize the first letter of every word ("arijit singh" -> "Arijit Singh")
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(song: &str, artist: &str) -> TrackView {
        TrackView {
            track_id: None,
            song_name: song.to_string(),
            artist_name: artist.to_string(),
            album_name: None,
            mood_label: None,
            language: None,
            audio_url: None,
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("arijit singh"), "Arijit Singh");
        assert_eq!(title_case("ae dil hai mushkil"), "Ae Dil Hai Mushkil");
        assert_eq!(title_case("aashiqui 2"), "Aashiqui 2");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_recommendation_prompt() {
        let songs = vec![
            view("tum hi ho", "arijit singh"),
            view("kesariya", "arijit singh"),
            view("channa mereya", "arijit singh"),
        ];
        let prompt = recommendation_prompt(
            "songs by arijit",
            Some("arijit singh"),
            Some("sad"),
            Some("hindi"),
            &songs,
            "Would you like to listen to more songs by Arijit Singh?",
        );

        assert!(prompt.starts_with("You are a friendly music chatbot. The user said: 'songs by arijit'."));
        assert!(prompt.contains("The user requested HINDI songs."));
        assert!(prompt.contains("songs by Arijit Singh."));
        assert!(prompt.contains("appears to be 'sad'"));
        assert!(prompt.contains("- 'tum hi ho' by arijit singh"));
        assert!(prompt.contains("- 'kesariya' by arijit singh"));
        assert!(!prompt.contains("channa mereya"));
        assert!(prompt.ends_with("more songs by Arijit Singh?"));
    }

    #[test]
    fn test_prompt_without_details() {
        let prompt = recommendation_prompt("hmm", None, None, None, &[], "");

        assert!(!prompt.contains("suggested songs"));
        assert!(!prompt.contains("requested"));
        assert!(prompt.ends_with("any of these songs."));
    }
}
