//! Catalog store - the immutable in-memory track table
//!
//! Rows are normalized once when the CSV file is read. Queries go through
//! [`Selection`], a borrowed view that supports equality filters, exclusion,
//! random sampling and de-duplication. None of these operations can fail.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::models::{Column, RawTrackRow, TrackRecord, TrackView};

/// The loaded catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<TrackRecord>,
}

impl Catalog {
    pub fn new(tracks: Vec<TrackRecord>) -> Self {
        Self { tracks }
    }

    /// Load the catalog from a CSV file
    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open catalog file {}", path.display()))?;
        let catalog = Self::from_reader(file)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;

        info!("Catalog loaded: {} tracks from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse CSV rows with the columns
    /// `track_id, song_name, artist_name, album_movie_name, mood_label, language`.
    ///
    /// Malformed rows are skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        // make sure the header row itself is readable before iterating
        csv_reader.headers().context("Catalog has no header row")?;

        let mut tracks = Vec::new();
        for (line, row) in csv_reader.deserialize::<RawTrackRow>().enumerate() {
            match row {
                Ok(row) => tracks.push(TrackRecord::from(row)),
                Err(e) => warn!("Skipping catalog row {}: {}", line + 2, e),
            }
        }

        Ok(Self::new(tracks))
    }

    /// Get total track count
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get all tracks
    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Every row, in catalog order
    pub fn all(&self) -> Selection<'_> {
        Selection {
            rows: self.tracks.iter().collect(),
        }
    }

    /// Rows whose `column` equals `value`
    pub fn filter_equals(&self, column: Column, value: &str) -> Selection<'_> {
        self.all().filter_equals(column, value)
    }

    /// Up to `n` random rows
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Selection<'_> {
        self.all().sample(n, rng)
    }
}

/// A borrowed, ordered subset of catalog rows
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    rows: Vec<&'a TrackRecord>,
}

impl<'a> Selection<'a> {
    /// Keep rows whose `column` equals `value`
    pub fn filter_equals(mut self, column: Column, value: &str) -> Self {
        self.rows.retain(|row| row.field(column) == value);
        self
    }

    /// Drop rows whose `column` is one of `excluded`
    pub fn exclude_by<S: AsRef<str>>(mut self, column: Column, excluded: &[S]) -> Self {
        let excluded: HashSet<&str> = excluded.iter().map(|s| s.as_ref()).collect();
        self.rows.retain(|row| !excluded.contains(row.field(column)));
        self
    }

    /// Keep up to `n` rows chosen at random
    pub fn sample<R: Rng + ?Sized>(self, n: usize, rng: &mut R) -> Self {
        let rows = self
            .rows
            .choose_multiple(rng, n.min(self.rows.len()))
            .copied()
            .collect();
        Self { rows }
    }

    /// Keep the first `n` rows
    pub fn take(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Append another selection
    pub fn chain(mut self, other: Selection<'a>) -> Self {
        self.rows.extend(other.rows);
        self
    }

    /// Keep only the first row of each (song, artist) pair
    pub fn dedup_by_song_artist(mut self) -> Self {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        self.rows
            .retain(|row| seen.insert((row.song_name.as_str(), row.artist_name.as_str())));
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&'a TrackRecord> {
        self.rows.first().copied()
    }

    pub fn rows(&self) -> &[&'a TrackRecord] {
        &self.rows
    }

    /// Client-facing views of every row
    pub fn into_views(self) -> Vec<TrackView> {
        self.rows.into_iter().map(TrackRecord::to_view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    const CSV: &str = "\
track_id,song_name,artist_name,album_movie_name,mood_label,language
1,Tum Hi Ho,Arijit Singh,Aashiqui 2 (OST),Sad,Hindi
2,Kesariya,Arijit Singh,Brahmastra,Romantic,Hindi
3,Ami Je Tomar,Shreya Ghoshal,Bhool Bhulaiyaa,Romantic,Bengali
4,Kesariya,Arijit Singh,Brahmastra (Reprise),Romantic,Hindi
";

    fn catalog() -> Catalog {
        Catalog::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader_normalizes_rows() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);

        let first = &catalog.tracks()[0];
        assert_eq!(first.song_name, "tum hi ho");
        assert_eq!(first.album_name, "aashiqui 2");
        assert_eq!(first.mood_label, "sad");
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let csv = "track_id,song_name,artist_name,album_movie_name,mood_label,language\n9,Solo,,,,\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();

        let track = &catalog.tracks()[0];
        assert_eq!(track.song_name, "solo");
        assert_eq!(track.artist_name, "");
        assert_eq!(track.language, "");
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let catalog = Catalog::load_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 4);

        assert!(Catalog::load_csv(Path::new("/definitely/not/here.csv")).is_err());
    }

    #[test]
    fn test_filter_and_exclude() {
        let catalog = catalog();

        let romantic = catalog
            .filter_equals(Column::MoodLabel, "romantic")
            .filter_equals(Column::Language, "hindi");
        assert_eq!(romantic.len(), 2);

        let rest = catalog.all().exclude_by(Column::SongName, &["kesariya"]);
        assert_eq!(rest.len(), 2);
        assert!(rest.rows().iter().all(|r| r.song_name != "kesariya"));
    }

    #[test]
    fn test_sample_is_bounded() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(catalog.sample(2, &mut rng).len(), 2);
        assert_eq!(catalog.sample(50, &mut rng).len(), 4);
        assert!(Catalog::default().sample(2, &mut rng).is_empty());
    }

    #[test]
    fn test_dedup_by_song_artist() {
        let catalog = catalog();
        let kesariya = catalog.filter_equals(Column::SongName, "kesariya");
        assert_eq!(kesariya.len(), 2);

        let deduped = kesariya.clone().chain(kesariya).dedup_by_song_artist();
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped.first().unwrap().track_id, "2");
    }
}
