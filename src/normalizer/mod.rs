//! Chart normalization.
//!
//! Turns raw weekly entries into the album table and the qualifying-artist
//! table. Artist identity is exact string equality: spelling and
//! featuring-credit variants count as different artists.

pub mod albums;
pub mod artists;
pub mod classifier;

pub use albums::filter_to_top_albums;
pub use artists::derive_artist_records;
pub use classifier::ExclusionClassifier;

use crate::config::{ExclusionConfig, NormalizerConfig};
use crate::error::Result;
use crate::models::{Album, ArtistRecord, ChartEntry, FilterCounts};
use tracing::{debug, info};

/// Output of normalizing one chart.
#[derive(Debug, Clone)]
pub struct NormalizedChart {
    /// Post-exclusion albums, before the artist qualification filter.
    pub albums: Vec<Album>,
    /// Qualifying artists.
    pub artists: Vec<ArtistRecord>,
    pub counts: FilterCounts,
}

/// Applies album filtering and artist derivation with fixed settings.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
    classifier: ExclusionClassifier,
}

impl Normalizer {
    /// Build a normalizer, compiling the exclusion patterns.
    pub fn new(config: NormalizerConfig, exclusions: &ExclusionConfig) -> Result<Self> {
        let classifier = ExclusionClassifier::new(&exclusions.patterns)?;
        debug!("Compiled {} exclusion patterns", classifier.len());
        Ok(Self { config, classifier })
    }

    pub fn pattern_count(&self) -> usize {
        self.classifier.len()
    }

    /// Normalize one chart's entries.
    pub fn run(&self, entries: &[ChartEntry]) -> NormalizedChart {
        let (albums, counts) =
            filter_to_top_albums(entries, self.config.peak_cutoff, &self.classifier);

        info!("Total chart entries: {}", counts.total_entries);
        info!(
            "After top-{} filter: {} entries",
            self.config.peak_cutoff, counts.top40_entries
        );
        info!(
            "Unique albums: {} from {} artists",
            counts.unique_albums, counts.unique_artists
        );
        info!(
            "Compilations/soundtracks removed: {}, albums kept: {}",
            counts.compilations_removed, counts.albums_retained
        );

        let artists =
            derive_artist_records(&albums, self.config.min_albums, self.config.window_years);

        info!(
            "Artists with {}+ albums: {}",
            self.config.min_albums,
            artists.len()
        );

        NormalizedChart {
            albums,
            artists,
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(artist: &str, title: &str, date: &str, peak: u32) -> ChartEntry {
        ChartEntry {
            artist: artist.to_string(),
            title: title.to_string(),
            chart_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            peak_position: peak,
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(NormalizerConfig::default(), &ExclusionConfig::default()).unwrap()
    }

    #[test]
    fn test_run_end_to_end() {
        let entries = vec![
            entry("A", "First", "2000-01-01", 8),
            entry("A", "First", "2000-01-08", 3),
            entry("A", "Second", "2003-01-01", 20),
            entry("A", "Third", "2006-01-01", 40),
            entry("A", "Greatest Hits", "2007-01-01", 1),
            entry("A", "Flop", "2008-01-01", 41),
            entry("B", "Only", "1999-01-01", 1),
        ];

        let result = normalizer().run(&entries);

        assert_eq!(result.albums.len(), 4);
        assert_eq!(result.counts.compilations_removed, 1);
        assert_eq!(result.artists.len(), 1);
        assert_eq!(result.artists[0].artist, "A");
        assert_eq!(result.artists[0].num_albums, 3);
    }

    #[test]
    fn test_run_is_deterministic() {
        let entries = vec![
            entry("Z", "z1", "1970-01-01", 1),
            entry("Y", "y1", "1980-01-01", 1),
            entry("Z", "z2", "1972-01-01", 1),
            entry("Y", "y2", "1981-01-01", 1),
            entry("Z", "z3", "1975-01-01", 1),
            entry("Y", "y3", "1990-01-01", 1),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        let n = normalizer();
        let a = n.run(&entries);
        let b = n.run(&reversed);
        assert_eq!(a.albums, b.albums);
        assert_eq!(a.artists, b.artists);
        assert_eq!(a.artists[0].artist, "Y");
    }

    #[test]
    fn test_invalid_pattern_fails_construction() {
        let exclusions = ExclusionConfig {
            patterns: vec!["[".to_string()],
        };
        assert!(Normalizer::new(NormalizerConfig::default(), &exclusions).is_err());
    }
}
