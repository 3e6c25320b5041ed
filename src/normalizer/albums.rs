//! Top-album selection: peak filter, deduplication, compilation exclusion.

use super::classifier::ExclusionClassifier;
use crate::models::{Album, ChartEntry, FilterCounts};
use std::collections::{BTreeMap, BTreeSet};

/// Reduce weekly entries to one album per (artist, title).
///
/// Entries peaking below `peak_cutoff` are dropped, each remaining pair keeps
/// its earliest chart date, and compilation titles are removed. The result is
/// ordered by (artist, title).
pub fn filter_to_top_albums(
    entries: &[ChartEntry],
    peak_cutoff: u32,
    classifier: &ExclusionClassifier,
) -> (Vec<Album>, FilterCounts) {
    let mut counts = FilterCounts {
        total_entries: entries.len(),
        ..FilterCounts::default()
    };

    let mut earliest: BTreeMap<(&str, &str), &ChartEntry> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.peak_position <= peak_cutoff) {
        counts.top40_entries += 1;

        earliest
            .entry((entry.artist.as_str(), entry.title.as_str()))
            .and_modify(|kept| {
                // Strict comparison keeps the first-seen entry on ties
                if entry.chart_date < kept.chart_date {
                    *kept = entry;
                }
            })
            .or_insert(entry);
    }

    counts.unique_albums = earliest.len();
    counts.unique_artists = earliest
        .keys()
        .map(|(artist, _)| *artist)
        .collect::<BTreeSet<_>>()
        .len();

    let albums: Vec<Album> = earliest
        .into_values()
        .filter(|entry| !classifier.is_compilation(&entry.title))
        .map(|entry| Album {
            artist: entry.artist.clone(),
            title: entry.title.clone(),
            first_chart_date: entry.chart_date,
            peak_position: entry.peak_position,
        })
        .collect();

    counts.albums_retained = albums.len();
    counts.compilations_removed = counts.unique_albums - counts.albums_retained;

    (albums, counts)
}
