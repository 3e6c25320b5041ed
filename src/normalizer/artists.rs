//! Per-artist career metrics.

use crate::models::{decade_cohort, Album, ArtistRecord};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Days per year used for every year/day conversion.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Derive one record per artist with at least `min_albums` albums.
///
/// `window_years` bounds the early-career window for the hit count; an album
/// exactly on the boundary is counted. Records are ordered by artist.
/// `min_albums` must be at least 2.
pub fn derive_artist_records(
    albums: &[Album],
    min_albums: usize,
    window_years: f64,
) -> Vec<ArtistRecord> {
    let mut by_artist: BTreeMap<&str, Vec<NaiveDate>> = BTreeMap::new();
    for album in albums {
        by_artist
            .entry(album.artist.as_str())
            .or_default()
            .push(album.first_chart_date);
    }

    let window_days = window_years * DAYS_PER_YEAR;

    by_artist
        .into_iter()
        .filter(|(_, dates)| dates.len() >= min_albums)
        .filter_map(|(artist, dates)| {
            let first = dates.iter().min().copied()?;
            let last = dates.iter().max().copied()?;
            let num_albums = dates.len();

            let career_span_days = (last - first).num_days();
            let avg_gap_years =
                career_span_days as f64 / DAYS_PER_YEAR / (num_albums - 1) as f64;

            let hits_first_10_years = dates
                .iter()
                .filter(|d| ((**d - first).num_days() as f64) <= window_days)
                .count();

            let (decade, label) = decade_cohort(first);

            Some(ArtistRecord {
                artist: artist.to_string(),
                num_albums,
                first_hit_date: first,
                last_hit_date: last,
                first_hit_year: first.year(),
                decade_cohort: decade,
                decade_cohort_label: label,
                career_span_days,
                avg_gap_years,
                hits_first_10_years,
            })
        })
        .collect()
}
