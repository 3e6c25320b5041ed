//! Decade cohort grouping and summary statistics.

use super::stats::{mean, quantile_sorted, sample_std};
use crate::models::{ArtistRecord, CohortStats, Metric};
use std::collections::BTreeMap;

/// Group metric values by decade, ascending.
fn group_by_decade(artists: &[ArtistRecord], metric: Metric) -> BTreeMap<i32, (&str, Vec<f64>)> {
    let mut grouped: BTreeMap<i32, (&str, Vec<f64>)> = BTreeMap::new();

    for artist in artists {
        grouped
            .entry(artist.decade_cohort)
            .or_insert_with(|| (artist.decade_cohort_label.as_str(), Vec::new()))
            .1
            .push(artist.metric(metric));
    }

    grouped
}

/// Per-cohort count, mean, median, standard deviation and quartiles of a
/// metric, ordered by decade.
pub fn cohort_summary(artists: &[ArtistRecord], metric: Metric) -> Vec<CohortStats> {
    group_by_decade(artists, metric)
        .into_iter()
        .filter_map(|(decade, (label, mut values))| {
            values.sort_by(f64::total_cmp);

            Some(CohortStats {
                decade_cohort: decade,
                decade_cohort_label: label.to_string(),
                n: values.len(),
                mean: mean(&values)?,
                median: quantile_sorted(&values, 0.5)?,
                std: sample_std(&values),
                q25: quantile_sorted(&values, 0.25)?,
                q75: quantile_sorted(&values, 0.75)?,
            })
        })
        .collect()
}

/// Number of artists in each cohort, ordered by decade.
pub fn cohort_distribution(artists: &[ArtistRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<i32, (&str, usize)> = BTreeMap::new();
    for artist in artists {
        counts
            .entry(artist.decade_cohort)
            .or_insert((artist.decade_cohort_label.as_str(), 0))
            .1 += 1;
    }

    counts
        .into_values()
        .map(|(label, n)| (label.to_string(), n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decade_cohort;
    use chrono::NaiveDate;

    fn artist(name: &str, year: i32, gap: f64, hits: usize) -> ArtistRecord {
        let first = NaiveDate::from_ymd_opt(year, 6, 1).unwrap();
        let (decade, label) = decade_cohort(first);
        ArtistRecord {
            artist: name.to_string(),
            num_albums: hits.max(3),
            first_hit_date: first,
            last_hit_date: first,
            first_hit_year: year,
            decade_cohort: decade,
            decade_cohort_label: label,
            career_span_days: 0,
            avg_gap_years: gap,
            hits_first_10_years: hits,
        }
    }

    #[test]
    fn test_summary_ordered_by_decade() {
        let artists = vec![
            artist("a", 2004, 3.0, 3),
            artist("b", 1975, 1.0, 5),
            artist("c", 1983, 2.0, 4),
            artist("d", 1971, 2.0, 4),
        ];

        let stats = cohort_summary(&artists, Metric::AvgGapYears);
        let labels: Vec<_> = stats.iter().map(|s| s.decade_cohort_label.as_str()).collect();
        assert_eq!(labels, vec!["1970s", "1980s", "2000s"]);

        let seventies = &stats[0];
        assert_eq!(seventies.n, 2);
        assert_eq!(seventies.mean, 1.5);
        assert_eq!(seventies.median, 1.5);
        assert_eq!(seventies.q25, 1.25);
        assert_eq!(seventies.q75, 1.75);
        assert!((seventies.std.unwrap() - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_artist_cohort_has_no_std() {
        let artists = vec![artist("solo", 1992, 4.2, 3)];

        let stats = cohort_summary(&artists, Metric::AvgGapYears);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].n, 1);
        assert_eq!(stats[0].mean, 4.2);
        assert_eq!(stats[0].median, 4.2);
        assert_eq!(stats[0].std, None);
    }

    #[test]
    fn test_summary_of_hit_counts() {
        let artists = vec![
            artist("a", 1990, 1.0, 3),
            artist("b", 1991, 1.0, 6),
            artist("c", 1992, 1.0, 4),
            artist("d", 1993, 1.0, 5),
        ];

        let stats = cohort_summary(&artists, Metric::HitsFirst10Years);
        assert_eq!(stats[0].mean, 4.5);
        assert_eq!(stats[0].median, 4.5);
        assert_eq!(stats[0].q25, 3.75);
        assert_eq!(stats[0].q75, 5.25);
    }

    #[test]
    fn test_cohort_distribution() {
        let artists = vec![
            artist("a", 2011, 1.0, 3),
            artist("b", 1964, 1.0, 3),
            artist("c", 2019, 1.0, 3),
        ];
        assert_eq!(
            cohort_distribution(&artists),
            vec![("1960s".to_string(), 1), ("2010s".to_string(), 2)]
        );
        assert!(cohort_summary(&[], Metric::AvgGapYears).is_empty());
    }
}
