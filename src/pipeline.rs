//! Per-chart analysis pipeline.
//!
//! Normalizes a chart, summarizes both metrics by cohort and runs the trend
//! tests. Nothing here touches the filesystem.

use crate::analysis::{cohort_distribution, cohort_summary, stats, trend_test};
use crate::config::{ChartSource, Config};
use crate::models::{
    ArtistRecord, ChartEntry, ChartFindings, CohortStats, Metric, Report, ReportMetadata,
    TrendOutcome,
};
use crate::normalizer::{NormalizedChart, Normalizer};
use chrono::Utc;
use tracing::{info, warn};

/// Everything derived from one chart.
#[derive(Debug, Clone)]
pub struct ChartRun {
    pub source: ChartSource,
    pub normalized: NormalizedChart,
    pub gap_stats: Vec<CohortStats>,
    pub hits_stats: Vec<CohortStats>,
    pub gap_trend: TrendOutcome,
    pub hits_trend: TrendOutcome,
}

/// Normalize and analyze one chart's entries.
pub fn analyze_chart(
    source: &ChartSource,
    entries: &[ChartEntry],
    normalizer: &Normalizer,
) -> ChartRun {
    info!("Processing {}", source.name);

    let normalized = normalizer.run(entries);
    let artists = &normalized.artists;

    for (label, n) in cohort_distribution(artists) {
        info!("{} cohort {}: {} artists", source.name, label, n);
    }

    ChartRun {
        source: source.clone(),
        gap_stats: cohort_summary(artists, Metric::AvgGapYears),
        hits_stats: cohort_summary(artists, Metric::HitsFirst10Years),
        gap_trend: run_trend(&source.name, artists, Metric::AvgGapYears),
        hits_trend: run_trend(&source.name, artists, Metric::HitsFirst10Years),
        normalized,
    }
}

fn run_trend(chart: &str, artists: &[ArtistRecord], metric: Metric) -> TrendOutcome {
    match trend_test(artists, metric) {
        Ok(trend) => {
            info!(
                "{} {}: r = {:.3}, p = {:.4}",
                chart, metric, trend.correlation, trend.p_value
            );
            TrendOutcome::Computed(trend)
        }
        Err(e) => {
            warn!("{} {}: no trend computed: {}", chart, metric, e);
            TrendOutcome::Degenerate {
                metric,
                reason: e.to_string(),
            }
        }
    }
}

fn metric_mean(artists: &[ArtistRecord], metric: Metric) -> Option<f64> {
    let values: Vec<f64> = artists.iter().map(|a| a.metric(metric)).collect();
    stats::mean(&values)
}

impl ChartRun {
    /// Report view of this chart.
    pub fn findings(&self) -> ChartFindings {
        let artists = &self.normalized.artists;

        ChartFindings {
            name: self.source.name.clone(),
            slug: self.source.slug.clone(),
            counts: self.normalized.counts,
            qualifying_artists: artists.len(),
            cohort_distribution: cohort_distribution(artists),
            mean_avg_gap_years: metric_mean(artists, Metric::AvgGapYears),
            mean_hits_first_10_years: metric_mean(artists, Metric::HitsFirst10Years),
            gap_stats: self.gap_stats.clone(),
            hits_stats: self.hits_stats.clone(),
            gap_trend: self.gap_trend.clone(),
            hits_trend: self.hits_trend.clone(),
        }
    }
}

/// Known limitations stated in every report.
pub fn caveats() -> Vec<String> {
    vec![
        "Artist identity is exact name matching; spelling variants and featuring credits \
         (e.g. \"Prince\" vs. \"Prince & The Revolution\") are counted as separate artists."
            .to_string(),
        "Compilations, reissues and soundtracks are detected from title keywords only; \
         some studio albums may be excluded and some compilations retained."
            .to_string(),
        "Only albums peaking in the top 40 are counted, dated by their first top-40 week."
            .to_string(),
    ]
}

/// Assemble the findings report for a run.
pub fn build_report(
    runs: &[ChartRun],
    config: &Config,
    exclusion_patterns: usize,
    duration_seconds: f64,
) -> Report {
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        charts_processed: runs.len(),
        peak_cutoff: config.normalizer.peak_cutoff,
        min_albums: config.normalizer.min_albums,
        window_years: config.normalizer.window_years,
        alpha: config.trend.alpha,
        exclusion_patterns,
        duration_seconds,
    };

    Report {
        metadata,
        charts: runs.iter().map(ChartRun::findings).collect(),
        caveats: caveats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::ingest::read_chart_entries;
    use crate::report::{write_chart_tables, ChartTablePaths};
    use std::path::Path;

    const SAMPLE: &str = include_str!("../fixtures/sample_chart.csv");

    fn sample_run() -> ChartRun {
        let entries =
            read_chart_entries(SAMPLE.as_bytes(), Path::new("sample_chart.csv"), None).unwrap();
        let config = Config::default();
        let normalizer = Normalizer::new(config.normalizer, &config.exclusions).unwrap();
        analyze_chart(&config.charts[0], &entries, &normalizer)
    }

    #[test]
    fn test_sample_chart_artists() {
        let run = sample_run();
        let names: Vec<_> = run
            .normalized
            .artists
            .iter()
            .map(|a| a.artist.as_str())
            .collect();
        assert_eq!(names, vec!["Bob Marley", "Fleetwood Mac", "Lorde", "Queen"]);

        let queen = &run.normalized.artists[3];
        // Greatest Hits is excluded and the flop never reached the top 40
        assert_eq!(queen.num_albums, 3);
        assert_eq!(queen.decade_cohort_label, "1970s");

        for artist in &run.normalized.artists {
            assert!(artist.num_albums >= 3);
            assert!(artist.hits_first_10_years <= artist.num_albums);
        }

        assert!(run
            .normalized
            .albums
            .iter()
            .any(|a| a.artist == "Bob Marley" && a.title == "Legend"));
    }

    #[test]
    fn test_sample_chart_cohorts_and_trends() {
        let run = sample_run();

        let labels: Vec<_> = run
            .gap_stats
            .iter()
            .map(|s| s.decade_cohort_label.as_str())
            .collect();
        assert_eq!(labels, vec!["1970s", "2010s"]);
        assert_eq!(run.gap_stats[0].n, 3);
        assert_eq!(run.gap_stats[1].n, 1);
        assert_eq!(run.gap_stats[1].std, None);

        assert!(matches!(run.gap_trend, TrendOutcome::Computed(_)));
        // Everyone has three hits within ten years
        assert!(matches!(run.hits_trend, TrendOutcome::Degenerate { .. }));
    }

    #[test]
    fn test_report_from_runs() {
        let run = sample_run();
        let report = build_report(&[run], &Config::default(), 26, 0.2);

        assert_eq!(report.metadata.charts_processed, 1);
        assert_eq!(report.charts[0].qualifying_artists, 4);
        assert_eq!(report.charts[0].slug, "billboard_200");
        assert_eq!(report.charts[0].mean_hits_first_10_years, Some(3.0));
        assert_eq!(report.caveats.len(), 3);
    }

    #[test]
    fn test_tables_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            processed_dir: dir.path().join("processed"),
            tables_dir: dir.path().join("tables"),
        };

        let write = || {
            let run = sample_run();
            let paths = ChartTablePaths::new(&run.source, &output);
            write_chart_tables(
                &paths,
                &run.normalized.albums,
                &run.normalized.artists,
                &run.gap_stats,
                &run.hits_stats,
            )
            .unwrap();
            [&paths.albums, &paths.artists, &paths.avg_gap_stats, &paths.hits_stats]
                .map(|p| std::fs::read(p).unwrap())
        };

        assert_eq!(write(), write());
    }
}
