//! Data models for the chart cohort analysis.
//!
//! This module contains the core data structures used throughout
//! the application for representing chart entries, albums, artists,
//! cohort statistics, and the findings report.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One weekly chart appearance from a raw input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    pub artist: String,
    pub title: String,
    pub chart_date: NaiveDate,
    /// Best position reached; smaller is higher.
    pub peak_position: u32,
}

/// The earliest qualifying appearance of a unique (artist, title) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub artist: String,
    pub title: String,
    pub first_chart_date: NaiveDate,
    /// Peak position of the entry that was kept.
    pub peak_position: u32,
}

/// Per-artist productivity metrics. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub artist: String,
    pub num_albums: usize,
    pub first_hit_date: NaiveDate,
    pub last_hit_date: NaiveDate,
    pub first_hit_year: i32,
    pub decade_cohort: i32,
    pub decade_cohort_label: String,
    pub career_span_days: i64,
    pub avg_gap_years: f64,
    pub hits_first_10_years: usize,
}

impl ArtistRecord {
    /// Returns the value of the given metric for this artist.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgGapYears => self.avg_gap_years,
            Metric::HitsFirst10Years => self.hits_first_10_years as f64,
        }
    }
}

/// Decade containing `date`, as `(decade, label)`, e.g. `(1980, "1980s")`.
pub fn decade_cohort(date: NaiveDate) -> (i32, String) {
    let decade = date.year().div_euclid(10) * 10;
    (decade, format!("{}s", decade))
}

/// Productivity metric analyzed per cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Average years between hit albums.
    AvgGapYears,
    /// Hit albums within the first ten years of a career.
    #[serde(rename = "hits_first_10_years")]
    HitsFirst10Years,
}

impl Metric {
    /// Column name in the artist table.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::AvgGapYears => "avg_gap_years",
            Metric::HitsFirst10Years => "hits_first_10_years",
        }
    }

    /// File name suffix for the cohort statistics table.
    pub fn table_suffix(&self) -> &'static str {
        match self {
            Metric::AvgGapYears => "avg_gap_stats",
            Metric::HitsFirst10Years => "hits_10yr_stats",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::AvgGapYears => write!(f, "Average Gap Between Hits (years)"),
            Metric::HitsFirst10Years => write!(f, "Hits in First 10 Years"),
        }
    }
}

/// Summary statistics of one metric within one decade cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    #[serde(skip)]
    pub decade_cohort: i32,
    pub decade_cohort_label: String,
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` for a single-artist cohort.
    pub std: Option<f64>,
    pub q25: f64,
    pub q75: f64,
}

/// Spearman trend of a metric against decade cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    pub metric: Metric,
    pub correlation: f64,
    pub p_value: f64,
    /// Number of artist pairs tested.
    pub n: usize,
}

impl TrendResult {
    pub fn direction(&self) -> &'static str {
        if self.correlation > 0.0 {
            "increasing"
        } else {
            "decreasing"
        }
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Outcome of a trend test as recorded in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TrendOutcome {
    Computed(TrendResult),
    Degenerate { metric: Metric, reason: String },
}

/// Row counts at each stage of album filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub total_entries: usize,
    pub top40_entries: usize,
    pub unique_albums: usize,
    pub unique_artists: usize,
    pub compilations_removed: usize,
    pub albums_retained: usize,
}

/// Findings for a single chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFindings {
    pub name: String,
    pub slug: String,
    pub counts: FilterCounts,
    pub qualifying_artists: usize,
    /// `(label, artists)` per cohort, in decade order.
    pub cohort_distribution: Vec<(String, usize)>,
    pub mean_avg_gap_years: Option<f64>,
    pub mean_hits_first_10_years: Option<f64>,
    pub gap_stats: Vec<CohortStats>,
    pub hits_stats: Vec<CohortStats>,
    pub gap_trend: TrendOutcome,
    pub hits_trend: TrendOutcome,
}

/// Metadata about a run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub charts_processed: usize,
    pub peak_cutoff: u32,
    pub min_albums: usize,
    pub window_years: f64,
    pub alpha: f64,
    pub exclusion_patterns: usize,
    pub duration_seconds: f64,
}

/// The complete findings report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub charts: Vec<ChartFindings>,
    /// Known data-quality limitations carried into every report.
    pub caveats: Vec<String>,
}
