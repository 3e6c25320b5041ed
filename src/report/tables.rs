//! CSV output tables.
//!
//! Every table is written with a header row, even when it has no data rows,
//! so downstream consumers can rely on a stable schema.

use crate::config::{ChartSource, OutputConfig};
use crate::error::{ChartError, Result};
use crate::models::{Album, ArtistRecord, CohortStats, Metric};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ALBUM_COLUMNS: [&str; 4] = ["artist", "title", "first_chart_date", "peak_position"];

pub const ARTIST_COLUMNS: [&str; 10] = [
    "artist",
    "num_albums",
    "first_hit_date",
    "last_hit_date",
    "first_hit_year",
    "decade_cohort",
    "decade_cohort_label",
    "career_span_days",
    "avg_gap_years",
    "hits_first_10_years",
];

pub const COHORT_COLUMNS: [&str; 7] = [
    "decade_cohort_label",
    "n",
    "mean",
    "median",
    "std",
    "q25",
    "q75",
];

/// Write `rows` to `path` as CSV under the given header.
pub fn write_table<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    let csv_error = |source| ChartError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer.write_record(columns).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Output file locations for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTablePaths {
    pub albums: PathBuf,
    pub artists: PathBuf,
    pub avg_gap_stats: PathBuf,
    pub hits_stats: PathBuf,
}

impl ChartTablePaths {
    pub fn new(chart: &ChartSource, output: &OutputConfig) -> Self {
        let stats = |metric: Metric| {
            output
                .tables_dir
                .join(format!("{}_{}.csv", chart.slug, metric.table_suffix()))
        };

        Self {
            albums: output
                .processed_dir
                .join(format!("{}_albums.csv", chart.slug)),
            artists: output
                .processed_dir
                .join(format!("{}_artists.csv", chart.slug)),
            avg_gap_stats: stats(Metric::AvgGapYears),
            hits_stats: stats(Metric::HitsFirst10Years),
        }
    }
}

/// Write the album, artist and both cohort statistics tables of a chart.
pub fn write_chart_tables(
    paths: &ChartTablePaths,
    albums: &[Album],
    artists: &[ArtistRecord],
    gap_stats: &[CohortStats],
    hits_stats: &[CohortStats],
) -> Result<()> {
    write_table(&paths.albums, &ALBUM_COLUMNS, albums)?;
    write_table(&paths.artists, &ARTIST_COLUMNS, artists)?;
    write_table(&paths.avg_gap_stats, &COHORT_COLUMNS, gap_stats)?;
    write_table(&paths.hits_stats, &COHORT_COLUMNS, hits_stats)?;
    Ok(())
}
