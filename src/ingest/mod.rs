//! Raw chart CSV ingest.
//!
//! Every row must parse; a single malformed date or peak position aborts
//! the load rather than being skipped.

use crate::error::{ChartError, Result};
use crate::models::ChartEntry;
use chrono::NaiveDate;
use csv::StringRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Columns every chart file must carry.
const REQUIRED_COLUMNS: [&str; 4] = ["artist", "title", "chart_date", "peak_position"];

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    artist: usize,
    title: usize,
    chart_date: usize,
    peak_position: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| ChartError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };

        Ok(Self {
            artist: find(REQUIRED_COLUMNS[0])?,
            title: find(REQUIRED_COLUMNS[1])?,
            chart_date: find(REQUIRED_COLUMNS[2])?,
            peak_position: find(REQUIRED_COLUMNS[3])?,
        })
    }
}

/// Load every entry of a chart file.
pub fn load_chart_entries(path: &Path, show_progress: bool) -> Result<Vec<ChartEntry>> {
    info!("Loading chart entries from {}", path.display());

    let file = File::open(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = read_chart_entries(file, path, spinner.as_ref());

    if let Some(pb) = spinner {
        match &result {
            Ok(entries) => pb.finish_with_message(format!("{} rows read", entries.len())),
            Err(_) => pb.abandon(),
        }
    }

    let entries = result?;
    debug!("Read {} rows from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse chart entries from any reader. `path` is used only for error messages.
pub fn read_chart_entries<R: Read>(
    reader: R,
    path: &Path,
    progress: Option<&ProgressBar>,
) -> Result<Vec<ChartEntry>> {
    let csv_error = |source| ChartError::Csv {
        path: path.to_path_buf(),
        source,
    };

    // Artist and title are kept verbatim; identity is exact string equality.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns = ColumnIndex::from_headers(&headers, path)?;

    let mut entries = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        entries.push(parse_record(&record, columns, path, line)?);

        if let Some(pb) = progress {
            if entries.len() % 10_000 == 0 {
                pb.set_message(format!("{} rows read", entries.len()));
            }
        }
    }

    Ok(entries)
}

fn parse_record(
    record: &StringRecord,
    columns: ColumnIndex,
    path: &Path,
    line: u64,
) -> Result<ChartEntry> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let raw_date = field(columns.chart_date).trim();
    let chart_date = parse_chart_date(raw_date).ok_or_else(|| ChartError::InvalidDate {
        path: path.to_path_buf(),
        line,
        value: raw_date.to_string(),
    })?;

    let raw_peak = field(columns.peak_position).trim();
    let peak_position = raw_peak
        .parse::<u32>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| ChartError::InvalidPeakPosition {
            path: path.to_path_buf(),
            line,
            value: raw_peak.to_string(),
        })?;

    Ok(ChartEntry {
        artist: field(columns.artist).to_string(),
        title: field(columns.title).to_string(),
        chart_date,
        peak_position,
    })
}

/// Parse `YYYY-MM-DD`, optionally followed by a `T` or space and a time.
pub fn parse_chart_date(value: &str) -> Option<NaiveDate> {
    let date_part = match value.len() {
        10 => value,
        n if n > 10 => {
            let rest = value.get(10..)?;
            if !(rest.starts_with('T') || rest.starts_with(' ')) {
                return None;
            }
            value.get(..10)?
        }
        _ => return None,
    };

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
