//! Spearman rank-correlation trend test across decade cohorts.

use super::stats::{average_ranks, pearson, student_t_two_sided};
use crate::error::{ChartError, Result};
use crate::models::{ArtistRecord, Metric, TrendResult};
use std::collections::BTreeSet;

/// Correlate each artist's decade cohort with a metric.
///
/// Uses the raw per-artist pairs, not cohort means. Fails with
/// [`ChartError::DegenerateInput`] when either dimension has fewer than two
/// distinct values.
pub fn trend_test(artists: &[ArtistRecord], metric: Metric) -> Result<TrendResult> {
    let decades: Vec<f64> = artists.iter().map(|a| a.decade_cohort as f64).collect();
    let values: Vec<f64> = artists.iter().map(|a| a.metric(metric)).collect();

    if distinct(&decades) < 2 {
        return Err(ChartError::DegenerateInput(format!(
            "{} artists span fewer than two decade cohorts",
            artists.len()
        )));
    }
    if distinct(&values) < 2 {
        return Err(ChartError::DegenerateInput(format!(
            "{} is constant across all artists",
            metric.column()
        )));
    }

    let correlation = pearson(&average_ranks(&decades), &average_ranks(&values)).ok_or_else(
        || ChartError::DegenerateInput(format!("{} ranks have no variance", metric.column())),
    )?;

    let n = artists.len();
    let df = (n - 2) as f64;
    let p_value = if n == 2 {
        1.0
    } else if 1.0 - correlation.abs() < 1e-12 {
        0.0
    } else {
        let t = correlation * (df / (1.0 - correlation * correlation)).sqrt();
        student_t_two_sided(t, df)
    };

    Ok(TrendResult {
        metric,
        correlation,
        p_value,
        n,
    })
}

fn distinct(values: &[f64]) -> usize {
    values.iter().map(|v| v.to_bits()).collect::<BTreeSet<_>>().len()
}
