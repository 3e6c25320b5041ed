//! Findings report generation.
//!
//! This module renders the run's findings as Markdown or JSON. Charts are
//! not rendered; the cohort tables carry the same numbers.

use crate::models::{ChartFindings, CohortStats, FilterCounts, Report, ReportMetadata, TrendOutcome};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Artist Productivity by Decade Cohort\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_key_findings_section(&report.charts, report.metadata.alpha));

    for chart in &report.charts {
        output.push_str(&generate_chart_section(chart, report.metadata.alpha));
    }

    output.push_str(&generate_caveats_section(&report.caveats));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Charts Processed:** {}\n", metadata.charts_processed));
    section.push_str(&format!(
        "- **Hit Threshold:** peak position {} or better\n",
        metadata.peak_cutoff
    ));
    section.push_str(&format!(
        "- **Qualifying Artists:** {}+ studio albums\n",
        metadata.min_albums
    ));
    section.push_str(&format!(
        "- **Early-Career Window:** {} years\n",
        metadata.window_years
    ));
    section.push_str(&format!(
        "- **Exclusion Patterns:** {}\n",
        metadata.exclusion_patterns
    ));
    section.push_str(&format!("- **Significance Level:** {}\n", metadata.alpha));
    section.push_str(&format!(
        "- **Processing Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Markdown heading anchor for a chart.
fn chart_anchor(chart: &ChartFindings) -> String {
    chart
        .name
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' => Some(c),
            ' ' => Some('-'),
            _ => None,
        })
        .collect()
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Key Findings](#key-findings)\n");

    for chart in &report.charts {
        toc.push_str(&format!("- [{}](#{})\n", chart.name, chart_anchor(chart)));
    }

    if !report.caveats.is_empty() {
        toc.push_str("- [Data Quality Notes](#data-quality-notes)\n");
    }

    toc.push('\n');

    toc
}

/// One-line description of a trend outcome.
fn describe_trend(outcome: &TrendOutcome, alpha: f64) -> String {
    match outcome {
        TrendOutcome::Computed(trend) => {
            let significance = if trend.is_significant(alpha) {
                "significant"
            } else {
                "not significant"
            };
            format!(
                "{} trend ({}, r = {:.3}, p = {:.4}, n = {})",
                trend.direction(),
                significance,
                trend.correlation,
                trend.p_value,
                trend.n
            )
        }
        TrendOutcome::Degenerate { reason, .. } => format!("no trend computed ({})", reason),
    }
}

/// Generate the key findings section.
fn generate_key_findings_section(charts: &[ChartFindings], alpha: f64) -> String {
    let mut section = String::new();

    section.push_str("## Key Findings\n\n");

    if charts.is_empty() {
        section.push_str("No charts were processed.\n\n");
        return section;
    }

    for chart in charts {
        section.push_str(&format!(
            "**{}** ({} qualifying artists):\n\n",
            chart.name, chart.qualifying_artists
        ));
        section.push_str(&format!(
            "- Average gap between hits: {}\n",
            describe_trend(&chart.gap_trend, alpha)
        ));
        section.push_str(&format!(
            "- Hits in first 10 years: {}\n\n",
            describe_trend(&chart.hits_trend, alpha)
        ));
    }

    section
}

/// Generate the processing counts table.
fn generate_counts_table(counts: &FilterCounts, qualifying_artists: usize) -> String {
    let mut table = String::new();

    table.push_str("| Stage | Count |\n");
    table.push_str("|:---|---:|\n");
    table.push_str(&format!("| Chart entries | {} |\n", counts.total_entries));
    table.push_str(&format!("| Top-40 entries | {} |\n", counts.top40_entries));
    table.push_str(&format!("| Unique albums | {} |\n", counts.unique_albums));
    table.push_str(&format!("| Artists with a top-40 album | {} |\n", counts.unique_artists));
    table.push_str(&format!(
        "| Compilations/soundtracks removed | {} |\n",
        counts.compilations_removed
    ));
    table.push_str(&format!("| Albums analyzed | {} |\n", counts.albums_retained));
    table.push_str(&format!("| Qualifying artists | {} |\n\n", qualifying_artists));

    table
}

/// Generate a cohort statistics table.
fn generate_stats_table(stats: &[CohortStats]) -> String {
    if stats.is_empty() {
        return "No qualifying artists.\n\n".to_string();
    }

    let mut table = String::new();

    table.push_str("| Cohort | n | Mean | Median | Std | Q25 | Q75 |\n");
    table.push_str("|:---|---:|---:|---:|---:|---:|---:|\n");

    for row in stats {
        let std = row
            .std
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "n/a".to_string());
        table.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {} | {:.2} | {:.2} |\n",
            row.decade_cohort_label, row.n, row.mean, row.median, std, row.q25, row.q75
        ));
    }
    table.push('\n');

    table
}

/// Generate the section for a single chart.
fn generate_chart_section(chart: &ChartFindings, alpha: f64) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", chart.name));

    section.push_str("### Processing\n\n");
    section.push_str(&generate_counts_table(&chart.counts, chart.qualifying_artists));

    if let (Some(gap), Some(hits)) = (chart.mean_avg_gap_years, chart.mean_hits_first_10_years) {
        section.push_str(&format!(
            "Mean gap between hits: **{:.2} years**. Mean hits in first 10 years: **{:.2}**.\n\n",
            gap, hits
        ));
    }

    if !chart.cohort_distribution.is_empty() {
        section.push_str("### Cohort Distribution\n\n");
        section.push_str("| Cohort | Artists |\n");
        section.push_str("|:---|---:|\n");
        for (label, n) in &chart.cohort_distribution {
            section.push_str(&format!("| {} | {} |\n", label, n));
        }
        section.push('\n');
    }

    section.push_str("### Average Gap Between Hits (years)\n\n");
    section.push_str(&generate_stats_table(&chart.gap_stats));
    section.push_str(&format!(
        "> Trend: {}\n\n",
        describe_trend(&chart.gap_trend, alpha)
    ));

    section.push_str("### Hits in First 10 Years\n\n");
    section.push_str(&generate_stats_table(&chart.hits_stats));
    section.push_str(&format!(
        "> Trend: {}\n\n",
        describe_trend(&chart.hits_trend, alpha)
    ));

    section
}

/// Generate the data quality notes section.
fn generate_caveats_section(caveats: &[String]) -> String {
    if caveats.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Data Quality Notes\n\n");
    for caveat in caveats {
        section.push_str(&format!("- {}\n", caveat));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by chartcohort v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
