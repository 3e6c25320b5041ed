//! ChartCohort - artist productivity by decade cohort
//!
//! A CLI tool that reduces Billboard chart history to per-artist career
//! metrics, summarizes them by decade of first hit and tests for a trend.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, malformed input, unwritable output, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod ingest;
mod models;
mod normalizer;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use models::TrendOutcome;
use normalizer::Normalizer;
use pipeline::ChartRun;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration is resolved first so `[general] verbose` reaches logging
    let (config, config_path) = match prepare_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&args, &config);

    info!("ChartCohort v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_path {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    if let Err(e) = run(args, config) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .chartcohort.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize charts, thresholds, and exclusion patterns.");
    Ok(())
}

/// Initialize logging from `RUST_LOG` or the verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(args.log_filter(config.general.verbose, rust_log.as_deref()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete pipeline.
///
/// Every chart is loaded and analyzed before anything is written, so a
/// malformed input leaves no partial output behind.
fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let normalizer = Normalizer::new(config.normalizer, &config.exclusions)?;

    let mut runs = Vec::with_capacity(config.charts.len());
    for chart in &config.charts {
        println!("📥 Loading {}: {}", chart.name, chart.input.display());
        let entries = ingest::load_chart_entries(&chart.input, !args.quiet)
            .with_context(|| format!("Failed to load chart '{}'", chart.name))?;

        runs.push(pipeline::analyze_chart(chart, &entries, &normalizer));
    }

    if args.dry_run {
        return handle_dry_run(&runs);
    }

    println!("\n📝 Writing tables...");
    for run in &runs {
        let paths = report::ChartTablePaths::new(&run.source, &config.output);
        report::write_chart_tables(
            &paths,
            &run.normalized.albums,
            &run.normalized.artists,
            &run.gap_stats,
            &run.hits_stats,
        )
        .with_context(|| format!("Failed to write tables for '{}'", run.source.name))?;
        info!(
            "Wrote {} and {}",
            paths.albums.display(),
            paths.artists.display()
        );
    }

    let duration = start_time.elapsed().as_secs_f64();
    let findings = pipeline::build_report(&runs, &config, normalizer.pattern_count(), duration);

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&findings)?,
        OutputFormat::Markdown => report::generate_markdown_report(&findings),
    };

    let report_path = &config.general.report;
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(report_path, &output)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    print_summary(&runs, config.trend.alpha);
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        report_path.display()
    );

    Ok(())
}

/// Handle --dry-run: report counts without writing any file.
fn handle_dry_run(runs: &[ChartRun]) -> Result<()> {
    println!("\n🔍 Dry run: nothing will be written.\n");

    for run in runs {
        let counts = &run.normalized.counts;
        println!("   {}", run.source.name);
        println!("     Chart entries:        {}", counts.total_entries);
        println!("     Top-40 entries:       {}", counts.top40_entries);
        println!("     Unique albums:        {}", counts.unique_albums);
        println!("     Compilations removed: {}", counts.compilations_removed);
        println!("     Albums analyzed:      {}", counts.albums_retained);
        println!("     Qualifying artists:   {}", run.normalized.artists.len());
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Print the per-chart console summary.
fn print_summary(runs: &[ChartRun], alpha: f64) {
    println!("\n📊 Summary:");

    for run in runs {
        let findings = run.findings();
        println!("\n   {}:", findings.name);
        println!("     Qualifying artists: {}", findings.qualifying_artists);
        println!("     Albums analyzed: {}", findings.counts.albums_retained);
        if let Some(gap) = findings.mean_avg_gap_years {
            println!("     Avg gap (mean): {:.2} years", gap);
        }
        if let Some(hits) = findings.mean_hits_first_10_years {
            println!("     Hits in first 10 years (mean): {:.2}", hits);
        }

        for outcome in [&findings.gap_trend, &findings.hits_trend] {
            match outcome {
                TrendOutcome::Computed(trend) => println!(
                    "     - {}: {} trend ({}, r={:.3})",
                    trend.metric,
                    trend.direction(),
                    if trend.is_significant(alpha) {
                        "significant"
                    } else {
                        "not significant"
                    },
                    trend.correlation
                ),
                TrendOutcome::Degenerate { metric, .. } => {
                    println!("     - {}: no trend computed", metric)
                }
            }
        }
    }
}

/// Load, merge and validate the configuration.
///
/// Also returns the file it came from, if any, for logging once the
/// subscriber is installed.
fn prepare_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, path) = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;
    Ok((config, path))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    // Try default location; a present but broken file is fatal
    match Config::load_default()? {
        Some(config) => Ok((config, Some(PathBuf::from(DEFAULT_CONFIG_FILE)))),
        None => Ok((Config::default(), None)),
    }
}
