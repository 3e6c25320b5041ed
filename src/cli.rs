//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::ChartSource;
use clap::Parser;
use std::path::PathBuf;

/// ChartCohort - artist productivity by decade cohort from Billboard chart history
///
/// Reduces weekly chart entries to one row per top-40 studio album, derives
/// per-artist career metrics, summarizes them by decade of first hit and
/// tests for a trend across decades.
///
/// Examples:
///   chartcohort
///   chartcohort --config analysis.toml --format json -o findings.json
///   chartcohort --chart "Billboard 200=billboard_200=raw/b200.csv"
///   chartcohort --dry-run
///   chartcohort --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .chartcohort.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "CHARTCOHORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Chart to process, as NAME=SLUG=PATH (repeatable)
    ///
    /// Replaces the charts listed in the configuration file.
    #[arg(long = "chart", value_name = "NAME=SLUG=PATH", value_parser = ChartSource::parse_spec)]
    pub charts: Vec<ChartSource>,

    /// Directory for album and artist tables
    #[arg(long, value_name = "DIR")]
    pub processed_dir: Option<PathBuf>,

    /// Directory for cohort statistics tables
    #[arg(long, value_name = "DIR")]
    pub tables_dir: Option<PathBuf>,

    /// Output file path for the findings report
    #[arg(short = 'o', long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and normalize every chart without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .chartcohort.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the configuration file;
    /// `--quiet` overrides it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Filter directives for the log subscriber.
    ///
    /// A non-empty `RUST_LOG` value takes precedence over the verbosity flags.
    pub fn log_filter(&self, config_verbose: bool, rust_log: Option<&str>) -> String {
        match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
            Some(directives) => directives.to_string(),
            None => self.log_level(config_verbose).as_str().to_lowercase(),
        }
    }
}
