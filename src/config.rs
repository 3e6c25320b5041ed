//! Configuration file handling.
//!
//! This module handles loading, validating and merging configuration from
//! `.chartcohort.toml` files.

use crate::error::ChartError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".chartcohort.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,

    /// Album and artist qualification thresholds.
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Trend test settings.
    #[serde(default)]
    pub trend: TrendConfig,

    /// Compilation/reissue title signals.
    #[serde(default)]
    pub exclusions: ExclusionConfig,

    /// Charts to process, in order.
    #[serde(default = "default_charts")]
    pub charts: Vec<ChartSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            output: OutputConfig::default(),
            normalizer: NormalizerConfig::default(),
            trend: TrendConfig::default(),
            exclusions: ExclusionConfig::default(),
            charts: default_charts(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Findings report path.
    #[serde(default = "default_report")]
    pub report: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            report: default_report(),
            verbose: false,
        }
    }
}

fn default_report() -> PathBuf {
    PathBuf::from("output/findings.md")
}

/// Where derived tables are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Album and artist tables.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    /// Cohort statistics tables.
    #[serde(default = "default_tables_dir")]
    pub tables_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            processed_dir: default_processed_dir(),
            tables_dir: default_tables_dir(),
        }
    }
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_tables_dir() -> PathBuf {
    PathBuf::from("output/tables")
}

/// Qualification thresholds for albums and artists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Worst peak position that still counts as a hit.
    #[serde(default = "default_peak_cutoff")]
    pub peak_cutoff: u32,

    /// Minimum surviving albums for an artist to qualify.
    #[serde(default = "default_min_albums")]
    pub min_albums: usize,

    /// Length of the early-career window, in years of 365.25 days.
    #[serde(default = "default_window_years")]
    pub window_years: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            peak_cutoff: default_peak_cutoff(),
            min_albums: default_min_albums(),
            window_years: default_window_years(),
        }
    }
}

fn default_peak_cutoff() -> u32 {
    40
}

fn default_min_albums() -> usize {
    3
}

fn default_window_years() -> f64 {
    10.0
}

/// Trend test settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Significance level for reporting a trend.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

fn default_alpha() -> f64 {
    0.05
}

/// Title patterns that mark an album as a compilation or reissue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// Regular expressions matched against the lower-cased title.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }
}

fn default_patterns() -> Vec<String> {
    vec![
        r"\bgreatest\s+hits?\b",
        r"\bbest\s+of\b",
        r"\bhits\b.*\bcollection\b",
        r"\bcollected\b",
        r"\banthology\b",
        r"\bessential\b",
        r"\bultimate\b",
        r"\bcomplete\b.*\balbum",
        r"\bgold\b.*\bplatinum\b",
        r"\bremaster(ed)?\b",
        r"\bdeluxe\b.*\bedition\b",
        r"\bexpanded\b.*\bedition\b",
        r"\banniversary\b.*\bedition\b",
        r"\bspecial\b.*\bedition\b",
        r"\bcollector.?s?\b.*\bedition\b",
        r"\b20th\s+century\s+masters\b",
        r"\blegacy\b.*\bedition\b",
        r"\bdefinitive\b",
        r"\bvery\s+best\b",
        r"\ball[\s-]time\b.*\bhits\b",
        r"\bnumber\s+ones?\b",
        r"\b#1.?s\b",
        r"\bplatinum\b.*\bcollection\b",
        r"\bgold\b.*\bcollection\b",
        r"\bcompilation\b",
        r"\bsoundtrack\b",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// One chart input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSource {
    /// Display name, e.g. "Billboard 200".
    pub name: String,
    /// File name prefix for outputs, e.g. "billboard_200".
    pub slug: String,
    /// Raw chart CSV.
    pub input: PathBuf,
}

impl ChartSource {
    /// Parse a `NAME=SLUG=PATH` command-line specification.
    pub fn parse_spec(spec: &str) -> std::result::Result<Self, String> {
        let parts: Vec<&str> = spec.splitn(3, '=').collect();
        match parts.as_slice() {
            [name, slug, input] if !name.is_empty() && !slug.is_empty() && !input.is_empty() => {
                Ok(Self {
                    name: name.to_string(),
                    slug: slug.to_string(),
                    input: PathBuf::from(input),
                })
            }
            _ => Err(format!("Chart must be NAME=SLUG=PATH, got '{}'", spec)),
        }
    }
}

fn default_charts() -> Vec<ChartSource> {
    vec![
        ChartSource {
            name: "Billboard 200".to_string(),
            slug: "billboard_200".to_string(),
            input: PathBuf::from("data/raw/billboard_200.csv"),
        },
        ChartSource {
            name: "R&B/Hip-Hop Albums".to_string(),
            slug: "rnb_hiphop".to_string(),
            input: PathBuf::from("data/raw/rnb_hiphop_albums.csv"),
        },
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref report) = args.report {
            self.general.report = report.clone();
        }
        if let Some(ref dir) = args.processed_dir {
            self.output.processed_dir = dir.clone();
        }
        if let Some(ref dir) = args.tables_dir {
            self.output.tables_dir = dir.clone();
        }

        // Charts given on the command line replace the configured list
        if !args.charts.is_empty() {
            self.charts = args.charts.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check value ranges that serde cannot express.
    ///
    /// Pattern compilation is checked separately when the classifier is built.
    pub fn validate(&self) -> std::result::Result<(), ChartError> {
        let n = &self.normalizer;
        if n.peak_cutoff == 0 {
            return Err(ChartError::InvalidConfig(
                "normalizer.peak_cutoff must be at least 1".to_string(),
            ));
        }
        if n.min_albums < 2 {
            return Err(ChartError::InvalidConfig(
                "normalizer.min_albums must be at least 2".to_string(),
            ));
        }
        if n.window_years <= 0.0 || n.window_years.is_nan() {
            return Err(ChartError::InvalidConfig(
                "normalizer.window_years must be positive".to_string(),
            ));
        }
        let alpha = self.trend.alpha;
        if alpha <= 0.0 || alpha >= 1.0 || alpha.is_nan() {
            return Err(ChartError::InvalidConfig(
                "trend.alpha must be between 0 and 1".to_string(),
            ));
        }
        if self.charts.is_empty() {
            return Err(ChartError::InvalidConfig(
                "at least one chart must be configured".to_string(),
            ));
        }

        let mut slugs = HashSet::new();
        for chart in &self.charts {
            if chart.slug.trim().is_empty() {
                return Err(ChartError::InvalidConfig(format!(
                    "chart '{}' has an empty slug",
                    chart.name
                )));
            }
            if !slugs.insert(chart.slug.as_str()) {
                return Err(ChartError::InvalidConfig(format!(
                    "duplicate chart slug '{}'",
                    chart.slug
                )));
            }
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.normalizer.peak_cutoff, 40);
        assert_eq!(config.normalizer.min_albums, 3);
        assert_eq!(config.charts.len(), 2);
        assert_eq!(config.charts[0].slug, "billboard_200");
        assert!(config
            .exclusions
            .patterns
            .contains(&r"\bsoundtrack\b".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
report = "out/report.json"

[normalizer]
peak_cutoff = 10
min_albums = 4

[exclusions]
patterns = ["\\blive\\b"]

[[charts]]
name = "Country Albums"
slug = "country"
input = "raw/country.csv"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.report, PathBuf::from("out/report.json"));
        assert_eq!(config.normalizer.peak_cutoff, 10);
        assert_eq!(config.normalizer.min_albums, 4);
        assert_eq!(config.normalizer.window_years, 10.0);
        assert_eq!(config.exclusions.patterns, vec![r"\blive\b"]);
        assert_eq!(config.charts.len(), 1);
        assert_eq!(config.charts[0].name, "Country Albums");
        assert_eq!(config.output.tables_dir, PathBuf::from("output/tables"));
    }

    #[test]
    fn test_verbose_from_file_survives_merge() {
        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        let args = crate::cli::Args::try_parse_from(["chartcohort"]).unwrap();
        config.merge_with_args(&args);
        assert!(config.general.verbose);
        assert_eq!(
            args.log_level(config.general.verbose),
            tracing::Level::DEBUG
        );

        let mut config = Config::default();
        config.merge_with_args(&args);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[normalizer]"));
        assert!(toml_str.contains("[[charts]]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.exclusions.patterns, default_patterns());
        assert_eq!(reparsed.charts, default_charts());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.normalizer.min_albums = 1;
        assert!(config.validate().is_err());

        for window in [0.0, -10.0, f64::NAN] {
            let mut config = Config::default();
            config.normalizer.window_years = window;
            assert!(config.validate().is_err(), "window_years = {}", window);
        }

        for alpha in [0.0, 1.0, 1.5, f64::NAN] {
            let mut config = Config::default();
            config.trend.alpha = alpha;
            assert!(config.validate().is_err(), "alpha = {}", alpha);
        }

        let mut config = Config::default();
        config.trend.alpha = 0.01;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.charts[1].slug = "billboard_200".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.charts.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chart_spec_parsing() {
        let chart = ChartSource::parse_spec("Hot 100=hot100=data/hot100.csv").unwrap();
        assert_eq!(chart.name, "Hot 100");
        assert_eq!(chart.slug, "hot100");
        assert_eq!(chart.input, PathBuf::from("data/hot100.csv"));

        assert!(ChartSource::parse_spec("missing-parts").is_err());
        assert!(ChartSource::parse_spec("=slug=path").is_err());
    }
}
