//! Report and table output.

pub mod generator;
pub mod tables;

pub use generator::{generate_json_report, generate_markdown_report};
pub use tables::{write_chart_tables, ChartTablePaths};
