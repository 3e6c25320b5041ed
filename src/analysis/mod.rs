//! Cohort analysis.
//!
//! Summary statistics per decade cohort and the Spearman trend test.

pub mod cohort;
pub mod stats;
pub mod trend;

pub use cohort::{cohort_distribution, cohort_summary};
pub use trend::trend_test;
