//! Compilation/reissue title classification.
//!
//! A best-effort heuristic: a title is excluded when any configured signal
//! matches its lower-cased form. False positives (a studio album called
//! "Soundtrack to a Summer") and false negatives are accepted.

use crate::error::{ChartError, Result};
use regex::Regex;

/// Compiled set of exclusion signals.
#[derive(Debug, Clone)]
pub struct ExclusionClassifier {
    patterns: Vec<Regex>,
}

impl ExclusionClassifier {
    /// Compile the given patterns. Fails on the first invalid one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|source| ChartError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if the title looks like a compilation, reissue or soundtrack.
    pub fn is_compilation(&self, title: &str) -> bool {
        let lowered = title.to_lowercase();
        self.patterns.iter().any(|re| re.is_match(&lowered))
    }
}
