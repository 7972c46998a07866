//! Glob-based exclusion of report paths.
//!
//! Patterns are matched against the path string exactly as it appears in the
//! report. Nothing is resolved against the filesystem. A single `*` or `?`
//! never crosses a `/`; only `**` spans directories.

use glob::{MatchOptions, Pattern};

use crate::error::{GateError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A set of shell-style glob patterns. A path is excluded when any pattern
/// matches it.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRuleSet {
    patterns: Vec<Pattern>,
}

impl ExclusionRuleSet {
    /// An empty rule set that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile each pattern, failing on the first malformed one.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|source| GateError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Parse a whitespace-separated list such as `"**/*.g.dart lib/gen/*"`.
    pub fn parse(list: &str) -> Result<Self> {
        Self::new(list.split_whitespace())
    }

    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
