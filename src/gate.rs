//! The coverage gate: fold per-file records into a single pass/fail verdict.

use std::fmt;
use std::str::FromStr;

use crate::error::GateError;
use crate::exclude::ExclusionRuleSet;
use crate::model::{percent, CoverageVerdict, FileCoverageRecord, MissingLines};

/// Minimum line coverage, in percent, a report must reach to pass.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(100.0);

    /// Build a threshold from an already-numeric value. Non-finite values
    /// are rejected.
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Threshold {
    type Err = GateError;

    /// Accepts plain decimal numbers (`"80"`, `" 92.5 "`). Anything else,
    /// including `"10%"`, is a configuration error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::DEFAULT);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Threshold::new)
            .ok_or_else(|| GateError::InvalidThreshold(s.to_string()))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Evaluate `records` against `min_coverage`, skipping excluded files.
///
/// Totals are plain sums, so the result does not depend on record order.
/// When no lines remain after exclusion the coverage is 0%, which only
/// passes a threshold of 0 or below.
#[must_use]
pub fn evaluate(
    records: &[FileCoverageRecord],
    exclusions: &ExclusionRuleSet,
    min_coverage: Threshold,
) -> CoverageVerdict {
    let mut total_lines_found = 0u64;
    let mut total_lines_hit = 0u64;
    let mut missing_by_file = MissingLines::new();

    for record in records
        .iter()
        .filter(|r| !exclusions.is_excluded(&r.path))
    {
        debug_assert!(
            record.lines_hit <= record.lines_found,
            "{}: hit {} > found {}",
            record.path,
            record.lines_hit,
            record.lines_found
        );
        total_lines_found += record.lines_found;
        total_lines_hit += record.lines_hit;
        missing_by_file.extend(&record.path, &record.uncovered_lines);
    }

    let coverage_percent = percent(total_lines_hit, total_lines_found);

    CoverageVerdict {
        total_lines_found,
        total_lines_hit,
        coverage_percent,
        passed: coverage_percent >= min_coverage.value(),
        missing_by_file,
    }
}

/// Plain-text failure message listing every file with uncovered lines.
#[must_use]
pub fn failure_message(verdict: &CoverageVerdict, min_coverage: Threshold) -> String {
    let mut out = format!(
        "Coverage {:.2}% ({}/{} lines) is below the minimum of {}%",
        verdict.coverage_percent,
        verdict.total_lines_hit,
        verdict.total_lines_found,
        min_coverage
    );
    if !verdict.missing_by_file.is_empty() {
        out.push_str("\nUncovered lines:");
        for (path, lines) in verdict.missing_by_file.iter() {
            out.push_str(&format!("\n  {path}: {}", join_lines(lines)));
        }
    }
    out
}

/// Comma-join line numbers, e.g. `"3, 7, 12"`.
pub(crate) fn join_lines(lines: &[u32]) -> String {
    lines
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
