//! In-memory representation of a parsed coverage report and of the verdict
//! computed from it. Parsers produce `FileCoverageRecord`s, the gate folds
//! them into a `CoverageVerdict`.

use std::collections::HashMap;

/// Compute a coverage percentage, returning 0.0 when the total is zero.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 * 100.0 / total as f64
    }
}

/// Coverage summary for a single source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCoverageRecord {
    /// Path exactly as recorded in the report (`SF:`).
    pub path: String,
    pub lines_found: u64,
    pub lines_hit: u64,
    /// Line numbers with a zero hit count, in report order.
    pub uncovered_lines: Vec<u32>,
}

impl FileCoverageRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Uncovered line numbers keyed by file path, in insertion order.
///
/// Files are kept in the order they were first seen so that rendered
/// messages are deterministic. Equality compares the mapping itself and
/// ignores file order.
#[derive(Debug, Clone, Default)]
pub struct MissingLines {
    entries: Vec<(String, Vec<u32>)>,
    /// Position of each path in `entries`.
    index: HashMap<String, usize>,
}

impl MissingLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `lines` to the entry for `path`, creating it if needed.
    /// Appending nothing never creates an entry.
    pub fn extend(&mut self, path: &str, lines: &[u32]) {
        if lines.is_empty() {
            return;
        }
        match self.index.get(path) {
            Some(&i) => self.entries[i].1.extend_from_slice(lines),
            None => {
                self.index.insert(path.to_string(), self.entries.len());
                self.entries.push((path.to_string(), lines.to_vec()));
            }
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[u32]> {
        self.index
            .get(path)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.entries
            .iter()
            .map(|(path, lines)| (path.as_str(), lines.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for MissingLines {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(path, lines)| other.get(path) == Some(lines))
    }
}

impl Eq for MissingLines {}

/// Result of evaluating a report against a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageVerdict {
    pub total_lines_found: u64,
    pub total_lines_hit: u64,
    /// Percentage in `[0, 100]`; 0 when nothing was instrumented.
    pub coverage_percent: f64,
    pub passed: bool,
    pub missing_by_file: MissingLines,
}

impl CoverageVerdict {
    /// Percentage points still needed to reach `min_coverage` (0 if met).
    #[must_use]
    pub fn gap_to(&self, min_coverage: f64) -> f64 {
        (min_coverage - self.coverage_percent).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent(0, 0), 0.0);
        assert!(!percent(0, 0).is_nan());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(19, 20), 95.0);
        assert_eq!(percent(10, 10), 100.0);
    }

    #[test]
    fn test_missing_lines_preserves_insertion_order() {
        let mut missing = MissingLines::new();
        missing.extend("b.dart", &[3]);
        missing.extend("a.dart", &[1, 2]);
        missing.extend("b.dart", &[9, 3]);

        let entries: Vec<_> = missing.iter().collect();
        assert_eq!(
            entries,
            vec![("b.dart", &[3, 9, 3][..]), ("a.dart", &[1, 2][..])]
        );
    }

    #[test]
    fn test_missing_lines_many_files() {
        let mut missing = MissingLines::new();
        for round in 0..2u32 {
            for i in 0..500u32 {
                missing.extend(&format!("lib/f{i}.dart"), &[i + round]);
            }
        }
        assert_eq!(missing.len(), 500);
        assert_eq!(missing.get("lib/f0.dart"), Some(&[0, 1][..]));
        assert_eq!(missing.get("lib/f499.dart"), Some(&[499, 500][..]));
        assert_eq!(missing.iter().nth(3).map(|(p, _)| p), Some("lib/f3.dart"));
    }

    #[test]
    fn test_missing_lines_eq_ignores_file_order() {
        let mut a = MissingLines::new();
        a.extend("a.dart", &[1]);
        a.extend("b.dart", &[2]);
        let mut b = MissingLines::new();
        b.extend("b.dart", &[2]);
        b.extend("a.dart", &[1]);
        assert_eq!(a, b);

        b.extend("a.dart", &[4]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_lines_skips_empty() {
        let mut missing = MissingLines::new();
        missing.extend("a.dart", &[]);
        assert!(missing.is_empty());
        assert_eq!(missing.get("a.dart"), None);
    }

    #[test]
    fn test_gap_to() {
        let verdict = CoverageVerdict {
            total_lines_found: 20,
            total_lines_hit: 19,
            coverage_percent: 95.0,
            passed: false,
            missing_by_file: MissingLines::new(),
        };
        assert_eq!(verdict.gap_to(100.0), 5.0);
        assert_eq!(verdict.gap_to(90.0), 0.0);
    }
}
