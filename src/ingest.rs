use std::path::Path;

use crate::error::{GateError, Result};
use crate::model::FileCoverageRecord;
use crate::parsers::lcov;

/// Read and parse an LCOV report from disk.
///
/// A missing file, a file that does not parse and a file without any
/// `SF:` records are all configuration errors naming `path`.
pub fn load_report(path: &Path) -> Result<Vec<FileCoverageRecord>> {
    let content = match std::fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GateError::ReportNotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let records = lcov::parse(&content).map_err(|e| match e {
        GateError::Parse(msg) => GateError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })?;

    if records.is_empty() {
        return Err(GateError::EmptyReport(path.display().to_string()));
    }

    log::debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}
