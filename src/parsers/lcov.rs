//! Parser for the LCOV `.info` tracefile format.
//!
//! Reference: https://ltp.sourceforge.net/coverage/lcov/geninfo.1.php
//!
//! Records we care about:
//!   SF:<path to source file>
//!   DA:<line number>,<execution count>[,<checksum>]
//!   LF:<lines found>
//!   LH:<lines hit>
//!   end_of_record
//!
//! Everything else (TN, FN, FNDA, BRDA, ...) is skipped.

use std::io::BufRead;

use crate::error::{GateError, Result};
use crate::model::FileCoverageRecord;

/// Parse LCOV data from raw bytes into one record per source file.
pub fn parse(input: &[u8]) -> Result<Vec<FileCoverageRecord>> {
    let mut records = Vec::new();
    parse_streaming(&mut &*input, &mut |record| {
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

/// Per-file accumulator. `LF`/`LH` take precedence over counts derived from
/// `DA` lines when the tracefile provides them.
#[derive(Default)]
struct Pending {
    record: FileCoverageRecord,
    da_found: u64,
    da_hit: u64,
    lf: Option<u64>,
    lh: Option<u64>,
}

impl Pending {
    fn new(path: &str) -> Self {
        Self {
            record: FileCoverageRecord::new(path),
            ..Default::default()
        }
    }

    fn finish(self) -> FileCoverageRecord {
        let mut record = self.record;
        let found = self.lf.unwrap_or(self.da_found);
        let hit = self.lh.unwrap_or(self.da_hit);
        record.lines_found = found;
        record.lines_hit = hit.min(found);
        record
    }
}

/// Streaming LCOV parser. Calls `emit` once per `end_of_record`.
pub fn parse_streaming(
    reader: &mut dyn BufRead,
    emit: &mut dyn FnMut(FileCoverageRecord) -> Result<()>,
) -> Result<()> {
    let mut current: Option<Pending> = None;
    let mut line_no = 0usize;

    let mut raw_line = String::new();
    loop {
        raw_line.clear();
        let n = reader.read_line(&mut raw_line).map_err(|e| {
            GateError::Parse(format!("line {}: {}", line_no + 1, e))
        })?;
        if n == 0 {
            break; // EOF
        }
        line_no += 1;

        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "end_of_record" {
            if let Some(pending) = current.take() {
                emit(pending.finish())?;
            }
            continue;
        }

        let (tag, value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };

        match tag {
            "SF" => {
                // A new SF without end_of_record closes the previous file.
                if let Some(pending) = current.replace(Pending::new(value)) {
                    emit(pending.finish())?;
                }
            }
            "DA" => {
                // Negative counts (e.g. -1) mark non-instrumentable lines.
                if let Some(pending) = current.as_mut() {
                    let mut parts = value.splitn(3, ',');
                    let line_number = parts.next().and_then(|s| s.parse::<u32>().ok());
                    let count = parts.next().and_then(|s| s.parse::<i64>().ok());
                    if let (Some(line_number), Some(count)) = (line_number, count) {
                        if count >= 0 {
                            pending.da_found += 1;
                            if count > 0 {
                                pending.da_hit += 1;
                            } else {
                                pending.record.uncovered_lines.push(line_number);
                            }
                        }
                    }
                }
            }
            "LF" => {
                if let Some(pending) = current.as_mut() {
                    pending.lf = Some(parse_count(tag, value, line_no)?);
                }
            }
            "LH" => {
                if let Some(pending) = current.as_mut() {
                    pending.lh = Some(parse_count(tag, value, line_no)?);
                }
            }
            _ => {}
        }
    }

    // File ended without end_of_record
    if let Some(pending) = current.take() {
        emit(pending.finish())?;
    }

    Ok(())
}

fn parse_count(tag: &str, value: &str, line_no: usize) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        GateError::Parse(format!(
            "line {line_no}: expected a non-negative count after {tag}:, got '{value}'"
        ))
    })
}
