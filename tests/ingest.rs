mod common;

use lcov_gate::cli;
use lcov_gate::error::GateError;
use lcov_gate::ingest::load_report;

#[test]
fn load_report_from_disk() {
    let (_dir, path) = common::write_report(include_str!("fixtures/lcov.info"));

    let records = load_report(&path).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].path, "lib/main.dart");
    assert_eq!(records[0].uncovered_lines, vec![7]);
    assert_eq!(records[1].lines_hit, 0);
}

#[test]
fn missing_report_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.info");

    let err = load_report(&path).unwrap_err();
    assert!(matches!(err, GateError::ReportNotFound(ref p) if p.contains("nope.info")));
}

#[test]
fn empty_report_is_an_error() {
    let (_dir, path) = common::write_report("");

    let err = load_report(&path).unwrap_err();
    assert!(matches!(err, GateError::EmptyReport(_)));
}

#[test]
fn malformed_summary_names_the_file() {
    let (_dir, path) = common::write_report("SF:a.dart\nLH:lots\nend_of_record\n");

    let err = load_report(&path).unwrap_err();
    assert!(matches!(err, GateError::Parse(ref m) if m.contains("lcov.info") && m.contains("LH")));
}

#[test]
fn check_fails_on_empty_report() {
    let (_dir, path) = common::write_report("TN:\n");
    let config = common::config(path, "0", "");

    let err = cli::check(&config, None).unwrap_err();
    assert!(err.to_string().contains("Failed to load report"));
}
