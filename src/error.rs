use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid minimum coverage '{0}': expected a number such as 80 or 92.5")]
    InvalidThreshold(String),

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Report contains no coverage records: {0}")]
    EmptyReport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("{0}")]
    CoverageFailure(String),
}

pub type Result<T> = std::result::Result<T, GateError>;
