use std::io;

/// Errors raised while assembling or writing result tables
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Columns of the series table disagree in length
    #[error("Channel length mismatch for {what}: expected {expected}, got {actual}")]
    ChannelLengthMismatch {
        /// Which column disagreed
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}
