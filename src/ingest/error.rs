use crate::config::ConfigError;

/// Errors that can occur while reading a raw record
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error reading the record
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV tokenizer error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A data line is missing fields or holds unparseable values
    #[error("Malformed input at line {line}: {reason}")]
    MalformedInput {
        /// 1-based line number in the file
        line: u64,
        /// What was wrong
        reason: String,
    },

    /// Reader was built with an unusable layout
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
