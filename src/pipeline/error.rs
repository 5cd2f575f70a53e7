use std::fmt;

use crate::config::ConfigError;
use crate::correction::CorrectionError;
use crate::fit::FitError;
use crate::ingest::IngestError;
use crate::report::ReportError;
use crate::resample::ResampleError;
use crate::segment::SegmentError;

/// Pipeline stage a failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Configuration validation
    Config,
    /// Reading the raw record
    Ingest,
    /// Resampling onto the shared time base
    Resample,
    /// Thermocouple correction
    Correct,
    /// Segment extraction
    Segment,
    /// Segment fitting
    Fit,
    /// Writing result tables
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Ingest => "ingest",
            Stage::Resample => "resample",
            Stage::Correct => "correct",
            Stage::Segment => "segment",
            Stage::Fit => "fit",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Error raised by any stage of the reduction pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raw record could not be read
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Channels could not be resampled
    #[error(transparent)]
    Resample(#[from] ResampleError),

    /// Thermocouple correction failed
    #[error(transparent)]
    Correct(#[from] CorrectionError),

    /// Segments could not be extracted
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// A segment could not be fitted
    #[error(transparent)]
    Fit(#[from] FitError),

    /// Result tables could not be written
    #[error(transparent)]
    Write(#[from] ReportError),
}

impl PipelineError {
    /// Stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config(_) => Stage::Config,
            PipelineError::Ingest(_) => Stage::Ingest,
            PipelineError::Resample(_) => Stage::Resample,
            PipelineError::Correct(_) => Stage::Correct,
            PipelineError::Segment(_) => Stage::Segment,
            PipelineError::Fit(_) => Stage::Fit,
            PipelineError::Write(_) => Stage::Write,
        }
    }
}
