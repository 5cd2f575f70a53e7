//! # Reduction Pipeline
//!
//! Chains the stages for one run:
//!
//! ```text
//! raw record -> resample -> correct -> segments -> fits -> tables
//! ```
//!
//! A [`Reducer`] is immutable once built and can be shared between threads,
//! so batches are reduced one run per task (see [`process_batch`]).

mod batch;
mod error;
mod output;

pub use batch::{process_batch, BatchSummary, RunFailure, RunOutcome};
pub use error::{PipelineError, Stage};
pub use output::{write_run_outputs, RunManifest, RunOutputs};

use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::PipelineConfig;
use crate::correction::correct_series;
use crate::fit::{fit_segments, SegmentFit};
use crate::ingest::{RawRun, RawRunReader};
use crate::report::{aggregate, ReportTables};
use crate::resample::{resample_run, ResampledSeries};
use crate::segment::extract_segments;

/// Everything produced by reducing one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// File the run was read from, if any
    pub source: Option<PathBuf>,
    /// Number of raw data lines
    pub raw_lines: usize,
    /// Run on the shared time base (uncorrected voltages)
    pub series: ResampledSeries,
    /// Fit of every segment
    pub fits: Vec<SegmentFit>,
    /// Result tables
    pub tables: ReportTables,
}

impl RunReport {
    /// Number of fitted segments
    pub fn segment_count(&self) -> usize {
        self.fits.len()
    }
}

/// Runs the reduction pipeline with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Reducer {
    config: PipelineConfig,
    reader: RawRunReader,
}

impl Reducer {
    /// Create a reducer, validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let reader = RawRunReader::new(config.layout.clone(), config.header_lines)?;
        Ok(Self { config, reader })
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read and reduce one raw record file.
    pub fn reduce_file<P: AsRef<Path>>(&self, path: P) -> Result<RunReport, PipelineError> {
        let path = path.as_ref();
        let run = self.reader.read_path(path)?;
        let mut report = self.reduce_run(run)?;
        report.source = Some(path.to_path_buf());
        Ok(report)
    }

    /// Read and reduce a raw record from any reader.
    pub fn reduce_reader<R: Read>(&self, reader: R) -> Result<RunReport, PipelineError> {
        let run = self.reader.read_from(reader)?;
        self.reduce_run(run)
    }

    /// Reduce an already ingested run.
    pub fn reduce_run(&self, run: RawRun) -> Result<RunReport, PipelineError> {
        let raw_lines = run.len();

        let series = resample_run(run, self.config.voltage_scale)?;
        let corrected = correct_series(&series, &self.config.thermocouple)?;
        let segments = extract_segments(&series.markers, &series.avg_temp)?;
        let fits = fit_segments(&segments, &series, &corrected, self.config.fit_alignment)?;
        let tables = aggregate(&series, &corrected, &fits)?;

        info!(
            "Reduced {} raw lines to {} points and {} segments",
            raw_lines,
            series.len(),
            fits.len()
        );

        Ok(RunReport {
            source: None,
            raw_lines,
            series,
            fits,
            tables,
        })
    }

    /// Write the tables and manifest of `report` into `dir` as `<stem>_*`.
    pub fn write_outputs(
        &self,
        report: &RunReport,
        dir: &Path,
        stem: &str,
    ) -> Result<RunOutputs, PipelineError> {
        Ok(write_run_outputs(report, &self.config, dir, stem)?)
    }
}
