//! Batch reduction of independent runs.
//!
//! A failing run is recorded and logged; it never stops the others. With the
//! `parallel` feature runs are reduced concurrently, one run per task.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "colorized_output")]
use console::style;
use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{PipelineError, Reducer, RunOutputs, Stage};

/// A run that was reduced and written.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Raw record
    pub input: PathBuf,
    /// Files written
    pub outputs: RunOutputs,
    /// Number of fitted segments
    pub segments: usize,
}

/// A run that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    /// Raw record
    pub input: PathBuf,
    /// Stage that failed
    pub stage: Stage,
    /// Error message
    pub message: String,
}

/// Result of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Runs reduced successfully, in input order
    pub succeeded: Vec<RunOutcome>,
    /// Runs that failed, in input order
    pub failed: Vec<RunFailure>,
}

impl BatchSummary {
    /// Returns true if at least one run failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Total number of runs
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            for run in &self.succeeded {
                output.push_str(&format!(
                    "[{}] {} ({} segments)\n",
                    OK,
                    style(run.input.display()).green(),
                    run.segments
                ));
            }
            for failure in &self.failed {
                output.push_str(&format!(
                    "[{}] {} - {} {}: {}\n",
                    FAIL,
                    style(failure.input.display()).red(),
                    style("FAILED").red().bold(),
                    failure.stage,
                    failure.message
                ));
            }
            output.push('\n');
            output.push_str(&format!(
                "{}: {} reduced, {} failed\n",
                style("Summary").bold(),
                style(self.succeeded.len()).green(),
                style(self.failed.len()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.succeeded {
            writeln!(f, "[✓] {} ({} segments)", run.input.display(), run.segments)?;
        }
        for failure in &self.failed {
            writeln!(
                f,
                "[✗] {} - FAILED {}: {}",
                failure.input.display(),
                failure.stage,
                failure.message
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} reduced, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}

fn output_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "run".to_string())
}

/// Assign every input a distinct output stem.
///
/// Inputs whose file stem is unique in the batch keep it. Inputs sharing a
/// stem are prefixed with their parent directory name, and numbered when
/// that still collides.
fn output_stems(inputs: &[PathBuf]) -> Vec<String> {
    let stems: Vec<String> = inputs.iter().map(|p| output_stem(p)).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let mut taken: HashSet<String> = stems
        .iter()
        .filter(|stem| counts[stem.as_str()] == 1)
        .cloned()
        .collect();

    inputs
        .iter()
        .zip(&stems)
        .map(|(input, stem)| {
            if counts[stem.as_str()] == 1 {
                return stem.clone();
            }

            let parent = input
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned());
            let base = match parent {
                Some(parent) => format!("{parent}_{stem}"),
                None => stem.clone(),
            };

            let mut candidate = base.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            if candidate != *stem {
                debug!(
                    "{} shares its name with another input, writing as {}",
                    input.display(),
                    candidate
                );
            }
            candidate
        })
        .collect()
}

fn process_one(
    reducer: &Reducer,
    input: &Path,
    stem: &str,
    out_dir: &Path,
) -> Result<RunOutcome, RunFailure> {
    let run = || -> Result<RunOutcome, PipelineError> {
        let report = reducer.reduce_file(input)?;
        let outputs = reducer.write_outputs(&report, out_dir, stem)?;
        Ok(RunOutcome {
            input: input.to_path_buf(),
            outputs,
            segments: report.segment_count(),
        })
    };

    run().map_err(|e| {
        warn!("{} failed at {} stage: {}", input.display(), e.stage(), e);
        RunFailure {
            input: input.to_path_buf(),
            stage: e.stage(),
            message: e.to_string(),
        }
    })
}

/// Reduce every input into `out_dir`.
///
/// Inputs with the same file name get distinct output stems, so no run
/// overwrites another run's files.
pub fn process_batch(reducer: &Reducer, inputs: &[PathBuf], out_dir: &Path) -> BatchSummary {
    let stems = output_stems(inputs);

    #[cfg(feature = "parallel")]
    let results: Vec<Result<RunOutcome, RunFailure>> = inputs
        .par_iter()
        .zip(stems.par_iter())
        .map(|(input, stem)| process_one(reducer, input, stem, out_dir))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<RunOutcome, RunFailure>> = inputs
        .iter()
        .zip(&stems)
        .map(|(input, stem)| process_one(reducer, input, stem, out_dir))
        .collect();

    let mut summary = BatchSummary::default();
    for result in results {
        match result {
            Ok(outcome) => summary.succeeded.push(outcome),
            Err(failure) => summary.failed.push(failure),
        }
    }

    info!(
        "Batch finished: {} of {} runs reduced",
        summary.succeeded.len(),
        summary.total()
    );
    summary
}
