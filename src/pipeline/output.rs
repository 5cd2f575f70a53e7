//! Output files of a reduced run.
//!
//! Each run produces three files in the output directory:
//!
//! - `<stem>_series.csv`
//! - `<stem>_seebeck.csv`
//! - `<stem>_manifest.json`
//!
//! Every file is first written to a temporary file in the same directory.
//! Nothing is renamed into place until all of them were written. Files left
//! by an earlier reduction are moved aside first and restored if any rename
//! fails, so the directory always holds either the old set or the new one.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tempfile::{NamedTempFile, TempPath};

use super::RunReport;
use crate::config::{PipelineConfig, Variant};
use crate::correction::ThermocoupleConfig;
use crate::fit::FitAlignment;
use crate::report::ReportError;

/// Sidecar describing how a run was reduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Raw record the results were derived from
    pub source: Option<String>,
    /// Program variant
    pub variant: Variant,
    /// Thermocouple leg assignment
    pub thermocouple: ThermocoupleConfig,
    /// Voltage/temperature difference alignment used in fits
    pub fit_alignment: FitAlignment,
    /// Raw data lines read
    pub raw_lines: usize,
    /// Resampled points
    pub points: usize,
    /// Fitted segments
    pub segments: usize,
    /// Name of the series table
    pub series_file: String,
    /// Name of the summary table
    pub summary_file: String,
    /// When the run was reduced
    pub processed_at: DateTime<Utc>,
    /// Version of this crate
    pub version: String,
}

/// Paths of the files written for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    /// Series table
    pub series: PathBuf,
    /// Summary table
    pub summary: PathBuf,
    /// Manifest sidecar
    pub manifest: PathBuf,
}

fn staged<F>(dir: &Path, write: F) -> Result<NamedTempFile, ReportError>
where
    F: FnOnce(&mut BufWriter<&mut fs::File>) -> Result<(), ReportError>,
{
    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(temp)
}

/// A target being replaced, with the earlier file it displaced.
struct Swap<'a> {
    target: &'a Path,
    backup: Option<TempPath>,
    placed: bool,
}

/// Move an existing `target` out of the way so it can be restored later.
fn move_aside(dir: &Path, target: &Path) -> Result<Option<TempPath>, ReportError> {
    if !target.exists() {
        return Ok(None);
    }
    let backup = tempfile::Builder::new()
        .prefix(".replaced")
        .tempfile_in(dir)?
        .into_temp_path();
    fs::rename(target, &backup)?;
    Ok(Some(backup))
}

/// Undo `swaps` in reverse order, removing new files and restoring old ones.
fn roll_back(swaps: Vec<Swap<'_>>) {
    for swap in swaps.into_iter().rev() {
        if swap.placed {
            if let Err(e) = fs::remove_file(swap.target) {
                warn!("Failed to remove {}: {}", swap.target.display(), e);
            }
        }
        if let Some(backup) = swap.backup {
            if let Err(e) = backup.persist(swap.target) {
                warn!("Failed to restore {}: {}", swap.target.display(), e.error);
            }
        }
    }
}

/// Write the result tables and manifest of `report` into `dir`.
pub fn write_run_outputs(
    report: &RunReport,
    config: &PipelineConfig,
    dir: &Path,
    stem: &str,
) -> Result<RunOutputs, ReportError> {
    let outputs = RunOutputs {
        series: dir.join(format!("{stem}_series.csv")),
        summary: dir.join(format!("{stem}_seebeck.csv")),
        manifest: dir.join(format!("{stem}_manifest.json")),
    };

    let file_name = |path: &Path| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let manifest = RunManifest {
        source: report.source.as_ref().map(|p| p.display().to_string()),
        variant: config.variant,
        thermocouple: config.thermocouple,
        fit_alignment: config.fit_alignment,
        raw_lines: report.raw_lines,
        points: report.series.len(),
        segments: report.segment_count(),
        series_file: file_name(&outputs.series),
        summary_file: file_name(&outputs.summary),
        processed_at: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let staged_files = [
        (
            staged(dir, |w| report.tables.write_series(w, config.decimals))?,
            &outputs.series,
        ),
        (
            staged(dir, |w| report.tables.write_summary(w, config.decimals))?,
            &outputs.summary,
        ),
        (
            staged(dir, |w| Ok(serde_json::to_writer_pretty(w, &manifest)?))?,
            &outputs.manifest,
        ),
    ];
    debug!("Staged {} output files in {}", staged_files.len(), dir.display());

    let mut swaps: Vec<Swap<'_>> = Vec::with_capacity(staged_files.len());
    for (temp, target) in staged_files {
        let backup = match move_aside(dir, target) {
            Ok(backup) => backup,
            Err(e) => {
                roll_back(swaps);
                return Err(e);
            }
        };
        let mut swap = Swap {
            target,
            backup,
            placed: false,
        };
        if let Err(e) = temp.persist(target) {
            swaps.push(swap);
            roll_back(swaps);
            return Err(e.error.into());
        }
        swap.placed = true;
        swaps.push(swap);
    }
    // Displaced files are deleted as their backups drop
    drop(swaps);

    info!(
        "Wrote {}, {} and {}",
        outputs.series.display(),
        outputs.summary.display(),
        outputs.manifest.display()
    );
    Ok(outputs)
}
