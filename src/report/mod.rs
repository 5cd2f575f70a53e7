//! # Result Tables
//!
//! A reduced run produces two tables:
//!
//! - the **series** table, one row per resampled point with the corrected
//!   voltages and the state marker of the line opening the interval
//! - the **summary** table, one row per segment with the low- and high-side
//!   fit results side by side
//!
//! Numbers are written with a fixed number of decimals.

mod error;

pub use error::ReportError;

use std::io::Write;

use crate::correction::CorrectedSeries;
use crate::fit::{FitResult, SegmentFit};
use crate::resample::ResampledSeries;
use crate::segment::StateMarker;

/// Header of the series table
pub const SERIES_HEADER: [&str; 6] = [
    "time_s",
    "avg_temp_c",
    "delta_t_k",
    "v_low_corrected_uv",
    "v_high_corrected_uv",
    "marker",
];

/// Header of the summary table
pub const SUMMARY_HEADER: [&str; 8] = [
    "temperature_c",
    "slope_low",
    "intercept_low",
    "r2_low",
    "temperature_c",
    "slope_high",
    "intercept_high",
    "r2_high",
];

/// One row of the series table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRow {
    /// Shared time (s)
    pub time: f64,
    /// Average temperature (°C)
    pub avg_temp: f64,
    /// Temperature difference (K)
    pub delta_t: f64,
    /// Corrected low-side voltage (µV)
    pub v_low: f64,
    /// Corrected high-side voltage (µV)
    pub v_high: f64,
    /// State marker
    pub marker: StateMarker,
}

/// One row of the summary table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    /// Low-side fit
    pub low: FitResult,
    /// High-side fit
    pub high: FitResult,
}

impl From<&SegmentFit> for SummaryRow {
    fn from(fit: &SegmentFit) -> Self {
        Self {
            low: fit.low,
            high: fit.high,
        }
    }
}

/// Both result tables of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTables {
    /// Per-point rows
    pub series: Vec<SeriesRow>,
    /// Per-segment rows
    pub summary: Vec<SummaryRow>,
}

/// Assemble the result tables of a run.
pub fn aggregate(
    series: &ResampledSeries,
    corrected: &CorrectedSeries,
    fits: &[SegmentFit],
) -> Result<ReportTables, ReportError> {
    let n = series.len();
    for (what, len) in [
        ("avg_temp", series.avg_temp.len()),
        ("delta_t", series.delta_t.len()),
        ("markers", series.markers.len()),
        ("v_low_corrected", corrected.v_low.len()),
        ("v_high_corrected", corrected.v_high.len()),
    ] {
        if len != n {
            return Err(ReportError::ChannelLengthMismatch {
                what,
                expected: n,
                actual: len,
            });
        }
    }

    let rows = (0..n)
        .map(|i| SeriesRow {
            time: series.time[i],
            avg_temp: series.avg_temp[i],
            delta_t: series.delta_t[i],
            v_low: corrected.v_low[i],
            v_high: corrected.v_high[i],
            marker: series.markers[i],
        })
        .collect();

    Ok(ReportTables {
        series: rows,
        summary: fits.iter().map(SummaryRow::from).collect(),
    })
}

/// Format with a fixed number of decimals, never printing a negative zero.
fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.starts_with('-') && text[1..].bytes().all(|b| b == b'0' || b == b'.') {
        text[1..].to_string()
    } else {
        text
    }
}

impl ReportTables {
    /// Write the series table as CSV.
    pub fn write_series<W: Write>(&self, writer: W, decimals: usize) -> Result<(), ReportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(SERIES_HEADER)?;
        for row in &self.series {
            csv_writer.write_record([
                fixed(row.time, decimals),
                fixed(row.avg_temp, decimals),
                fixed(row.delta_t, decimals),
                fixed(row.v_low, decimals),
                fixed(row.v_high, decimals),
                row.marker.to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the summary table as CSV.
    pub fn write_summary<W: Write>(&self, writer: W, decimals: usize) -> Result<(), ReportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(SUMMARY_HEADER)?;
        for row in &self.summary {
            let mut record = Vec::with_capacity(SUMMARY_HEADER.len());
            for side in [&row.low, &row.high] {
                record.push(fixed(side.temperature, decimals));
                record.push(fixed(side.slope, decimals));
                record.push(fixed(side.intercept, decimals));
                record.push(fixed(side.r_squared, decimals));
            }
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
