//! # Segment Fitting
//!
//! Within a segment the corrected voltage is linear in the temperature
//! difference; the slope of an ordinary least-squares line is the Seebeck
//! coefficient (µV/K).

mod error;

pub use error::{DegenerateReason, FitError};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::correction::{CorrectedSeries, Side};
use crate::resample::ResampledSeries;
use crate::segment::Segment;

/// Relative variance below which a series counts as constant.
///
/// Summing identical values can leave rounding residue in the mean, so an
/// exact `== 0.0` test would miss constant inputs such as `[0.1; 3]`.
const DEGENERATE_RELATIVE_VARIANCE: f64 = 1e-20;

/// Index alignment of voltage against temperature difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitAlignment {
    /// Voltage index `i` is paired with temperature difference index `i`
    #[default]
    Aligned,
    /// Voltage index `i - 1` is paired with temperature difference index `i`,
    /// reproducing results produced by the historic rig software
    LegacyLag,
}

impl FitAlignment {
    /// Backward voltage offset in samples
    pub fn lag(&self) -> usize {
        match self {
            FitAlignment::Aligned => 0,
            FitAlignment::LegacyLag => 1,
        }
    }
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope
    pub slope: f64,
    /// Intercept
    pub intercept: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

/// Fit result of one side of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Representative temperature of the segment (°C)
    pub temperature: f64,
    /// Seebeck coefficient (µV/K)
    pub slope: f64,
    /// Intercept (µV)
    pub intercept: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

/// Both sides of a fitted segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFit {
    /// The segment that was fitted
    pub segment: Segment,
    /// Low-side result
    pub low: FitResult,
    /// High-side result
    pub high: FitResult,
}

impl SegmentFit {
    /// Result of one side
    pub fn side(&self, side: Side) -> &FitResult {
        match side {
            Side::Low => &self.low,
            Side::High => &self.high,
        }
    }
}

fn is_constant(sum_sq_dev: f64, sum_sq: f64) -> bool {
    sum_sq_dev <= DEGENERATE_RELATIVE_VARIANCE * sum_sq
}

/// Ordinary least-squares fit of degree one.
pub fn fit_linear(x: &[f64], y: &[f64]) -> Result<LinearFit, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(FitError::DegenerateFit(DegenerateReason::TooFewPoints));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut ss_tot = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        ss_tot += dy * dy;
    }

    if is_constant(ss_tot, y.iter().map(|v| v * v).sum()) {
        return Err(FitError::DegenerateFit(DegenerateReason::ConstantVoltage));
    }
    if is_constant(sxx, x.iter().map(|v| v * v).sum()) {
        return Err(FitError::DegenerateFit(
            DegenerateReason::ConstantTemperatureDifference,
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = yi - (slope * xi + intercept);
            r * r
        })
        .sum();

    Ok(LinearFit {
        slope,
        intercept,
        r_squared: 1.0 - ss_res / ss_tot,
    })
}

/// Fit one segment of `voltage` against `delta_t`.
///
/// The temperature difference window is `[start, stop]`; the voltage window
/// is shifted back by `alignment.lag()` samples.
pub fn fit_segment(
    segment: &Segment,
    delta_t: &[f64],
    voltage: &[f64],
    alignment: FitAlignment,
) -> Result<FitResult, FitError> {
    let lag = alignment.lag();
    let len = delta_t.len().min(voltage.len());
    if segment.start < lag || segment.stop >= len || segment.start > segment.stop {
        return Err(FitError::WindowOutOfBounds {
            start: segment.start,
            stop: segment.stop,
            lag,
            len,
        });
    }

    let x = &delta_t[segment.start..=segment.stop];
    let y = &voltage[segment.start - lag..=segment.stop - lag];
    let line = fit_linear(x, y)?;

    Ok(FitResult {
        temperature: segment.temperature,
        slope: line.slope,
        intercept: line.intercept,
        r_squared: line.r_squared,
    })
}

/// Fit both voltage sides of every segment.
pub fn fit_segments(
    segments: &[Segment],
    series: &ResampledSeries,
    corrected: &CorrectedSeries,
    alignment: FitAlignment,
) -> Result<Vec<SegmentFit>, FitError> {
    segments
        .iter()
        .map(|segment| {
            let fit_side = |side: Side| {
                fit_segment(segment, &series.delta_t, corrected.side(side), alignment).map_err(
                    |e| FitError::InSegment {
                        start: segment.start,
                        stop: segment.stop,
                        side,
                        source: Box::new(e),
                    },
                )
            };
            let fit = SegmentFit {
                segment: *segment,
                low: fit_side(Side::Low)?,
                high: fit_side(Side::High)?,
            };
            debug!(
                "Segment [{}, {}] at {:.2} °C: S_low={:.4} (r²={:.4}), S_high={:.4} (r²={:.4})",
                segment.start,
                segment.stop,
                segment.temperature,
                fit.low.slope,
                fit.low.r_squared,
                fit.high.slope,
                fit.high.r_squared
            );
            Ok(fit)
        })
        .collect()
}
