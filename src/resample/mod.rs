//! # Channel Resampling
//!
//! Every channel on a raw line is sampled at its own instant, so no two
//! channels share a clock. Resampling puts them on one:
//!
//! 1. The time base has one point per interval between consecutive raw
//!    lines, at the midpoint between the latest timestamp of line `i` and the
//!    earliest timestamp of line `i + 1`. `N` lines give `N - 1` points.
//! 2. Each channel is linearly interpolated at point `i` from its own samples
//!    `i` and `i + 1`.
//! 3. Redundant readings of the same quantity are resampled independently and
//!    then averaged pointwise.

mod error;

pub use error::ResampleError;

use log::debug;

use crate::config::Channel;
use crate::correction::Side;
use crate::ingest::{LineBounds, RawChannelSample, RawRun};
use crate::segment::StateMarker;

/// Shared, strictly increasing time base of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBase {
    times: Vec<f64>,
}

impl TimeBase {
    /// Build the time base from per-line `[start, end]` bounds.
    pub fn from_bounds(bounds: &[LineBounds]) -> Result<Self, ResampleError> {
        if bounds.len() < 2 {
            return Err(ResampleError::TooShort {
                lines: bounds.len(),
            });
        }

        let times: Vec<f64> = bounds
            .windows(2)
            .map(|w| (w[0].end + w[1].start) / 2.0)
            .collect();

        for (index, pair) in times.windows(2).enumerate() {
            // Also rejects NaN
            if !(pair[1] > pair[0]) {
                return Err(ResampleError::NonMonotonicTimeBase {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        Ok(Self { times })
    }

    /// Time base values in seconds
    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the time base has no points
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Consume into the underlying vector
    pub fn into_vec(self) -> Vec<f64> {
        self.times
    }
}

/// Interpolate one channel onto `grid`.
///
/// `grid[i]` is evaluated on the segment between `samples[i]` and
/// `samples[i + 1]`, so `grid` must have exactly `samples.len() - 1` points.
pub fn resample(
    channel: Channel,
    samples: &[RawChannelSample],
    grid: &[f64],
) -> Result<Vec<f64>, ResampleError> {
    let expected = samples.len().saturating_sub(1);
    if grid.len() != expected {
        return Err(ResampleError::ChannelLengthMismatch {
            what: format!("{channel} time base"),
            expected,
            actual: grid.len(),
        });
    }

    samples
        .windows(2)
        .zip(grid)
        .enumerate()
        .map(|(index, (pair, &t))| {
            let (s0, s1) = (pair[0], pair[1]);
            let span = s1.timestamp - s0.timestamp;
            if span == 0.0 {
                return Err(ResampleError::Interpolation {
                    channel,
                    index,
                    timestamp: s0.timestamp,
                });
            }
            Ok(s0.value + (s1.value - s0.value) * (t - s0.timestamp) / span)
        })
        .collect()
}

/// Pointwise mean of a primary and an optional redundant series.
pub fn average_pair(
    what: &str,
    primary: Vec<f64>,
    redundant: Option<Vec<f64>>,
) -> Result<Vec<f64>, ResampleError> {
    let Some(redundant) = redundant else {
        return Ok(primary);
    };

    if redundant.len() != primary.len() {
        return Err(ResampleError::ChannelLengthMismatch {
            what: what.to_string(),
            expected: primary.len(),
            actual: redundant.len(),
        });
    }

    Ok(primary
        .iter()
        .zip(&redundant)
        .map(|(a, b)| (a + b) / 2.0)
        .collect())
}

/// One resampled point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampledPoint {
    /// Shared time (s)
    pub t: f64,
    /// Mean of hot and cold side temperatures (°C)
    pub avg_t: f64,
    /// Hot minus cold side temperature (K)
    pub d_t: f64,
    /// Low-side voltage (µV, uncorrected)
    pub v_low: f64,
    /// High-side voltage (µV, uncorrected)
    pub v_high: f64,
}

/// A run on the shared time base, stored column-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResampledSeries {
    /// Shared time (s)
    pub time: Vec<f64>,
    /// Mean of hot and cold side temperatures (°C)
    pub avg_temp: Vec<f64>,
    /// Hot minus cold side temperature (K)
    pub delta_t: Vec<f64>,
    /// Low-side voltage (µV, uncorrected)
    pub v_low: Vec<f64>,
    /// High-side voltage (µV, uncorrected)
    pub v_high: Vec<f64>,
    /// State marker of the raw line opening each interval
    pub markers: Vec<StateMarker>,
}

impl ResampledSeries {
    /// Number of points
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the series has no points
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Uncorrected voltage of one side
    pub fn voltage(&self, side: Side) -> &[f64] {
        match side {
            Side::Low => &self.v_low,
            Side::High => &self.v_high,
        }
    }

    /// Point at `index`
    pub fn point(&self, index: usize) -> Option<ResampledPoint> {
        Some(ResampledPoint {
            t: *self.time.get(index)?,
            avg_t: *self.avg_temp.get(index)?,
            d_t: *self.delta_t.get(index)?,
            v_low: *self.v_low.get(index)?,
            v_high: *self.v_high.get(index)?,
        })
    }

    /// Iterate over all points
    pub fn points(&self) -> impl Iterator<Item = ResampledPoint> + '_ {
        (0..self.len()).filter_map(move |i| self.point(i))
    }
}

/// Resample a whole run, consuming the raw record.
///
/// Voltages are multiplied by `voltage_scale` (volts to microvolts for the
/// standard rig).
pub fn resample_run(run: RawRun, voltage_scale: f64) -> Result<ResampledSeries, ResampleError> {
    let lines = run.len();
    let grid = TimeBase::from_bounds(&run.bounds)?;

    let resampled = |channel: Channel| -> Result<Option<Vec<f64>>, ResampleError> {
        match run.channel(channel) {
            Some(samples) => {
                if samples.len() != lines {
                    return Err(ResampleError::ChannelLengthMismatch {
                        what: channel.to_string(),
                        expected: lines,
                        actual: samples.len(),
                    });
                }
                resample(channel, samples, grid.as_slice()).map(Some)
            }
            None => Ok(None),
        }
    };
    let required = |c: Channel| -> Result<Vec<f64>, ResampleError> {
        resampled(c)?.ok_or(ResampleError::MissingChannel(c))
    };

    let temp_a = average_pair(
        "temp_a/temp_a2",
        required(Channel::TempA)?,
        resampled(Channel::TempA2)?,
    )?;
    let temp_b = average_pair(
        "temp_b/temp_b2",
        required(Channel::TempB)?,
        resampled(Channel::TempB2)?,
    )?;
    let v_low = average_pair(
        "low_voltage/low_voltage2",
        required(Channel::LowVoltage)?,
        resampled(Channel::LowVoltage2)?,
    )?;
    let v_high = average_pair(
        "high_voltage/high_voltage2",
        required(Channel::HighVoltage)?,
        resampled(Channel::HighVoltage2)?,
    )?;

    let n = grid.len();
    for (what, len) in [
        ("temp_b", temp_b.len()),
        ("low_voltage", v_low.len()),
        ("high_voltage", v_high.len()),
    ] {
        if len != temp_a.len() {
            return Err(ResampleError::ChannelLengthMismatch {
                what: what.to_string(),
                expected: temp_a.len(),
                actual: len,
            });
        }
    }

    let mut markers = run.markers;
    if markers.len() != lines {
        return Err(ResampleError::ChannelLengthMismatch {
            what: "markers".to_string(),
            expected: lines,
            actual: markers.len(),
        });
    }
    markers.truncate(n);

    let avg_temp = temp_a.iter().zip(&temp_b).map(|(a, b)| (a + b) / 2.0).collect();
    let delta_t = temp_a.iter().zip(&temp_b).map(|(a, b)| a - b).collect();

    debug!("Resampled {} raw lines onto {} points", lines, n);

    Ok(ResampledSeries {
        time: grid.into_vec(),
        avg_temp,
        delta_t,
        v_low: v_low.into_iter().map(|v| v * voltage_scale).collect(),
        v_high: v_high.into_iter().map(|v| v * voltage_scale).collect(),
        markers,
    })
}

#[cfg(test)]
mod tests;
