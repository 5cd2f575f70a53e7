//! # Segment Extraction
//!
//! The rig logs a state marker whenever it starts or stops cycling the heater
//! gradient. A measurement segment is the inclusive index range between a
//! `Start Oscillation` and the marker that ends it:
//!
//! - `Start` with nothing open opens a segment.
//! - `Start` while a segment is open force-closes it at the current index and
//!   reopens there. The two pieces share that index and are merged again by
//!   the overlap pass, so a repeated `Start` extends the running segment.
//! - `Stop` closes the open segment; a `Stop` with nothing open is an error.
//! - `Left Equilibrium` and blank markers are ignored.
//! - A segment still open at the end is closed at the last index.
//!
//! Segments covering a single index are dropped.

mod error;


pub use error::{ParseMarkerError, SegmentError};

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Rig state logged on a raw line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateMarker {
    /// Heater gradient cycling started
    StartOscillation,
    /// Heater gradient cycling stopped
    StopOscillation,
    /// Sample left thermal equilibrium
    LeftEquilibrium,
    /// No state change
    #[default]
    Blank,
}

impl StateMarker {
    /// Text written by the acquisition program
    pub fn as_str(&self) -> &'static str {
        match self {
            StateMarker::StartOscillation => "Start Oscillation",
            StateMarker::StopOscillation => "Stop Oscillation",
            StateMarker::LeftEquilibrium => "Left Equilibrium",
            StateMarker::Blank => "",
        }
    }
}

impl fmt::Display for StateMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateMarker {
    type Err = ParseMarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Start Oscillation" => Ok(StateMarker::StartOscillation),
            "Stop Oscillation" => Ok(StateMarker::StopOscillation),
            "Left Equilibrium" => Ok(StateMarker::LeftEquilibrium),
            "" => Ok(StateMarker::Blank),
            other => Err(ParseMarkerError(other.to_string())),
        }
    }
}

/// Inclusive `[start, stop]` index range of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First index
    pub start: usize,
    /// Last index
    pub stop: usize,
    /// Mean average temperature over the segment (°C)
    pub temperature: f64,
}

impl Segment {
    /// Number of points covered
    pub fn point_count(&self) -> usize {
        self.stop - self.start + 1
    }
}

/// Scan markers into ordered `(start, stop)` pairs before overlap resolution.
fn scan_markers(markers: &[StateMarker]) -> Result<Vec<(usize, usize)>, SegmentError> {
    let mut candidates = Vec::new();
    let mut open: Option<usize> = None;

    for (index, marker) in markers.iter().enumerate() {
        match marker {
            StateMarker::StartOscillation => {
                if let Some(start) = open.take() {
                    debug!("Start at {index} while segment from {start} is open, force-closing");
                    candidates.push((start, index));
                }
                open = Some(index);
            }
            StateMarker::StopOscillation => match open.take() {
                Some(start) => candidates.push((start, index)),
                None => return Err(SegmentError::UnmatchedStop { index }),
            },
            StateMarker::LeftEquilibrium | StateMarker::Blank => {}
        }
    }

    if let Some(start) = open {
        let last = markers.len() - 1;
        debug!("Segment from {start} still open at end of run, closing at {last}");
        candidates.push((start, last));
    }

    Ok(candidates)
}

/// Merge candidates sharing an index and drop single-point ones.
fn resolve_overlaps(candidates: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(candidates.len());
    for (start, stop) in candidates {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(stop),
            _ => merged.push((start, stop)),
        }
    }

    merged.retain(|&(start, stop)| {
        if start < stop {
            true
        } else {
            warn!("Dropping single-point segment at index {start}");
            false
        }
    });
    merged
}

/// Extract measurement segments from the marker stream.
///
/// `avg_temp` supplies the representative temperature of each segment and
/// must be as long as `markers`.
pub fn extract_segments(
    markers: &[StateMarker],
    avg_temp: &[f64],
) -> Result<Vec<Segment>, SegmentError> {
    if markers.len() != avg_temp.len() {
        return Err(SegmentError::ChannelLengthMismatch {
            markers: markers.len(),
            temperatures: avg_temp.len(),
        });
    }

    let ranges = resolve_overlaps(scan_markers(markers)?);
    if ranges.is_empty() {
        return Err(SegmentError::NoSegments {
            markers: markers.len(),
        });
    }

    let segments: Vec<Segment> = ranges
        .into_iter()
        .map(|(start, stop)| {
            let window = &avg_temp[start..=stop];
            Segment {
                start,
                stop,
                temperature: window.iter().sum::<f64>() / window.len() as f64,
            }
        })
        .collect();

    debug!("Extracted {} segments from {} markers", segments.len(), markers.len());
    Ok(segments)
}
