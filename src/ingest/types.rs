use std::collections::BTreeMap;

use crate::config::Channel;
use crate::segment::StateMarker;

/// One timestamped reading of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawChannelSample {
    /// Acquisition time (s)
    pub timestamp: f64,
    /// Reading in the channel's native unit
    pub value: f64,
}

impl RawChannelSample {
    /// Create a sample
    pub const fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Earliest and latest timestamp found on a raw line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBounds {
    /// Earliest timestamp (s)
    pub start: f64,
    /// Latest timestamp (s)
    pub end: f64,
}

/// A captured run, one sample sequence per channel.
///
/// All sequences, the marker list and the bounds list have one entry per
/// data line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRun {
    /// Samples per channel, in line order
    pub channels: BTreeMap<Channel, Vec<RawChannelSample>>,
    /// State marker of each line
    pub markers: Vec<StateMarker>,
    /// Timestamp bounds of each line
    pub bounds: Vec<LineBounds>,
}

impl RawRun {
    /// Create an empty run
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    ///
    /// Line bounds are derived from the samples' timestamps.
    pub fn push_line(&mut self, samples: &[(Channel, RawChannelSample)], marker: StateMarker) {
        let mut start = f64::INFINITY;
        let mut end = f64::NEG_INFINITY;
        for &(channel, sample) in samples {
            start = start.min(sample.timestamp);
            end = end.max(sample.timestamp);
            self.channels.entry(channel).or_default().push(sample);
        }
        self.markers.push(marker);
        self.bounds.push(LineBounds { start, end });
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true if no line was recorded
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Samples of one channel
    pub fn channel(&self, channel: Channel) -> Option<&[RawChannelSample]> {
        self.channels.get(&channel).map(Vec::as_slice)
    }
}
