/// Errors raised while extracting measurement segments
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// A `Stop Oscillation` marker with no open segment
    #[error("Unmatched segment marker: 'Stop Oscillation' at index {index} with no open segment")]
    UnmatchedStop {
        /// Index of the stray stop marker
        index: usize,
    },

    /// The marker stream produced no usable segment
    #[error("Unmatched segment marker: no oscillation segment found in {markers} markers")]
    NoSegments {
        /// Number of markers scanned
        markers: usize,
    },

    /// Markers and temperatures do not describe the same points
    #[error("Channel length mismatch: {markers} markers but {temperatures} temperatures")]
    ChannelLengthMismatch {
        /// Marker count
        markers: usize,
        /// Temperature count
        temperatures: usize,
    },
}

/// Error returned when parsing an unknown marker string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state marker {0:?}, expected one of 'Start Oscillation', 'Stop Oscillation', 'Left Equilibrium' or blank")]
pub struct ParseMarkerError(pub String);
