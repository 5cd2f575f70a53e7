use crate::config::Channel;

/// Errors raised while resampling channels onto the shared time base
#[derive(Debug, thiserror::Error)]
pub enum ResampleError {
    /// Two consecutive samples of a channel share a timestamp
    #[error("Interpolation error on {channel}: sample {index} and its successor share t={timestamp}")]
    Interpolation {
        /// Channel being interpolated
        channel: Channel,
        /// Index of the first sample of the degenerate pair
        index: usize,
        /// Shared timestamp
        timestamp: f64,
    },

    /// The line-boundary midpoints do not increase
    #[error("Interpolation error: time base is not increasing at point {index} ({previous} -> {current})")]
    NonMonotonicTimeBase {
        /// Index of the offending point
        index: usize,
        /// Previous time base value
        previous: f64,
        /// Current time base value
        current: f64,
    },

    /// Channels produced series of different lengths
    #[error("Channel length mismatch for {what}: expected {expected}, got {actual}")]
    ChannelLengthMismatch {
        /// Which series disagreed
        what: String,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Fewer than two raw lines, so no interval exists
    #[error("Run too short: {lines} raw line(s), at least 2 are required")]
    TooShort {
        /// Raw lines available
        lines: usize,
    },

    /// The run lacks a channel the layout requires
    #[error("Run has no samples for channel {0}")]
    MissingChannel(Channel),
}
