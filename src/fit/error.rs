use crate::correction::Side;

/// Reason a least-squares fit has no meaningful solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// All voltages are equal, so r² is 0/0
    ConstantVoltage,
    /// All temperature differences are equal, so the slope is undefined
    ConstantTemperatureDifference,
    /// Fewer than two points
    TooFewPoints,
}

impl std::fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateReason::ConstantVoltage => write!(f, "voltage has zero variance"),
            DegenerateReason::ConstantTemperatureDifference => {
                write!(f, "temperature difference has zero variance")
            }
            DegenerateReason::TooFewPoints => write!(f, "fewer than two points"),
        }
    }
}

/// Errors raised while fitting segments
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// The fit target or predictor is degenerate
    #[error("Degenerate fit: {0}")]
    DegenerateFit(DegenerateReason),

    /// Predictor and target have different lengths
    #[error("Fit input length mismatch: {x} predictor values, {y} target values")]
    LengthMismatch {
        /// Predictor length
        x: usize,
        /// Target length
        y: usize,
    },

    /// The lagged voltage window falls outside the series
    #[error("Segment [{start}, {stop}] with voltage lag {lag} is outside a series of {len} points")]
    WindowOutOfBounds {
        /// Segment start
        start: usize,
        /// Segment stop
        stop: usize,
        /// Voltage lag in samples
        lag: usize,
        /// Series length
        len: usize,
    },

    /// Fit of one side of a segment failed
    #[error("Fit of {side} side for segment [{start}, {stop}] failed: {source}")]
    InSegment {
        /// Segment start
        start: usize,
        /// Segment stop
        stop: usize,
        /// Voltage side
        side: Side,
        /// Underlying failure
        #[source]
        source: Box<FitError>,
    },
}
