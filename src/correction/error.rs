/// Errors raised by the thermocouple correction
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    /// Temperature outside the calibrated polynomial domain
    #[error("Temperature {temperature_k:.3} K is outside the {table} calibration range [{lower_k}, {upper_k}) K")]
    OutOfRange {
        /// Calibration table that rejected the temperature
        table: &'static str,
        /// Offending absolute temperature
        temperature_k: f64,
        /// Inclusive lower bound of the table
        lower_k: f64,
        /// Exclusive upper bound of the table
        upper_k: f64,
    },

    /// Correction failed at a specific resampled point
    #[error("Correction of {side} voltage at point {index} failed: {source}")]
    AtPoint {
        /// Index into the resampled series
        index: usize,
        /// Voltage side being corrected
        side: super::Side,
        /// Underlying failure
        #[source]
        source: Box<CorrectionError>,
    },
}
