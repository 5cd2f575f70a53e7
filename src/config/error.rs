/// Errors raised while validating a pipeline configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Channel layout references columns that cannot exist
    #[error("Invalid channel layout: {0}")]
    InvalidLayout(String),

    /// Thermocouple leg assignment is inconsistent
    #[error("Invalid thermocouple configuration: {0}")]
    InvalidThermocouple(String),

    /// A numeric setting is outside its allowed range
    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSetting {
        /// Name of the setting
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
