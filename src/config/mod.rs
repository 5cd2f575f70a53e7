//! # Pipeline Configuration
//!
//! A single [`PipelineConfig`] drives the reduction of every program variant:
//! the channel layout of the raw record and the thermocouple legs differ
//! between rigs, the algorithms do not.

mod error;
mod layout;
mod variant;

pub use error::ConfigError;
pub use layout::{Channel, ChannelColumns, ChannelLayout};
pub use variant::Variant;

use serde::{Deserialize, Serialize};

use crate::correction::ThermocoupleConfig;
use crate::fit::FitAlignment;

/// Header/metadata lines the acquisition program writes before the data.
pub const DEFAULT_HEADER_LINES: usize = 5;

/// Recorded voltages are in volts, the correction works in microvolts.
pub const DEFAULT_VOLTAGE_SCALE: f64 = 1e6;

/// Decimal places used when writing result tables.
pub const DEFAULT_DECIMALS: usize = 6;

/// Complete configuration of one reduction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Program variant the layout was taken from
    pub variant: Variant,
    /// Positions of the channels in a raw line
    pub layout: ChannelLayout,
    /// Thermocouple type and leg assignment
    pub thermocouple: ThermocoupleConfig,
    /// Number of leading lines to skip
    pub header_lines: usize,
    /// Factor converting recorded voltages to microvolts
    pub voltage_scale: f64,
    /// Index alignment between temperature difference and voltage in fits
    pub fit_alignment: FitAlignment,
    /// Decimal places in written tables
    pub decimals: usize,
}

impl PipelineConfig {
    /// Default configuration for a program variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            layout: variant.layout(),
            thermocouple: ThermocoupleConfig::default(),
            header_lines: DEFAULT_HEADER_LINES,
            voltage_scale: DEFAULT_VOLTAGE_SCALE,
            fit_alignment: FitAlignment::default(),
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Validate layout, thermocouple and numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.thermocouple.validate()?;

        if !self.voltage_scale.is_finite() || self.voltage_scale == 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "voltage_scale",
                reason: format!("must be finite and non-zero, got {}", self.voltage_scale),
            });
        }

        if self.decimals > 15 {
            return Err(ConfigError::InvalidSetting {
                name: "decimals",
                reason: format!("at most 15 decimal places are meaningful, got {}", self.decimals),
            });
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}
