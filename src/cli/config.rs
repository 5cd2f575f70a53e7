//! TOML configuration file support.
//!
//! Settings that rarely change between runs of the same rig can live in a
//! config file instead of on the command line:
//!
//! ```toml
//! # seebeck.toml
//! [reduction]
//! variant = "room-temperature"
//! header_lines = 5
//! voltage_scale = 1e6
//! fit_alignment = "aligned"
//! decimals = 6
//!
//! [thermocouple]
//! kind = "type-k"
//! low_leg = "chromel"
//! high_leg = "alumel"
//!
//! # Optional, replaces the column layout of the variant
//! [layout]
//! field_count = 16
//! marker = 15
//! temp_a = [0, 1]
//! temp_b = [2, 3]
//! low_voltage = [8, 9]
//! high_voltage = [10, 11]
//! ```
//!
//! Command-line flags take precedence over the file, which takes precedence
//! over the variant preset.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use seebeck_reduce::config::{ChannelLayout, PipelineConfig, Variant};
use seebeck_reduce::correction::{Leg, ThermocoupleType};
use seebeck_reduce::fit::FitAlignment;

/// Root configuration structure for seebeck.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Reduction settings.
    #[serde(default)]
    pub reduction: ReductionConfig,

    /// Thermocouple leg assignment.
    #[serde(default)]
    pub thermocouple: ThermocoupleSection,

    /// Column layout replacing the variant preset.
    pub layout: Option<ChannelLayout>,
}

/// Settings of the `[reduction]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReductionConfig {
    /// Program variant that wrote the records.
    pub variant: Option<Variant>,

    /// Header lines to skip.
    pub header_lines: Option<usize>,

    /// Factor converting recorded voltages to microvolts.
    pub voltage_scale: Option<f64>,

    /// Voltage/temperature difference alignment in fits.
    pub fit_alignment: Option<FitAlignment>,

    /// Decimal places in written tables.
    pub decimals: Option<usize>,
}

/// Settings of the `[thermocouple]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThermocoupleSection {
    /// Thermocouple type.
    pub kind: Option<ThermocoupleType>,

    /// Leg on the low voltage channel.
    pub low_leg: Option<Leg>,

    /// Leg on the high voltage channel.
    pub high_leg: Option<Leg>,
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub variant: Option<Variant>,
    pub legacy_lag: bool,
    pub decimals: Option<usize>,
    pub header_lines: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if one was given, otherwise use an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Layer command-line overrides over this file over the variant preset.
    pub fn resolve(self, overrides: &Overrides) -> PipelineConfig {
        let reduction = self.reduction;
        let variant = overrides
            .variant
            .or(reduction.variant)
            .unwrap_or_default();

        let mut config = PipelineConfig::for_variant(variant);
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(kind) = self.thermocouple.kind {
            config.thermocouple.kind = kind;
        }
        if let Some(leg) = self.thermocouple.low_leg {
            config.thermocouple.low_leg = leg;
        }
        if let Some(leg) = self.thermocouple.high_leg {
            config.thermocouple.high_leg = leg;
        }
        if let Some(scale) = reduction.voltage_scale {
            config.voltage_scale = scale;
        }
        if let Some(alignment) = reduction.fit_alignment {
            config.fit_alignment = alignment;
        }
        if overrides.legacy_lag {
            config.fit_alignment = FitAlignment::LegacyLag;
        }
        if let Some(lines) = overrides.header_lines.or(reduction.header_lines) {
            config.header_lines = lines;
        }
        if let Some(decimals) = overrides.decimals.or(reduction.decimals) {
            config.decimals = decimals;
        }
        config
    }
}
