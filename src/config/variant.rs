//! Rig program variants.
//!
//! The high-temperature, room-temperature and continuous-profile programs all
//! record the same kind of run; they differ only in how many fields a line
//! carries and where each channel sits. A variant picks the matching
//! [`ChannelLayout`] preset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::layout::{ChannelColumns, ChannelLayout};

/// Acquisition program that produced a raw record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Furnace runs up to ~1300 °C.
    ///
    /// - 17 fields: eight time/value pairs followed by the state marker
    #[default]
    HighTemperature,

    /// Cryostat/stage runs around room temperature.
    ///
    /// - 16 fields: the second high-voltage reading shares the timestamp of
    ///   the second low-voltage reading, then the state marker
    RoomTemperature,

    /// Continuous temperature-profile runs.
    ///
    /// - 17 fields, same order as [`Variant::HighTemperature`]
    Continuous,
}

impl Variant {
    /// Returns the channel layout preset for this variant.
    pub fn layout(&self) -> ChannelLayout {
        match self {
            Variant::HighTemperature | Variant::Continuous => eight_pair_layout(),
            Variant::RoomTemperature => ChannelLayout {
                field_count: 16,
                marker: Some(15),
                high_voltage2: Some(ChannelColumns::new(12, 14)),
                ..eight_pair_layout()
            },
        }
    }

    /// Returns all available variant names.
    pub fn variants() -> &'static [&'static str] {
        &["high-temperature", "room-temperature", "continuous"]
    }
}

fn eight_pair_layout() -> ChannelLayout {
    ChannelLayout {
        field_count: 17,
        marker: Some(16),
        temp_a: ChannelColumns::new(0, 1),
        temp_b: ChannelColumns::new(2, 3),
        temp_a2: Some(ChannelColumns::new(4, 5)),
        temp_b2: Some(ChannelColumns::new(6, 7)),
        low_voltage: ChannelColumns::new(8, 9),
        high_voltage: ChannelColumns::new(10, 11),
        low_voltage2: Some(ChannelColumns::new(12, 13)),
        high_voltage2: Some(ChannelColumns::new(14, 15)),
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::HighTemperature => write!(f, "high-temperature"),
            Variant::RoomTemperature => write!(f, "room-temperature"),
            Variant::Continuous => write!(f, "continuous"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high-temperature" | "high" | "ht" => Ok(Variant::HighTemperature),
            "room-temperature" | "room" | "rt" => Ok(Variant::RoomTemperature),
            "continuous" | "continuous-profile" => Ok(Variant::Continuous),
            _ => Err(format!(
                "Unknown variant '{}'. Valid options: {}",
                s,
                Variant::variants().join(", ")
            )),
        }
    }
}
