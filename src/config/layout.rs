use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Logical channel recorded on every raw line.
///
/// Each physical quantity is logged twice per line (primary and redundant
/// reading), each reading with its own timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// Hot-side junction temperature (°C)
    TempA,
    /// Redundant hot-side reading
    TempA2,
    /// Cold-side junction temperature (°C)
    TempB,
    /// Redundant cold-side reading
    TempB2,
    /// Voltage across the low-side thermocouple leg (V)
    LowVoltage,
    /// Redundant low-side voltage reading
    LowVoltage2,
    /// Voltage across the high-side thermocouple leg (V)
    HighVoltage,
    /// Redundant high-side voltage reading
    HighVoltage2,
}

impl Channel {
    /// All channels in line order.
    pub const ALL: [Channel; 8] = [
        Channel::TempA,
        Channel::TempA2,
        Channel::TempB,
        Channel::TempB2,
        Channel::LowVoltage,
        Channel::LowVoltage2,
        Channel::HighVoltage,
        Channel::HighVoltage2,
    ];

    /// Returns the short column-style name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::TempA => "temp_a",
            Channel::TempA2 => "temp_a2",
            Channel::TempB => "temp_b",
            Channel::TempB2 => "temp_b2",
            Channel::LowVoltage => "low_voltage",
            Channel::LowVoltage2 => "low_voltage2",
            Channel::HighVoltage => "high_voltage",
            Channel::HighVoltage2 => "high_voltage2",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column positions of one channel: `[time, value]` in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct ChannelColumns {
    /// Column holding the sample timestamp (seconds)
    pub time: usize,
    /// Column holding the sample value
    pub value: usize,
}

impl ChannelColumns {
    /// Create a column pair
    pub const fn new(time: usize, value: usize) -> Self {
        Self { time, value }
    }
}

impl From<[usize; 2]> for ChannelColumns {
    fn from([time, value]: [usize; 2]) -> Self {
        Self { time, value }
    }
}

impl From<ChannelColumns> for [usize; 2] {
    fn from(columns: ChannelColumns) -> Self {
        [columns.time, columns.value]
    }
}

/// Positional layout of a raw data line.
///
/// Column indices are zero-based. Redundant channels are optional; when one is
/// absent the primary reading is used on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLayout {
    /// Number of comma-separated fields on a data line
    pub field_count: usize,
    /// Column of the state marker, if the program logs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<usize>,
    /// Hot-side temperature
    pub temp_a: ChannelColumns,
    /// Redundant hot-side temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_a2: Option<ChannelColumns>,
    /// Cold-side temperature
    pub temp_b: ChannelColumns,
    /// Redundant cold-side temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_b2: Option<ChannelColumns>,
    /// Low-side voltage
    pub low_voltage: ChannelColumns,
    /// Redundant low-side voltage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_voltage2: Option<ChannelColumns>,
    /// High-side voltage
    pub high_voltage: ChannelColumns,
    /// Redundant high-side voltage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_voltage2: Option<ChannelColumns>,
}

impl ChannelLayout {
    /// Returns the columns of `channel`, or `None` for an absent redundant channel.
    pub fn columns(&self, channel: Channel) -> Option<ChannelColumns> {
        match channel {
            Channel::TempA => Some(self.temp_a),
            Channel::TempA2 => self.temp_a2,
            Channel::TempB => Some(self.temp_b),
            Channel::TempB2 => self.temp_b2,
            Channel::LowVoltage => Some(self.low_voltage),
            Channel::LowVoltage2 => self.low_voltage2,
            Channel::HighVoltage => Some(self.high_voltage),
            Channel::HighVoltage2 => self.high_voltage2,
        }
    }

    /// Iterates over the channels present in this layout.
    pub fn channels(&self) -> impl Iterator<Item = (Channel, ChannelColumns)> + '_ {
        Channel::ALL
            .into_iter()
            .filter_map(move |channel| self.columns(channel).map(|cols| (channel, cols)))
    }

    /// Minimum number of fields a line must carry.
    ///
    /// A marker in the final column may be omitted entirely, which the rig
    /// software does when no state change happened on that line.
    pub fn required_fields(&self) -> usize {
        match self.marker {
            Some(marker) if marker + 1 == self.field_count => self.field_count - 1,
            _ => self.field_count,
        }
    }

    /// Check that every column fits in `field_count` and no value column is reused.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_count == 0 {
            return Err(ConfigError::InvalidLayout(
                "field_count must be greater than zero".to_string(),
            ));
        }

        for (channel, cols) in self.channels() {
            for (what, index) in [("time", cols.time), ("value", cols.value)] {
                if index >= self.field_count {
                    return Err(ConfigError::InvalidLayout(format!(
                        "{} {} column {} is outside {} fields",
                        channel, what, index, self.field_count
                    )));
                }
            }
        }

        if let Some(marker) = self.marker {
            if marker >= self.field_count {
                return Err(ConfigError::InvalidLayout(format!(
                    "marker column {} is outside {} fields",
                    marker, self.field_count
                )));
            }
        }

        let mut value_columns: Vec<usize> = self.channels().map(|(_, c)| c.value).collect();
        value_columns.extend(self.marker);
        value_columns.sort_unstable();
        if let Some(pair) = value_columns.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::InvalidLayout(format!(
                "column {} is assigned to more than one value",
                pair[0]
            )));
        }

        Ok(())
    }
}
