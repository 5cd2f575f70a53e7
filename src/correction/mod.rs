//! # Thermocouple Correction
//!
//! The voltage measured across each thermocouple leg contains the leg's own
//! thermoelectric contribution. Given the average sample temperature and the
//! instantaneous temperature difference, the parasitic voltage
//! `alpha(T) * dT` is computed from the leg's calibration polynomial and the
//! measured voltage is referred to it:
//!
//! ```text
//! corrected = alpha_leg(avgT + 273.15) * dT - raw_uV
//! ```

mod error;
mod polynomial;

pub use error::CorrectionError;
pub use polynomial::{PolynomialRange, SeebeckPolynomial, ALUMEL_SEEBECK_V1, CHROMEL_SEEBECK_V1};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::resample::ResampledSeries;

/// Offset between the Celsius and Kelvin scales
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Thermocouple leg material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Leg {
    /// Positive leg of a type-K thermocouple
    Chromel,
    /// Negative leg of a type-K thermocouple
    Alumel,
}

impl Leg {
    /// Calibration table currently in use for this leg.
    pub fn polynomial(&self) -> &'static SeebeckPolynomial {
        match self {
            Leg::Chromel => &CHROMEL_SEEBECK_V1,
            Leg::Alumel => &ALUMEL_SEEBECK_V1,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Chromel => write!(f, "chromel"),
            Leg::Alumel => write!(f, "alumel"),
        }
    }
}

/// Voltage channel side (one per thermocouple leg).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    /// Low voltage channel
    Low,
    /// High voltage channel
    High,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Low => write!(f, "low"),
            Side::High => write!(f, "high"),
        }
    }
}

/// Supported thermocouple types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThermocoupleType {
    /// Chromel/Alumel
    #[default]
    TypeK,
}

impl ThermocoupleType {
    /// Legs making up this thermocouple.
    pub fn legs(&self) -> [Leg; 2] {
        match self {
            ThermocoupleType::TypeK => [Leg::Chromel, Leg::Alumel],
        }
    }
}

/// Thermocouple type and which leg each voltage channel measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermocoupleConfig {
    /// Thermocouple type
    pub kind: ThermocoupleType,
    /// Leg wired to the low voltage channel
    pub low_leg: Leg,
    /// Leg wired to the high voltage channel
    pub high_leg: Leg,
}

impl Default for ThermocoupleConfig {
    fn default() -> Self {
        Self {
            kind: ThermocoupleType::TypeK,
            low_leg: Leg::Chromel,
            high_leg: Leg::Alumel,
        }
    }
}

impl ThermocoupleConfig {
    /// Leg measured on `side`.
    pub fn leg(&self, side: Side) -> Leg {
        match side {
            Side::Low => self.low_leg,
            Side::High => self.high_leg,
        }
    }

    /// Both legs must belong to the thermocouple type and be distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let legs = self.kind.legs();
        for leg in [self.low_leg, self.high_leg] {
            if !legs.contains(&leg) {
                return Err(ConfigError::InvalidThermocouple(format!(
                    "{leg} is not a leg of {:?}",
                    self.kind
                )));
            }
        }
        if self.low_leg == self.high_leg {
            return Err(ConfigError::InvalidThermocouple(format!(
                "low and high channels both measure {}",
                self.low_leg
            )));
        }
        Ok(())
    }
}

/// Seebeck coefficient (µV/K) of `leg` at absolute temperature `t_k`.
pub fn alpha(leg: Leg, t_k: f64) -> Result<f64, CorrectionError> {
    leg.polynomial().evaluate(t_k)
}

/// Correct a raw leg voltage (µV) for the leg's own thermoelectric voltage.
pub fn correct(raw_uv: f64, avg_t_c: f64, d_t: f64, leg: Leg) -> Result<f64, CorrectionError> {
    let t_k = avg_t_c + CELSIUS_TO_KELVIN;
    Ok(alpha(leg, t_k)? * d_t - raw_uv)
}

/// Corrected voltages (µV) for every resampled point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectedSeries {
    /// Corrected low-side voltage
    pub v_low: Vec<f64>,
    /// Corrected high-side voltage
    pub v_high: Vec<f64>,
}

impl CorrectedSeries {
    /// Corrected voltages of one side
    pub fn side(&self, side: Side) -> &[f64] {
        match side {
            Side::Low => &self.v_low,
            Side::High => &self.v_high,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.v_low.len()
    }

    /// Returns true if there are no points
    pub fn is_empty(&self) -> bool {
        self.v_low.is_empty()
    }
}

/// Apply [`correct`] to both voltage sides of a resampled series.
pub fn correct_series(
    series: &ResampledSeries,
    thermocouple: &ThermocoupleConfig,
) -> Result<CorrectedSeries, CorrectionError> {
    let correct_side = |side: Side| -> Result<Vec<f64>, CorrectionError> {
        let leg = thermocouple.leg(side);
        series
            .voltage(side)
            .iter()
            .zip(series.avg_temp.iter().zip(&series.delta_t))
            .enumerate()
            .map(|(index, (&raw, (&avg_t, &d_t)))| {
                correct(raw, avg_t, d_t, leg).map_err(|e| CorrectionError::AtPoint {
                    index,
                    side,
                    source: Box::new(e),
                })
            })
            .collect()
    };

    Ok(CorrectedSeries {
        v_low: correct_side(Side::Low)?,
        v_high: correct_side(Side::High)?,
    })
}
