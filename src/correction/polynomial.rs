//! Absolute Seebeck coefficient polynomials of the type-K thermocouple legs.
//!
//! Each table is a named, versioned calibration constant. Recalibrating the rig
//! means adding a `_V2` table and pointing [`Leg::polynomial`] at it; the
//! correction code itself does not change.
//!
//! Coefficients are in ascending powers of the absolute temperature in Kelvin
//! and yield µV/K. Ranges are closed-open: `lower_k <= T < upper_k`.
//!
//! [`Leg::polynomial`]: super::Leg::polynomial

use super::CorrectionError;

/// One piece of a piecewise polynomial.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialRange {
    /// Inclusive lower bound (K)
    pub lower_k: f64,
    /// Exclusive upper bound (K)
    pub upper_k: f64,
    /// Coefficients `c0, c1, ..., cn` of `c0 + c1*T + ... + cn*T^n`
    pub coefficients: &'static [f64],
}

impl PolynomialRange {
    /// Returns true if `t_k` lies in `[lower_k, upper_k)`.
    #[inline]
    pub fn contains(&self, t_k: f64) -> bool {
        self.lower_k <= t_k && t_k < self.upper_k
    }

    /// Evaluate the polynomial at `t_k` without range checking.
    #[inline]
    pub fn evaluate_unchecked(&self, t_k: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t_k + c)
    }

    /// Polynomial degree
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Piecewise polynomial model of a thermocouple leg's Seebeck coefficient.
#[derive(Debug, Clone, Copy)]
pub struct SeebeckPolynomial {
    /// Table name, e.g. `chromel`
    pub name: &'static str,
    /// Calibration version of the table
    pub version: u32,
    /// Contiguous ranges in ascending temperature order
    pub ranges: &'static [PolynomialRange],
}

impl SeebeckPolynomial {
    /// Returns the `[lower, upper)` domain in Kelvin.
    pub fn domain(&self) -> (f64, f64) {
        let lower = self.ranges.first().map_or(f64::NAN, |r| r.lower_k);
        let upper = self.ranges.last().map_or(f64::NAN, |r| r.upper_k);
        (lower, upper)
    }

    /// Returns the range responsible for `t_k`.
    pub fn range_for(&self, t_k: f64) -> Option<&PolynomialRange> {
        self.ranges.iter().find(|r| r.contains(t_k))
    }

    /// Evaluate the Seebeck coefficient (µV/K) at `t_k`.
    ///
    /// Temperatures outside the calibrated domain are rejected, never
    /// extrapolated or clamped.
    pub fn evaluate(&self, t_k: f64) -> Result<f64, CorrectionError> {
        match self.range_for(t_k) {
            Some(range) => Ok(range.evaluate_unchecked(t_k)),
            None => {
                let (lower_k, upper_k) = self.domain();
                Err(CorrectionError::OutOfRange {
                    table: self.name,
                    temperature_k: t_k,
                    lower_k,
                    upper_k,
                })
            }
        }
    }
}

/// Chromel (Ni-10%Cr) absolute Seebeck coefficient, calibration v1.
pub const CHROMEL_SEEBECK_V1: SeebeckPolynomial = SeebeckPolynomial {
    name: "chromel",
    version: 1,
    ranges: &[
        PolynomialRange {
            lower_k: 270.0,
            upper_k: 700.0,
            coefficients: &[
                1.961905452676718e+02,
                -4.321312845041432e+00,
                4.486093901951735e-02,
                -2.628348258080965e-04,
                9.651443347289425e-07,
                -2.305752596290247e-09,
                3.586522378030157e-12,
                -3.505601119796035e-15,
                1.955767189720710e-18,
                -4.750265881774018e-22,
            ],
        },
        PolynomialRange {
            lower_k: 700.0,
            upper_k: 1599.0,
            coefficients: &[
                5.897255062841017e+03,
                -5.447469880307639e+01,
                2.247028257250950e-01,
                -5.427686076704669e-04,
                8.504420867871587e-07,
                -9.031187868787533e-10,
                6.582170831870351e-13,
                -3.250781506743950e-16,
                1.041103176547156e-19,
                -1.952270979191029e-23,
                1.627587223377995e-27,
            ],
        },
    ],
};

/// Alumel (Ni-Al-Mn-Si) absolute Seebeck coefficient, calibration v1.
///
/// The lower range ends at 570 K to isolate the magnetic transition anomaly.
pub const ALUMEL_SEEBECK_V1: SeebeckPolynomial = SeebeckPolynomial {
    name: "alumel",
    version: 1,
    ranges: &[
        PolynomialRange {
            lower_k: 270.0,
            upper_k: 570.0,
            coefficients: &[
                -2.001003096378066e+03,
                -5.231203695865235e+01,
                1.569219829009636e+00,
                -1.553182035886512e-02,
                8.246033686743021e-05,
                -2.654577341033019e-07,
                5.358822629620122e-10,
                -6.651542309106300e-13,
                4.650855720113785e-16,
                -1.404352062110424e-19,
            ],
        },
        PolynomialRange {
            lower_k: 570.0,
            upper_k: 1599.0,
            coefficients: &[
                2.550383187106118e+03,
                -2.758006347403936e+01,
                1.308467276893169e-01,
                -3.614044726547818e-04,
                6.440817165747671e-07,
                -7.741567422453976e-10,
                6.357415651266192e-13,
                -3.523499692585076e-16,
                1.261988980035115e-19,
                -2.639166462577640e-23,
                2.448735190555420e-27,
            ],
        },
    ],
};
