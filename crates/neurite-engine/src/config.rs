//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] holds the global numeric constants of a run: timestep,
//! seed, and the geometric defaults used whenever new segments or somas
//! are created. Growth constants live on the behaviors themselves.

use std::error::Error;
use std::f64::consts::PI;
use std::fmt;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidDt {
        /// The invalid value.
        value: f64,
    },
    /// A length or diameter is NaN, infinite, zero, or negative.
    InvalidLength {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A split portion lies outside the open interval `(0, 1)`.
    InvalidPortion {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The bifurcation angle lies outside `(0, pi)`.
    InvalidAngle {
        /// The invalid value.
        value: f64,
    },
    /// The division volume ratio range is empty or non-positive.
    InvalidVolumeRatio {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDt { value } => write!(f, "dt must be finite and positive, got {value}"),
            Self::InvalidLength { parameter, value } => {
                write!(f, "{parameter} must be finite and positive, got {value}")
            }
            Self::InvalidPortion { parameter, value } => {
                write!(f, "{parameter} must lie in (0, 1), got {value}")
            }
            Self::InvalidAngle { value } => {
                write!(f, "bifurcation_angle must lie in (0, pi), got {value}")
            }
            Self::InvalidVolumeRatio { low, high } => {
                write!(
                    f,
                    "division_volume_ratio must satisfy 0 < low <= high, got {low}..{high}"
                )
            }
        }
    }
}

impl Error for ConfigError {}

// ── SimConfig ──────────────────────────────────────────────────────

/// Global constants of a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// RNG seed. Every per-agent stream is derived from it.
    pub seed: u64,
    /// Simulation timestep. Default: 0.01.
    pub dt: f64,
    /// Length of newly created segments. Default: 1.0.
    pub neurite_default_length: f64,
    /// Diameter of neurites extended from a soma. Default: 1.0.
    pub neurite_default_diameter: f64,
    /// Terminal segments longer than this are split. Default: 15.0.
    pub neurite_max_length: f64,
    /// Share of the length kept by the distal part when a long segment is
    /// split. Default: 0.1.
    pub discretization_distal_portion: f64,
    /// Share of the length kept by the distal part when a segment is split
    /// to make room for a side branch. Default: 0.5.
    pub branch_split_portion: f64,
    /// Angle between the two daughters of a bifurcation. Default: pi / 3.
    pub bifurcation_angle: f64,
    /// Range of the daughter/mother volume ratio on division.
    /// Default: 0.9..1.1.
    pub division_volume_ratio: (f64, f64),
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            dt: 0.01,
            neurite_default_length: 1.0,
            neurite_default_diameter: 1.0,
            neurite_max_length: 15.0,
            discretization_distal_portion: 0.1,
            branch_split_portion: 0.5,
            bifurcation_angle: PI / 3.0,
            division_volume_ratio: (0.9, 1.1),
        }
    }
}

impl SimConfig {
    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Validate all numeric invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. dt finite and positive.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidDt { value: self.dt });
        }
        // 2. Lengths and diameters finite and positive.
        for (parameter, value) in [
            ("neurite_default_length", self.neurite_default_length),
            ("neurite_default_diameter", self.neurite_default_diameter),
            ("neurite_max_length", self.neurite_max_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidLength { parameter, value });
            }
        }
        // 3. Split portions strictly inside (0, 1).
        for (parameter, value) in [
            (
                "discretization_distal_portion",
                self.discretization_distal_portion,
            ),
            ("branch_split_portion", self.branch_split_portion),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::InvalidPortion { parameter, value });
            }
        }
        // 4. Bifurcation angle.
        if !(self.bifurcation_angle > 0.0 && self.bifurcation_angle < PI) {
            return Err(ConfigError::InvalidAngle {
                value: self.bifurcation_angle,
            });
        }
        // 5. Volume ratio range.
        let (low, high) = self.division_volume_ratio;
        if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
            return Err(ConfigError::InvalidVolumeRatio { low, high });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
        assert_eq!(SimConfig::with_seed(42).seed, 42);
    }

    #[test]
    fn rejects_zero_dt() {
        let cfg = SimConfig {
            dt: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidDt { value: 0.0 }));
    }

    #[test]
    fn rejects_nan_dt() {
        let cfg = SimConfig {
            dt: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDt { .. })));
    }

    #[test]
    fn rejects_negative_length() {
        let cfg = SimConfig {
            neurite_max_length: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidLength {
                parameter: "neurite_max_length",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_portion_at_bounds() {
        for value in [0.0, 1.0, f64::NAN] {
            let cfg = SimConfig {
                branch_split_portion: value,
                ..SimConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidPortion {
                    parameter: "branch_split_portion",
                    ..
                })
            ));
        }
    }

    #[test]
    fn rejects_inverted_ratio() {
        let cfg = SimConfig {
            division_volume_ratio: (1.2, 0.8),
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidVolumeRatio { .. })
        ));
    }

    #[test]
    fn error_display_names_parameter() {
        let err = ConfigError::InvalidPortion {
            parameter: "discretization_distal_portion",
            value: 2.0,
        };
        assert!(err.to_string().contains("discretization_distal_portion"));
    }
}
