//! Field-specific error types.

use std::error::Error;
use std::fmt;

/// Errors from building or registering diffusion grids.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// Grid bounds are empty, inverted, or not finite.
    InvalidBounds {
        /// Lower bound of every axis.
        min: f64,
        /// Upper bound of every axis.
        max: f64,
    },
    /// Fewer than two boxes per axis.
    InvalidResolution {
        /// The configured resolution.
        resolution: usize,
    },
    /// Diffusion coefficient or decay constant is negative or not finite.
    InvalidRate {
        /// Which parameter was rejected.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The explicit diffusion scheme would be unstable at this timestep.
    Unstable {
        /// Name of the offending substance.
        substance: String,
        /// `D * dt / h^2`; must not exceed 1/6.
        factor: f64,
    },
    /// A substance with this name is already registered.
    DuplicateSubstance {
        /// The duplicated name.
        name: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { min, max } => {
                write!(f, "invalid grid bounds [{min}, {max}]")
            }
            Self::InvalidResolution { resolution } => {
                write!(f, "grid resolution must be at least 2, got {resolution}")
            }
            Self::InvalidRate { parameter, value } => {
                write!(f, "{parameter} must be finite and >= 0, got {value}")
            }
            Self::Unstable { substance, factor } => write!(
                f,
                "diffusion of '{substance}' is unstable: D*dt/h^2 = {factor} exceeds 1/6"
            ),
            Self::DuplicateSubstance { name } => {
                write!(f, "substance '{name}' is already registered")
            }
        }
    }
}

impl Error for FieldError {}
