//! Shared builder validation.

use crate::compositor::DirectionWeights;

pub(crate) fn check_probability(name: &str, p: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(format!("{name} must be in [0, 1], got {p}"))
    }
}

pub(crate) fn check_non_negative(name: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be finite and >= 0, got {v}"))
    }
}

pub(crate) fn check_weights(weights: &DirectionWeights) -> Result<(), String> {
    if weights.is_finite() {
        Ok(())
    } else {
        Err(format!("direction weights must be finite, got {weights:?}"))
    }
}

pub(crate) fn check_substance(name: &str) -> Result<(), String> {
    if name.is_empty() {
        Err("substance name must not be empty".to_string())
    } else {
        Ok(())
    }
}
