//! Growth direction compositor.
//!
//! ```text
//! direction = w_p * persistence + w_n * noise + w_g * gradient
//! ```
//!
//! The result is deliberately not normalized: its magnitude is what the
//! elongation step scales against.

use neurite_core::math::{add, scalar_mult};
use neurite_core::Vec3;

/// Weights of the three direction components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionWeights {
    /// Weight of the current heading (spring axis).
    pub persistence: f64,
    /// Weight of the local substance gradient.
    pub gradient: f64,
    /// Weight of the random noise vector.
    pub noise: f64,
}

impl DirectionWeights {
    /// Weights from their three components.
    pub const fn new(persistence: f64, gradient: f64, noise: f64) -> Self {
        Self {
            persistence,
            gradient,
            noise,
        }
    }

    /// All three weights multiplied by `k`.
    pub fn scaled(self, k: f64) -> Self {
        Self::new(self.persistence * k, self.gradient * k, self.noise * k)
    }

    /// Whether every weight is finite.
    pub fn is_finite(&self) -> bool {
        self.persistence.is_finite() && self.gradient.is_finite() && self.noise.is_finite()
    }
}

/// Blend heading, gradient, and noise into one step direction.
pub fn compose_direction(
    persistence: Vec3,
    gradient: Vec3,
    noise: Vec3,
    weights: DirectionWeights,
) -> Vec3 {
    let old_direction = scalar_mult(weights.persistence, persistence);
    let grad_direction = scalar_mult(weights.gradient, gradient);
    let random_direction = scalar_mult(weights.noise, noise);
    add(add(old_direction, random_direction), grad_direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn persistence_only() {
        let w = DirectionWeights::new(3.0, 0.04, 0.3);
        let d = compose_direction([0.0, 0.0, 1.0], [0.0; 3], [0.0; 3], w);
        assert_eq!(d, [0.0, 0.0, 3.0]);
    }

    #[test]
    fn each_component_weighted() {
        let w = DirectionWeights::new(2.0, 10.0, 0.5);
        let d = compose_direction([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 4.0], w);
        assert_eq!(d, [2.0, 10.0, 2.0]);
    }

    #[test]
    fn no_normalization() {
        let w = DirectionWeights::new(5.0, 0.0, 0.0);
        let d = compose_direction([0.0, 3.0, 4.0], [0.0; 3], [0.0; 3], w);
        assert_eq!(d, [0.0, 15.0, 20.0]);
    }

    fn vec3() -> impl Strategy<Value = Vec3> {
        [-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0]
    }

    proptest! {
        #[test]
        fn linear_in_weights(
            p in vec3(), g in vec3(), n in vec3(),
            wp in -5.0f64..5.0, wg in -5.0f64..5.0, wn in -5.0f64..5.0,
            k in -4.0f64..4.0,
        ) {
            let w = DirectionWeights::new(wp, wg, wn);
            let base = compose_direction(p, g, n, w);
            let scaled = compose_direction(p, g, n, w.scaled(k));
            for i in 0..3 {
                prop_assert!((scaled[i] - k * base[i]).abs() < 1e-9);
            }
        }

        #[test]
        fn zero_weights_give_zero(p in vec3(), g in vec3(), n in vec3()) {
            let d = compose_direction(p, g, n, DirectionWeights::new(0.0, 0.0, 0.0));
            prop_assert_eq!(d.map(f64::abs), [0.0; 3]);
        }
    }
}
