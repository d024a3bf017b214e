//! Uniform 3D diffusion grid.
//!
//! The simulation cube `[min, max]^3` is divided into `resolution^3` boxes
//! of edge length `h`. Each step applies an explicit-Euler diffusion update
//! with closed (zero-flux) boundaries followed by exponential decay:
//!
//! ```text
//! c'[i] = c[i] + (D * dt / h^2) * (sum(c[neighbours]) - 6 * c[i])
//! c'[i] *= exp(-mu * dt)
//! ```
//!
//! A neighbour outside the cube contributes the box's own value, so no
//! substance leaves through the walls. Gradients are central differences
//! between neighbouring boxes, one-sided on the walls.
//!
//! Constructed via the builder pattern: [`DiffusionGrid::builder`].

use neurite_core::Vec3;

use crate::error::FieldError;
use crate::initializer::Initializer;

/// Stability limit of the explicit 3D scheme.
const MAX_STABLE_FACTOR: f64 = 1.0 / 6.0;

/// Concentration grid for a single substance.
#[derive(Clone, Debug)]
pub struct DiffusionGrid {
    name: String,
    min: f64,
    box_length: f64,
    resolution: usize,
    coefficient: f64,
    decay: f64,
    concentrations: Vec<f64>,
    scratch: Vec<f64>,
}

/// Builder for [`DiffusionGrid`].
///
/// Defaults: bounds `[-100, 100]`, 10 boxes per axis, no diffusion, no
/// decay, zero initial concentration.
pub struct DiffusionGridBuilder {
    name: String,
    min: f64,
    max: f64,
    resolution: usize,
    coefficient: f64,
    decay: f64,
    initializer: Option<Initializer>,
}

impl DiffusionGrid {
    /// Create a builder for a substance called `name`.
    pub fn builder(name: impl Into<String>) -> DiffusionGridBuilder {
        DiffusionGridBuilder {
            name: name.into(),
            min: -100.0,
            max: 100.0,
            resolution: 10,
            coefficient: 0.0,
            decay: 0.0,
            initializer: None,
        }
    }

    /// Substance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boxes per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Edge length of one box.
    pub fn box_length(&self) -> f64 {
        self.box_length
    }

    /// Raw concentrations in x-fastest order.
    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    /// Sum of all concentrations.
    pub fn total(&self) -> f64 {
        self.concentrations.iter().sum()
    }

    fn flat(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.resolution + y) * self.resolution + x
    }

    fn axis_box(&self, coord: f64) -> usize {
        let i = ((coord - self.min) / self.box_length).floor();
        if i.is_nan() || i < 0.0 {
            0
        } else {
            (i as usize).min(self.resolution - 1)
        }
    }

    /// Indices of the box containing `position`, clamped to the grid.
    pub fn box_of(&self, position: Vec3) -> [usize; 3] {
        [
            self.axis_box(position[0]),
            self.axis_box(position[1]),
            self.axis_box(position[2]),
        ]
    }

    /// Centre of box `(x, y, z)`.
    pub fn box_center(&self, x: usize, y: usize, z: usize) -> Vec3 {
        let c = |i: usize| self.min + (i as f64 + 0.5) * self.box_length;
        [c(x), c(y), c(z)]
    }

    /// Concentration in the box containing `position`.
    pub fn concentration_at(&self, position: Vec3) -> f64 {
        let [x, y, z] = self.box_of(position);
        self.concentrations[self.flat(x, y, z)]
    }

    /// Add `amount` to the box containing `position`.
    pub fn increase_concentration(&mut self, position: Vec3, amount: f64) {
        let [x, y, z] = self.box_of(position);
        let i = self.flat(x, y, z);
        self.concentrations[i] += amount;
    }

    /// Overwrite every box with the initializer's value at its centre.
    pub fn initialize(&mut self, init: &Initializer) {
        let n = self.resolution;
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let v = init.value_at(self.box_center(x, y, z));
                    let i = self.flat(x, y, z);
                    self.concentrations[i] = v;
                }
            }
        }
    }

    /// Gradient of the concentration at `position`.
    pub fn gradient(&self, position: Vec3) -> Vec3 {
        let idx = self.box_of(position);
        let mut grad = [0.0; 3];
        for (axis, g) in grad.iter_mut().enumerate() {
            let at = |k: usize| {
                let mut p = idx;
                p[axis] = k;
                self.concentrations[self.flat(p[0], p[1], p[2])]
            };
            let i = idx[axis];
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(self.resolution - 1);
            *g = (at(hi) - at(lo)) / ((hi - lo) as f64 * self.box_length);
        }
        grad
    }

    /// `D * dt / h^2` for this grid.
    pub fn stability_factor(&self, dt: f64) -> f64 {
        self.coefficient * dt / (self.box_length * self.box_length)
    }

    /// Reject timesteps at which the explicit scheme would blow up.
    pub fn check_stable(&self, dt: f64) -> Result<(), FieldError> {
        let factor = self.stability_factor(dt);
        if factor > MAX_STABLE_FACTOR {
            return Err(FieldError::Unstable {
                substance: self.name.clone(),
                factor,
            });
        }
        Ok(())
    }

    /// Advance diffusion and decay by `dt`.
    pub fn step(&mut self, dt: f64) {
        let n = self.resolution;
        let factor = self.stability_factor(dt);

        if factor > 0.0 {
            for z in 0..n {
                for y in 0..n {
                    for x in 0..n {
                        let i = self.flat(x, y, z);
                        let c = self.concentrations[i];
                        let get = |xx: Option<usize>, yy: Option<usize>, zz: Option<usize>| {
                            match (xx, yy, zz) {
                                (Some(a), Some(b), Some(d)) if a < n && b < n && d < n => {
                                    self.concentrations[self.flat(a, b, d)]
                                }
                                _ => c,
                            }
                        };
                        let sum = get(x.checked_sub(1), Some(y), Some(z))
                            + get(Some(x + 1), Some(y), Some(z))
                            + get(Some(x), y.checked_sub(1), Some(z))
                            + get(Some(x), Some(y + 1), Some(z))
                            + get(Some(x), Some(y), z.checked_sub(1))
                            + get(Some(x), Some(y), Some(z + 1));
                        self.scratch[i] = c + factor * (sum - 6.0 * c);
                    }
                }
            }
            std::mem::swap(&mut self.concentrations, &mut self.scratch);
        }

        if self.decay > 0.0 {
            let decay_factor = (-(self.decay * dt)).exp();
            for v in self.concentrations.iter_mut() {
                *v *= decay_factor;
            }
        }
    }
}

impl DiffusionGridBuilder {
    /// Set the cube bounds, shared by all three axes.
    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the number of boxes per axis (at least 2).
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the diffusion coefficient `D` (default 0).
    pub fn coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = coefficient;
        self
    }

    /// Set the decay constant `mu` (default 0).
    pub fn decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Set the initial concentration profile.
    pub fn initializer(mut self, init: Initializer) -> Self {
        self.initializer = Some(init);
        self
    }

    /// Build the grid, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the bounds are not finite or `min >= max`, the
    /// resolution is below 2, or the coefficient or decay is negative or
    /// not finite.
    pub fn build(self) -> Result<DiffusionGrid, FieldError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(FieldError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        if self.resolution < 2 {
            return Err(FieldError::InvalidResolution {
                resolution: self.resolution,
            });
        }
        for (parameter, value) in [("coefficient", self.coefficient), ("decay", self.decay)] {
            if !value.is_finite() || value < 0.0 {
                return Err(FieldError::InvalidRate { parameter, value });
            }
        }

        let cells = self.resolution * self.resolution * self.resolution;
        let mut grid = DiffusionGrid {
            name: self.name,
            min: self.min,
            box_length: (self.max - self.min) / self.resolution as f64,
            resolution: self.resolution,
            coefficient: self.coefficient,
            decay: self.decay,
            concentrations: vec![0.0; cells],
            scratch: vec![0.0; cells],
        };
        if let Some(init) = self.initializer {
            grid.initialize(&init);
        }
        Ok(grid)
    }
}
