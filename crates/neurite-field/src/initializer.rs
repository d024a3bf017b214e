//! Initial spatial distributions for substance grids.

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// Component index of this axis in a [`Vec3`](neurite_core::Vec3).
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Initial concentration profile of a substance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Initializer {
    /// The same concentration everywhere.
    Uniform(f64),
    /// A Gaussian band orthogonal to `axis`, peaking at 1.0 at `mean`.
    ///
    /// ```text
    /// c(p) = exp(-(p[axis] - mean)^2 / (2 * sigma^2))
    /// ```
    GaussianBand {
        /// Position of the band's peak along `axis`.
        mean: f64,
        /// Width of the band.
        sigma: f64,
        /// Axis the band varies along.
        axis: Axis,
    },
}

impl Initializer {
    /// Concentration at `point`.
    pub fn value_at(&self, point: [f64; 3]) -> f64 {
        match *self {
            Self::Uniform(v) => v,
            Self::GaussianBand { mean, sigma, axis } => {
                if sigma <= 0.0 {
                    return if point[axis.index()] == mean { 1.0 } else { 0.0 };
                }
                let d = point[axis.index()] - mean;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            }
        }
    }
}
