//! Diffusing substance grids for the neurite growth engine.
//!
//! Each chemical substance lives in a [`DiffusionGrid`]: a uniform cubic
//! grid of concentrations that diffuses and decays between steps and
//! answers gradient queries during a step. The [`SubstanceRegistry`] owns
//! all grids, assigns [`SubstanceId`](neurite_core::SubstanceId)s, and
//! implements [`GradientField`](neurite_core::GradientField) for behaviors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod initializer;
pub mod registry;

pub use error::FieldError;
pub use grid::{DiffusionGrid, DiffusionGridBuilder};
pub use initializer::{Axis, Initializer};
pub use registry::SubstanceRegistry;
