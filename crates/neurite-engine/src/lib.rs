//! Agent storage, geometry, and the step loop for neurite growth
//! simulations.
//!
//! The engine owns the agents the growth behaviors run on: spherical
//! [`Soma`]s and cylindrical [`NeuriteSegment`]s, stored in a generational
//! arena inside a [`World`]. Each step runs every agent's behaviors
//! against narrow facades, queues creations per agent, and commits them
//! in agent order, so results are reproducible for a given seed with or
//! without the `parallel` feature.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod config;
mod context;
pub mod error;
pub mod metrics;
pub mod neurite;
pub mod rng;
pub mod scenario;
pub mod soma;
mod spawn;
pub mod world;

pub use agent::{Agent, Body};
pub use config::{ConfigError, SimConfig};
pub use error::WorldError;
pub use metrics::StepMetrics;
pub use neurite::NeuriteSegment;
pub use rng::{AgentRng, RngStream};
pub use scenario::{PyramidalCell, PyramidalRun};
pub use soma::Soma;
pub use world::World;
