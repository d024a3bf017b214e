//! Neurite: agent-based simulation of dendrite growth.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all sub-crates. Neurite segments elongate along a blend of their own
//! heading, a chemical gradient, and noise; apical tips sprout side
//! branches and basal tips bifurcate. Behaviors attached to an agent
//! follow it onto the agents it creates, as selected by per-behavior
//! event masks.
//!
//! # Quick start
//!
//! ```rust
//! use neurite::prelude::*;
//!
//! let mut fields = SubstanceRegistry::new();
//! let grid = DiffusionGrid::builder("apical")
//!     .bounds(-50.0, 50.0)
//!     .resolution(10)
//!     .initializer(Initializer::GaussianBand { mean: 50.0, sigma: 25.0, axis: Axis::Z })
//!     .build()
//!     .unwrap();
//! fields.register(grid).unwrap();
//!
//! let mut world = World::new(SimConfig::with_seed(7), fields).unwrap();
//! let soma = world.add_soma([0.0; 3], 6.0);
//! let dendrite = world.extend_neurite(soma, [0.0, 0.0, 1.0]).unwrap();
//! world.attach(dendrite, ApicalGrowth::default()).unwrap();
//! world.set_can_branch(dendrite, true).unwrap();
//! world.run(10);
//! assert_eq!(world.current_tick(), TickId(10));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `neurite-core` | IDs, vector math, events, collaborator traits |
//! | [`field`] | `neurite-field` | Diffusion grids and the substance registry |
//! | [`growth`] | `neurite-growth` | Growth behaviors and propagation |
//! | [`engine`] | `neurite-engine` | Agents, the world, and the step loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`neurite-core`).
pub use neurite_core as types;

/// Diffusing substance grids (`neurite-field`).
pub use neurite_field as field;

/// Growth behaviors and the propagation protocol (`neurite-growth`).
///
/// The three variants are [`growth::ApicalGrowth`],
/// [`growth::BasalGrowth`], and [`growth::GrowDivide`].
pub use neurite_growth as growth;

/// Agents, the world, and the step loop (`neurite-engine`).
pub use neurite_engine as engine;

/// Common imports for typical usage.
///
/// ```rust
/// use neurite::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use neurite_core::{AgentId, AgentKind, AgentRef, EventKind, EventMask, TickId, Vec3};

    // Fields
    pub use neurite_field::{Axis, DiffusionGrid, Initializer, SubstanceRegistry};

    // Behaviors
    pub use neurite_growth::{
        ApicalGrowth, BasalGrowth, Behavior, BehaviorKind, DirectionWeights, GrowDivide,
        Lifecycle, StepOutcome,
    };

    // Engine
    pub use neurite_engine::{
        Body, NeuriteSegment, PyramidalCell, SimConfig, Soma, StepMetrics, World, WorldError,
    };
}
