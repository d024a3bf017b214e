//! Growth behaviors for branching neurite agents.
//!
//! Each simulation step the scheduler invokes every behavior attached to an
//! agent. A growth behavior senses the local gradient of its guidance
//! substance, blends it with the segment's current heading and random noise
//! ([`compose_direction`]), elongates the segment, and with a fixed
//! per-step probability requests a side branch or a bifurcation.
//!
//! When an agent gives rise to new agents, the [`propagation`] protocol
//! decides which behaviors follow: a behavior is copied onto the derived
//! agent only if the event kind is in its [`EventMask`](neurite_core::EventMask).
//!
//! # Variants
//!
//! | Variant | Agent | Guidance | Structural event |
//! |---------|-------|----------|------------------|
//! | [`ApicalGrowth`] | neurite | `"apical"` | side branch |
//! | [`BasalGrowth`] | neurite | `"basal"` | bifurcation |
//! | [`GrowDivide`] | soma | none | division |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod apical;
pub mod basal;
pub mod behavior;
pub mod cache;
pub mod compositor;
pub mod grow_divide;
pub mod lifecycle;
pub mod outcome;
mod params;
pub mod propagation;

pub use apical::{ApicalGrowth, ApicalGrowthBuilder, ApicalParams};
pub use basal::{BasalGrowth, BasalGrowthBuilder, BasalParams};
pub use behavior::{Behavior, BehaviorKind};
pub use cache::FieldCache;
pub use compositor::{compose_direction, DirectionWeights};
pub use grow_divide::{GrowDivide, GrowDivideBuilder, GrowDivideParams};
pub use lifecycle::Lifecycle;
pub use outcome::{SkipReason, StepOutcome};
pub use propagation::{attach, propagate, remove, BehaviorList};
