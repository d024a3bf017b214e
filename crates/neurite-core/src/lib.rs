//! Core types and traits for the neurite growth engine.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: agent handles, 3D vector
//! math, structural events, error types, and the collaborator traits that
//! growth behaviors are written against.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod id;
pub mod math;
pub mod traits;

pub use error::AttachError;
pub use event::{EventKind, EventMask, StructuralEvent};
pub use id::{AgentId, AgentRef, AgentUid, PendingAgent, SubstanceId, TickId};
pub use math::Vec3;
pub use traits::{
    AgentFacade, AgentKind, GradientField, NeuriteFacade, NeuriteState, RandomSource, SomaFacade,
};
