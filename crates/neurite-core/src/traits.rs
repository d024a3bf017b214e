//! Collaborator traits the growth behaviors are written against.
//!
//! Behaviors never see the world arena, the diffusion solver, or a concrete
//! RNG. They see these narrow interfaces, which the engine implements and
//! `neurite-test-utils` mocks.

use std::fmt;

use crate::id::{PendingAgent, SubstanceId};
use crate::math::{self, Vec3};

/// Read-only access to the chemical gradient fields.
///
/// Fields are mutated only between steps, so implementations must be
/// shareable across concurrently-stepping agents.
pub trait GradientField: Sync {
    /// Look up a substance by name.
    ///
    /// Returns `None` if no substance with that name is registered.
    fn resolve(&self, substance: &str) -> Option<SubstanceId>;

    /// Local gradient of `substance` at `position`.
    ///
    /// Unknown substances yield the zero vector.
    fn gradient(&self, substance: SubstanceId, position: Vec3) -> Vec3;
}

/// Source of uniform random draws.
///
/// One independent instance exists per agent per step, so draws do not
/// depend on the order in which agents execute.
pub trait RandomSource {
    /// Uniform draw in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Vector with each component drawn uniformly in `[low, high)`.
    fn uniform_vec3(&mut self, low: f64, high: f64) -> Vec3 {
        [
            self.uniform(low, high),
            self.uniform(low, high),
            self.uniform(low, high),
        ]
    }
}

/// Agent variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// A neuron cell body.
    Soma,
    /// A cylindrical piece of a dendrite or axon.
    NeuriteSegment,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soma => f.write_str("soma"),
            Self::NeuriteSegment => f.write_str("neurite segment"),
        }
    }
}

/// Plain state of a neurite segment.
///
/// Implemented both by the segment a behavior runs on and by segments
/// created earlier in the same step, which may only be configured.
pub trait NeuriteState {
    /// Segment diameter.
    fn diameter(&self) -> f64;

    /// Overwrite the segment diameter.
    fn set_diameter(&mut self, diameter: f64);

    /// Midpoint of the segment.
    fn position(&self) -> Vec3;

    /// Vector from the proximal to the distal end.
    fn spring_axis(&self) -> Vec3;

    /// Unit vector along the spring axis.
    fn unit_direction(&self) -> Vec3 {
        math::normalize(self.spring_axis())
    }

    /// Whether this segment is the growing tip of its branch.
    fn is_terminal(&self) -> bool;

    /// Whether side branches may sprout from this segment.
    fn can_branch(&self) -> bool;

    /// Allow or forbid side branches.
    fn set_can_branch(&mut self, can_branch: bool);
}

/// Operations a growth behavior may perform on the segment it runs on.
///
/// Creation operations only *request* new agents; the owner of the agent
/// collection inserts them after the step.
pub trait NeuriteFacade: NeuriteState {
    /// Move the distal end by `speed` along `direction`.
    ///
    /// A no-op on non-terminal segments.
    fn elongate_terminal(&mut self, speed: f64, direction: Vec3);

    /// Sprout a side branch heading along `direction`.
    fn branch(&mut self, direction: Vec3) -> PendingAgent;

    /// Replace the growing tip with two terminal daughters.
    fn bifurcate(&mut self) -> (PendingAgent, PendingAgent);

    /// Configure a segment created earlier in this step.
    fn derived_mut(&mut self, agent: PendingAgent) -> Option<&mut dyn NeuriteState>;
}

/// Operations a behavior may perform on a soma.
pub trait SomaFacade {
    /// Soma diameter.
    fn diameter(&self) -> f64;

    /// Soma volume.
    fn volume(&self) -> f64;

    /// Whether this soma is allowed to divide.
    fn can_divide(&self) -> bool;

    /// Grow the volume at `speed` volume units per unit time.
    fn change_volume(&mut self, speed: f64);

    /// Split into mother and daughter.
    fn divide(&mut self) -> PendingAgent;
}

/// The agent a behavior is invoked on.
pub trait AgentFacade {
    /// Variant of the agent.
    fn kind(&self) -> AgentKind;

    /// Neurite view, or `None` if the agent is not a neurite segment.
    fn as_neurite(&mut self) -> Option<&mut dyn NeuriteFacade>;

    /// Soma view, or `None` if the agent is not a soma.
    fn as_soma(&mut self) -> Option<&mut dyn SomaFacade>;
}
