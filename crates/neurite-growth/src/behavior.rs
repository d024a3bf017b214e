//! The closed set of behaviors an agent can carry.

use std::fmt;

use neurite_core::{
    AgentFacade, AgentKind, EventKind, EventMask, GradientField, RandomSource, StructuralEvent,
};
use tracing::trace;

use crate::apical::ApicalGrowth;
use crate::basal::BasalGrowth;
use crate::grow_divide::GrowDivide;
use crate::lifecycle::{BehaviorCore, Lifecycle};
use crate::outcome::StepOutcome;

/// Variant tag of a [`Behavior`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    /// [`ApicalGrowth`].
    ApicalGrowth,
    /// [`BasalGrowth`].
    BasalGrowth,
    /// [`GrowDivide`].
    GrowDivide,
}

impl BehaviorKind {
    /// Stable snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ApicalGrowth => "apical_growth",
            Self::BasalGrowth => "basal_growth",
            Self::GrowDivide => "grow_divide",
        }
    }

    /// The agent variant this behavior runs on.
    pub fn target(self) -> AgentKind {
        match self {
            Self::ApicalGrowth | Self::BasalGrowth => AgentKind::NeuriteSegment,
            Self::GrowDivide => AgentKind::Soma,
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A behavior instance attached to one agent.
///
/// Each agent owns its instances exclusively. Copies made for derived
/// agents share nothing with their source.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Apical dendrite growth.
    Apical(ApicalGrowth),
    /// Basal dendrite growth.
    Basal(BasalGrowth),
    /// Soma growth and division.
    GrowDivide(GrowDivide),
}

impl From<ApicalGrowth> for Behavior {
    fn from(b: ApicalGrowth) -> Self {
        Self::Apical(b)
    }
}

impl From<BasalGrowth> for Behavior {
    fn from(b: BasalGrowth) -> Self {
        Self::Basal(b)
    }
}

impl From<GrowDivide> for Behavior {
    fn from(b: GrowDivide) -> Self {
        Self::GrowDivide(b)
    }
}

impl Behavior {
    /// A default-configured, uninitialized instance of `kind`.
    pub fn fresh(kind: BehaviorKind) -> Self {
        match kind {
            BehaviorKind::ApicalGrowth => ApicalGrowth::new().into(),
            BehaviorKind::BasalGrowth => BasalGrowth::new().into(),
            BehaviorKind::GrowDivide => GrowDivide::new().into(),
        }
    }

    /// Variant tag.
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Self::Apical(_) => BehaviorKind::ApicalGrowth,
            Self::Basal(_) => BehaviorKind::BasalGrowth,
            Self::GrowDivide(_) => BehaviorKind::GrowDivide,
        }
    }

    /// Stable snake-case name of the variant.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether this behavior may be attached to an agent of `agent` kind.
    pub fn compatible_with(&self, agent: AgentKind) -> bool {
        self.kind().target() == agent
    }

    /// Events this instance propagates on.
    pub fn accepted_events(&self) -> EventMask {
        match self {
            Self::Apical(b) => b.accepted_events(),
            Self::Basal(b) => b.accepted_events(),
            Self::GrowDivide(b) => b.accepted_events(),
        }
    }

    /// Whether an event of `kind` propagates this instance.
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.accepted_events().contains(kind)
    }

    /// Lifecycle state.
    pub fn state(&self) -> Lifecycle {
        match self {
            Self::Apical(b) => b.state(),
            Self::Basal(b) => b.state(),
            Self::GrowDivide(b) => b.state(),
        }
    }

    /// Whether the instance has run at least once.
    pub fn is_initialized(&self) -> bool {
        !matches!(self.state(), Lifecycle::Uninitialized)
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        match self {
            Self::Apical(b) => b.core_mut(),
            Self::Basal(b) => b.core_mut(),
            Self::GrowDivide(b) => b.core_mut(),
        }
    }

    /// Run one step on `agent`.
    ///
    /// Never fails: unmet preconditions turn into
    /// [`StepOutcome::Skipped`].
    pub fn run(
        &mut self,
        agent: &mut dyn AgentFacade,
        fields: &dyn GradientField,
        rng: &mut dyn RandomSource,
    ) -> StepOutcome {
        let outcome = match self {
            Self::Apical(b) => b.run(agent, fields, rng),
            Self::Basal(b) => b.run(agent, fields, rng),
            Self::GrowDivide(b) => b.run(agent),
        };
        if let StepOutcome::Skipped(reason) = outcome {
            trace!(behavior = self.name(), %reason, "behavior skipped");
        }
        outcome
    }

    /// Instance to give a derived agent for `event`, if this one propagates.
    ///
    /// The copy has the same constants and mask, but is uninitialized and
    /// has an unresolved substance cache.
    pub fn instance_for(&self, event: &StructuralEvent) -> Option<Behavior> {
        if !self.accepts(event.kind) {
            return None;
        }
        Some(match self {
            Self::Apical(b) => Self::Apical(b.derive()),
            Self::Basal(b) => Self::Basal(b.derive()),
            Self::GrowDivide(b) => Self::GrowDivide(b.derive()),
        })
    }

    /// Notify the source instance that `event` occurred on its agent.
    ///
    /// `derived` holds the instances created for the derived agents. An
    /// active instance whose mask accepts the event becomes `Propagated`.
    pub fn handle_event(&mut self, event: &StructuralEvent, derived: &[&Behavior]) {
        if !self.accepts(event.kind) {
            return;
        }
        trace!(
            behavior = self.name(),
            event = %event.kind,
            copies = derived.len(),
            "behavior propagated"
        );
        self.core_mut().on_propagated();
    }

    /// Mark the instance as detached from its agent.
    pub fn mark_removed(&mut self) {
        self.core_mut().on_removed();
    }
}
