//! What a single behavior invocation did.

use std::fmt;

use neurite_core::PendingAgent;

/// Result of running one behavior on one agent for one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The behavior did nothing.
    Skipped(SkipReason),
    /// The segment was elongated (or asked to; non-terminal segments ignore it).
    Elongated,
    /// The segment was elongated and sprouted a side branch.
    Branched {
        /// The requested branch segment.
        child: PendingAgent,
    },
    /// The segment was elongated and bifurcated.
    Bifurcated {
        /// The two requested daughter segments.
        children: (PendingAgent, PendingAgent),
    },
    /// The soma grew in volume.
    Grew,
    /// The soma divided.
    Divided {
        /// The requested daughter soma.
        daughter: PendingAgent,
    },
}

impl StepOutcome {
    /// Whether the behavior changed anything.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Whether the behavior requested new agents.
    pub fn created_agents(&self) -> usize {
        match self {
            Self::Branched { .. } | Self::Divided { .. } => 1,
            Self::Bifurcated { .. } => 2,
            _ => 0,
        }
    }
}

/// Why a behavior did nothing this step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The behavior does not apply to this agent variant.
    IncompatibleAgent,
    /// The guidance substance is not registered.
    SubstanceMissing,
    /// The segment is too thin, or not a terminal when one is required.
    GuardUnmet,
    /// The soma is not allowed to divide.
    CannotDivide,
    /// The behavior was removed from its agent.
    Removed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleAgent => f.write_str("incompatible agent"),
            Self::SubstanceMissing => f.write_str("guidance substance missing"),
            Self::GuardUnmet => f.write_str("guard unmet"),
            Self::CannotDivide => f.write_str("soma cannot divide"),
            Self::Removed => f.write_str("behavior removed"),
        }
    }
}
