//! Per-instance behavior lifecycle.

use std::fmt;

use neurite_core::EventMask;

/// Where a behavior instance is in its life.
///
/// ```text
/// Uninitialized --run--> Active --accepted event--> Propagated
///        \                  \                          /
///         +-------------------+------ removal ------> Removed
/// ```
///
/// An instance that receives an accepted event before it first runs stays
/// `Uninitialized`: it has not resolved anything that would need resetting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Created or copied; not yet run.
    #[default]
    Uninitialized,
    /// Has run at least once.
    Active,
    /// Has handed copies of itself to derived agents.
    Propagated,
    /// Detached from its agent.
    Removed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Active => f.write_str("active"),
            Self::Propagated => f.write_str("propagated"),
            Self::Removed => f.write_str("removed"),
        }
    }
}

/// Propagation mask plus lifecycle, shared by all behavior variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BehaviorCore {
    accepted: EventMask,
    state: Lifecycle,
}

impl BehaviorCore {
    pub(crate) fn new(accepted: EventMask) -> Self {
        Self {
            accepted,
            state: Lifecycle::Uninitialized,
        }
    }

    pub(crate) fn accepted(&self) -> EventMask {
        self.accepted
    }

    pub(crate) fn state(&self) -> Lifecycle {
        self.state
    }

    /// Same mask, fresh lifecycle.
    pub(crate) fn derive(&self) -> Self {
        Self::new(self.accepted)
    }

    pub(crate) fn on_run(&mut self) {
        if self.state == Lifecycle::Uninitialized {
            self.state = Lifecycle::Active;
        }
    }

    pub(crate) fn on_propagated(&mut self) {
        if self.state == Lifecycle::Active {
            self.state = Lifecycle::Propagated;
        }
    }

    pub(crate) fn on_removed(&mut self) {
        self.state = Lifecycle::Removed;
    }
}
