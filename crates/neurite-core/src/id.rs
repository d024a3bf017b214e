//! Strongly-typed identifiers for agents, substances, and ticks.

use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Stable generational handle for an agent stored in the world arena.
    ///
    /// Handles stay valid while the agent lives; a handle to a removed
    /// agent never aliases a newer agent in the same slot.
    pub struct AgentId;
}

/// Monotonic per-world agent serial number.
///
/// Assigned in commit order when an agent is inserted, so it is identical
/// across runs with the same seed. Used to derive per-agent random streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentUid(pub u64);

impl fmt::Display for AgentUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentUid {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a registered chemical substance (a gradient field).
///
/// `SubstanceId(n)` is the n-th substance registered with the field manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubstanceId(pub u32);

impl fmt::Display for SubstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SubstanceId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// An agent whose creation was requested during the current step.
///
/// The index is local to the requesting agent's spawn buffer. The world
/// resolves it to an [`AgentId`] when the step commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PendingAgent(pub u32);

impl fmt::Display for PendingAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending#{}", self.0)
    }
}

/// Reference to another agent, either already stored or still pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentRef {
    /// An agent present in the world arena.
    Live(AgentId),
    /// An agent created this step that has not been committed yet.
    Pending(PendingAgent),
}

impl AgentRef {
    /// The live handle, if this reference is already resolved.
    pub fn live(self) -> Option<AgentId> {
        match self {
            Self::Live(id) => Some(id),
            Self::Pending(_) => None,
        }
    }

    /// The pending handle, if this reference is still unresolved.
    pub fn pending(self) -> Option<PendingAgent> {
        match self {
            Self::Live(_) => None,
            Self::Pending(p) => Some(p),
        }
    }
}

impl From<AgentId> for AgentRef {
    fn from(id: AgentId) -> Self {
        Self::Live(id)
    }
}

impl From<PendingAgent> for AgentRef {
    fn from(p: PendingAgent) -> Self {
        Self::Pending(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn agent_ref_accessors() {
        let mut map: SlotMap<AgentId, ()> = SlotMap::with_key();
        let id = map.insert(());
        assert_eq!(AgentRef::from(id).live(), Some(id));
        assert_eq!(AgentRef::from(id).pending(), None);

        let p = PendingAgent(3);
        assert_eq!(AgentRef::from(p).pending(), Some(p));
        assert_eq!(AgentRef::from(p).live(), None);
    }

    #[test]
    fn stale_handle_does_not_alias() {
        let mut map: SlotMap<AgentId, u32> = SlotMap::with_key();
        let a = map.insert(1);
        map.remove(a);
        let b = map.insert(2);
        assert_ne!(a, b);
        assert!(map.get(a).is_none());
    }

    #[test]
    fn display_formats() {
        assert_eq!(AgentUid(7).to_string(), "7");
        assert_eq!(SubstanceId(2).to_string(), "2");
        assert_eq!(TickId(9).to_string(), "9");
        assert_eq!(PendingAgent(1).to_string(), "pending#1");
    }
}
