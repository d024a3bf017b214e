//! Structural events and the per-behavior event mask.
//!
//! A structural event is raised whenever an agent gives rise to new agents
//! (division, neurite extension, side branch, bifurcation, segment split).
//! Each behavior carries an [`EventMask`]; the propagation protocol copies
//! a behavior onto the derived agents only if the event's kind is in it.

use crate::id::AgentRef;
use smallvec::SmallVec;
use std::fmt;

/// Kind of structural event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    /// A soma divided into mother and daughter.
    Division = 0,
    /// A soma extended a new neurite.
    Extension = 1,
    /// A neurite segment grew a side branch.
    Branch = 2,
    /// A terminal segment split into two terminal daughters.
    Bifurcation = 3,
    /// A long segment was discretized into a proximal and distal part.
    Split = 4,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Division,
        EventKind::Extension,
        EventKind::Branch,
        EventKind::Bifurcation,
        EventKind::Split,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Division => "division",
            Self::Extension => "extension",
            Self::Branch => "branch",
            Self::Bifurcation => "bifurcation",
            Self::Split => "split",
        };
        f.write_str(name)
    }
}

/// Set of event kinds for which a behavior is propagated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventMask(u8);

impl EventMask {
    /// No event propagates the behavior.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every event propagates the behavior.
    ///
    /// Only for variants that explicitly opt in; the growth variants do not.
    pub fn all() -> Self {
        Self::of(&EventKind::ALL)
    }

    /// Mask containing exactly `kinds`.
    pub fn of(kinds: &[EventKind]) -> Self {
        let mut mask = Self::empty();
        for &k in kinds {
            mask.insert(k);
        }
        mask
    }

    /// Add `kind` to the mask.
    pub fn insert(&mut self, kind: EventKind) {
        self.0 |= kind.bit();
    }

    /// Remove `kind` from the mask.
    pub fn remove(&mut self, kind: EventKind) {
        self.0 &= !kind.bit();
    }

    /// Whether `kind` is in the mask.
    pub fn contains(&self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Whether the mask is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the kinds in the mask in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = EventKind> {
        let mask = *self;
        EventKind::ALL.into_iter().filter(move |k| mask.contains(*k))
    }
}

impl fmt::Debug for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<EventKind> for EventMask {
    fn from_iter<I: IntoIterator<Item = EventKind>>(iter: I) -> Self {
        let mut mask = Self::empty();
        for k in iter {
            mask.insert(k);
        }
        mask
    }
}

/// A structural event raised by an agent.
///
/// Consumed synchronously by the propagation protocol at the moment it is
/// raised; never queued across steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralEvent {
    /// What happened.
    pub kind: EventKind,
    /// The agent the event originated from.
    pub source: AgentRef,
    /// The agents created by the event, in creation order.
    pub derived: SmallVec<[AgentRef; 2]>,
}

impl StructuralEvent {
    /// Event with a single derived agent.
    pub fn new(kind: EventKind, source: AgentRef, derived: AgentRef) -> Self {
        let mut d = SmallVec::new();
        d.push(derived);
        Self {
            kind,
            source,
            derived: d,
        }
    }

    /// Event with two derived agents (bifurcation).
    pub fn pair(kind: EventKind, source: AgentRef, first: AgentRef, second: AgentRef) -> Self {
        let mut d = SmallVec::new();
        d.push(first);
        d.push(second);
        Self {
            kind,
            source,
            derived: d,
        }
    }
}
