//! Agent storage.

use neurite_core::{AgentId, AgentKind, AgentRef, AgentUid};
use neurite_growth::{Behavior, BehaviorList};
use slotmap::SlotMap;

use crate::neurite::NeuriteSegment;
use crate::soma::Soma;

/// Physical state of an agent.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// A cell body.
    Soma(Soma),
    /// A neurite segment.
    Neurite(NeuriteSegment),
}

impl Body {
    /// Variant tag.
    pub fn kind(&self) -> AgentKind {
        match self {
            Self::Soma(_) => AgentKind::Soma,
            Self::Neurite(_) => AgentKind::NeuriteSegment,
        }
    }

    /// The soma, if this is one.
    pub fn as_soma(&self) -> Option<&Soma> {
        match self {
            Self::Soma(s) => Some(s),
            Self::Neurite(_) => None,
        }
    }

    /// The segment, if this is one.
    pub fn as_neurite(&self) -> Option<&NeuriteSegment> {
        match self {
            Self::Neurite(n) => Some(n),
            Self::Soma(_) => None,
        }
    }

    pub(crate) fn as_soma_mut(&mut self) -> Option<&mut Soma> {
        match self {
            Self::Soma(s) => Some(s),
            Self::Neurite(_) => None,
        }
    }

    pub(crate) fn as_neurite_mut(&mut self) -> Option<&mut NeuriteSegment> {
        match self {
            Self::Neurite(n) => Some(n),
            Self::Soma(_) => None,
        }
    }

    /// Point every daughter reference equal to `from` at `to` instead.
    pub(crate) fn replace_daughter(&mut self, from: AgentRef, to: AgentRef) {
        match self {
            Self::Soma(s) => {
                for r in s.neurites_mut().iter_mut().filter(|r| **r == from) {
                    *r = to;
                }
            }
            Self::Neurite(n) => n.replace_daughter(from, to),
        }
    }

    /// Turn pending references into live handles using the ids assigned at
    /// commit, indexed by pending slot.
    pub(crate) fn resolve(&mut self, ids: &[AgentId]) {
        let live = |r: &mut AgentRef| {
            if let AgentRef::Pending(p) = *r {
                if let Some(&id) = ids.get(p.0 as usize) {
                    *r = AgentRef::Live(id);
                }
            }
        };
        match self {
            Self::Soma(s) => s.neurites_mut().iter_mut().for_each(live),
            Self::Neurite(n) => n.refs_mut().into_iter().flatten().for_each(live),
        }
    }
}

/// An agent: a body plus the behaviors attached to it.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    uid: AgentUid,
    pub(crate) body: Body,
    pub(crate) behaviors: BehaviorList,
}

impl Agent {
    /// Arena handle.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Serial number, assigned in creation order.
    pub fn uid(&self) -> AgentUid {
        self.uid
    }

    /// Variant tag.
    pub fn kind(&self) -> AgentKind {
        self.body.kind()
    }

    /// Physical state.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Attached behaviors, in attachment order.
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }
}

/// Dense agent storage with generational handles.
///
/// Iteration order is insertion order, which is deterministic for a given
/// seed. Agents are never removed.
#[derive(Clone, Debug, Default)]
pub(crate) struct AgentArena {
    slots: SlotMap<AgentId, usize>,
    agents: Vec<Agent>,
}

impl AgentArena {
    pub(crate) fn insert(&mut self, uid: AgentUid, body: Body, behaviors: BehaviorList) -> AgentId {
        let index = self.agents.len();
        let id = self.slots.insert(index);
        self.agents.push(Agent {
            id,
            uid,
            body,
            behaviors,
        });
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.agents.len()
    }

    pub(crate) fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots.get(id).map(|&i| &self.agents[i])
    }

    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.slots.get(id).map(|&i| &mut self.agents[i])
    }

    pub(crate) fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Agent] {
        &mut self.agents
    }
}
