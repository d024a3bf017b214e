//! Deferred agent creation.
//!
//! While an agent runs, everything it creates goes into its own
//! [`SpawnBuffer`] and is addressed by [`PendingAgent`] index. Edits to
//! *other* live agents (a mother whose daughter was split off) are
//! recorded as relinks. The world commits buffers in agent order once all
//! agents have run, so no agent ever observes a sibling's creations
//! mid-step.

use neurite_core::{AgentId, AgentKind, AgentRef, PendingAgent, StructuralEvent};
use neurite_growth::{Behavior, BehaviorList};

use crate::agent::Body;

/// An agent waiting to be inserted.
#[derive(Clone, Debug)]
pub(crate) struct Spawn {
    pub(crate) body: Body,
    pub(crate) behaviors: BehaviorList,
}

/// A reference held by a live agent that must be redirected at commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Relink {
    pub(crate) mother: AgentId,
    pub(crate) from: AgentRef,
    pub(crate) to: PendingAgent,
}

/// Creations and events produced by one agent in one step.
#[derive(Clone, Debug, Default)]
pub(crate) struct SpawnBuffer {
    spawns: Vec<Spawn>,
    events: Vec<StructuralEvent>,
    relinks: Vec<Relink>,
}

impl SpawnBuffer {
    /// Queue a new agent with no behaviors.
    pub(crate) fn push(&mut self, body: Body) -> PendingAgent {
        let index = self.spawns.len() as u32;
        self.spawns.push(Spawn {
            body,
            behaviors: BehaviorList::new(),
        });
        PendingAgent(index)
    }

    /// Record a structural event for propagation.
    pub(crate) fn raise(&mut self, event: StructuralEvent) {
        self.events.push(event);
    }

    #[cfg(test)]
    pub(crate) fn body(&self, agent: PendingAgent) -> Option<&Body> {
        self.spawns.get(agent.0 as usize).map(|s| &s.body)
    }

    pub(crate) fn body_mut(&mut self, agent: PendingAgent) -> Option<&mut Body> {
        self.spawns.get_mut(agent.0 as usize).map(|s| &mut s.body)
    }

    /// Events raised but not yet propagated.
    #[cfg(test)]
    pub(crate) fn pending_events(&self) -> &[StructuralEvent] {
        &self.events
    }

    #[cfg(test)]
    pub(crate) fn relink_count(&self) -> usize {
        self.relinks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.relinks.is_empty()
    }

    /// Redirect `mother`'s reference to `from` so it points at `to`.
    ///
    /// A pending mother is patched in place; a live one is patched when
    /// the buffer is committed.
    pub(crate) fn relink(&mut self, mother: AgentRef, from: AgentRef, to: PendingAgent) {
        match mother {
            AgentRef::Pending(p) => {
                if let Some(body) = self.body_mut(p) {
                    body.replace_daughter(from, AgentRef::Pending(to));
                }
            }
            AgentRef::Live(mother) => self.relinks.push(Relink { mother, from, to }),
        }
    }

    /// Offer every pending event to `behaviors`, appending the resulting
    /// copies to the derived spawns that can run them.
    pub(crate) fn propagate(&mut self, behaviors: &mut [Behavior]) {
        for event in std::mem::take(&mut self.events) {
            let slots: Vec<usize> = event
                .derived
                .iter()
                .filter_map(|d| d.pending())
                .map(|p| p.0 as usize)
                .filter(|&i| i < self.spawns.len())
                .collect();
            let targets: Vec<AgentKind> =
                slots.iter().map(|&i| self.spawns[i].body.kind()).collect();
            let lists = neurite_growth::propagate(&event, &targets, behaviors);
            for (&i, list) in slots.iter().zip(lists) {
                self.spawns[i].behaviors.extend(list);
            }
        }
    }

    /// Hand over the queued agents and relinks.
    pub(crate) fn into_parts(self) -> (Vec<Spawn>, Vec<Relink>) {
        (self.spawns, self.relinks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neurite::NeuriteSegment;
    use crate::soma::Soma;
    use neurite_core::{EventKind, EventMask};
    use neurite_growth::{BehaviorKind, GrowDivide};
    use slotmap::SlotMap;

    fn segment(mother: AgentRef) -> Body {
        Body::Neurite(NeuriteSegment::new([0.0; 3], [0.0, 0.0, 1.0], 1.0, mother))
    }

    #[test]
    fn pending_indices_follow_push_order() {
        let mut buffer = SpawnBuffer::default();
        let a = buffer.push(Body::Soma(Soma::new([0.0; 3], 1.0)));
        let b = buffer.push(Body::Soma(Soma::new([1.0; 3], 1.0)));
        assert_eq!((a, b), (PendingAgent(0), PendingAgent(1)));
        assert_eq!(buffer.body(b).and_then(Body::as_soma).map(Soma::position), Some([1.0; 3]));
        assert!(buffer.body(PendingAgent(2)).is_none());
    }

    #[test]
    fn live_mother_is_deferred() {
        let mut ids = SlotMap::<AgentId, ()>::with_key();
        let (mother, me) = (ids.insert(()), ids.insert(()));
        let mut buffer = SpawnBuffer::default();
        let p = buffer.push(segment(AgentRef::Live(mother)));
        buffer.relink(AgentRef::Live(mother), AgentRef::Live(me), p);
        let (_, relinks) = buffer.into_parts();
        assert_eq!(
            relinks,
            [Relink {
                mother,
                from: AgentRef::Live(me),
                to: p
            }]
        );
    }

    #[test]
    fn pending_mother_is_patched_in_place() {
        let mut ids = SlotMap::<AgentId, ()>::with_key();
        let me = ids.insert(());
        let mut buffer = SpawnBuffer::default();
        let mut soma = Soma::new([0.0; 3], 1.0);
        soma.neurites_mut().push(AgentRef::Live(me));
        let m = buffer.push(Body::Soma(soma));
        let p = buffer.push(segment(AgentRef::Pending(m)));
        buffer.relink(AgentRef::Pending(m), AgentRef::Live(me), p);
        let soma = buffer.body(m).and_then(Body::as_soma).unwrap();
        assert_eq!(soma.neurites(), [AgentRef::Pending(p)]);
        assert_eq!(buffer.relink_count(), 0);
    }

    #[test]
    fn propagation_fills_derived_spawns() {
        let mut buffer = SpawnBuffer::default();
        let p = buffer.push(Body::Soma(Soma::new([0.0; 3], 1.0)));
        buffer.raise(StructuralEvent::new(
            EventKind::Division,
            AgentRef::Pending(PendingAgent(99)),
            AgentRef::Pending(p),
        ));
        let mut source = [Behavior::fresh(BehaviorKind::GrowDivide)];
        buffer.propagate(&mut source);
        assert!(buffer.pending_events().is_empty());
        let (spawns, _) = buffer.into_parts();
        let kinds: Vec<_> = spawns[0].behaviors.iter().map(Behavior::kind).collect();
        assert_eq!(kinds, [BehaviorKind::GrowDivide]);
    }

    #[test]
    fn propagation_skips_spawns_of_the_wrong_kind() {
        let mut buffer = SpawnBuffer::default();
        let p = buffer.push(segment(AgentRef::Live(AgentId::default())));
        buffer.raise(StructuralEvent::new(
            EventKind::Extension,
            AgentRef::Pending(PendingAgent(99)),
            AgentRef::Pending(p),
        ));
        let every = GrowDivide::builder()
            .accepted_events(EventMask::all())
            .build()
            .unwrap();
        let mut source = [Behavior::from(every)];
        buffer.propagate(&mut source);
        let (spawns, _) = buffer.into_parts();
        assert!(spawns[0].behaviors.is_empty());
    }
}
