//! Behavior propagation onto derived agents.
//!
//! When an agent raises a [`StructuralEvent`], every behavior on the
//! source agent is offered the event in list order. Accepting behaviors
//! produce one fresh copy per derived agent they can run on; the copies
//! are collected into one list per derived agent, in the source list's
//! order. Behaviors whose mask rejects the event stay on the source only,
//! and a copy is never handed to an agent of a kind it cannot run on.

use neurite_core::{AgentKind, AttachError, StructuralEvent};
use smallvec::SmallVec;

use crate::behavior::{Behavior, BehaviorKind};

/// Behaviors attached to one agent, in attachment order.
pub type BehaviorList = SmallVec<[Behavior; 2]>;

/// Run the propagation protocol for `event` over the source's behaviors.
///
/// `targets` holds the kind of each derived agent. Returns one list per
/// entry of `targets`, in the same order.
pub fn propagate(
    event: &StructuralEvent,
    targets: &[AgentKind],
    source: &mut [Behavior],
) -> SmallVec<[BehaviorList; 2]> {
    let mut lists: SmallVec<[BehaviorList; 2]> =
        targets.iter().map(|_| BehaviorList::new()).collect();
    for behavior in source.iter_mut() {
        let copies: SmallVec<[Option<Behavior>; 2]> = targets
            .iter()
            .map(|&kind| {
                behavior
                    .instance_for(event)
                    .filter(|copy| copy.compatible_with(kind))
            })
            .collect();
        {
            let refs: SmallVec<[&Behavior; 2]> = copies.iter().flatten().collect();
            behavior.handle_event(event, &refs);
        }
        for (list, copy) in lists.iter_mut().zip(copies) {
            list.extend(copy);
        }
    }
    lists
}

/// Append `behavior` to an agent's list after checking compatibility.
///
/// # Errors
///
/// Returns [`AttachError::IncompatibleAgent`] if the behavior cannot run on
/// an agent of kind `agent`.
pub fn attach(
    list: &mut BehaviorList,
    agent: AgentKind,
    behavior: Behavior,
) -> Result<(), AttachError> {
    if !behavior.compatible_with(agent) {
        return Err(AttachError::IncompatibleAgent {
            behavior: behavior.name(),
            agent,
        });
    }
    list.push(behavior);
    Ok(())
}

/// Detach the first behavior of `kind`, marking it `Removed`.
pub fn remove(list: &mut BehaviorList, kind: BehaviorKind) -> Option<Behavior> {
    let index = list.iter().position(|b| b.kind() == kind)?;
    let mut removed = list.remove(index);
    removed.mark_removed();
    Some(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Lifecycle;
    use crate::GrowDivide;
    use neurite_core::{AgentRef, EventKind, EventMask, PendingAgent};

    fn event(kind: EventKind) -> StructuralEvent {
        StructuralEvent::new(
            kind,
            AgentRef::Pending(PendingAgent(7)),
            AgentRef::Pending(PendingAgent(0)),
        )
    }

    #[test]
    fn accepted_behaviors_follow_in_order() {
        let mut source: BehaviorList = [
            Behavior::fresh(BehaviorKind::ApicalGrowth),
            Behavior::fresh(BehaviorKind::BasalGrowth),
        ]
        .into_iter()
        .collect();
        let lists = propagate(&event(EventKind::Branch), &[AgentKind::NeuriteSegment], &mut source);
        assert_eq!(lists.len(), 1);
        let kinds: Vec<_> = lists[0].iter().map(Behavior::kind).collect();
        assert_eq!(kinds, [BehaviorKind::ApicalGrowth, BehaviorKind::BasalGrowth]);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn rejected_behavior_stays_on_source() {
        let mut source: BehaviorList = [
            Behavior::fresh(BehaviorKind::ApicalGrowth),
            Behavior::fresh(BehaviorKind::GrowDivide),
        ]
        .into_iter()
        .collect();
        let lists = propagate(&event(EventKind::Division), &[AgentKind::Soma], &mut source);
        let kinds: Vec<_> = lists[0].iter().map(Behavior::kind).collect();
        assert_eq!(kinds, [BehaviorKind::GrowDivide]);
    }

    #[test]
    fn pair_event_yields_two_lists() {
        let mut source: BehaviorList = [Behavior::fresh(BehaviorKind::BasalGrowth)]
            .into_iter()
            .collect();
        let ev = StructuralEvent::pair(
            EventKind::Bifurcation,
            AgentRef::Pending(PendingAgent(9)),
            AgentRef::Pending(PendingAgent(0)),
            AgentRef::Pending(PendingAgent(1)),
        );
        let lists = propagate(&ev, &[AgentKind::NeuriteSegment; 2], &mut source);
        assert_eq!(lists.len(), 2);
        assert!(lists.iter().all(|l| l.len() == 1));
        assert!(lists
            .iter()
            .all(|l| l[0].state() == Lifecycle::Uninitialized));
    }

    #[test]
    fn nothing_propagates_on_extension() {
        let mut source: BehaviorList = [
            Behavior::fresh(BehaviorKind::ApicalGrowth),
            Behavior::fresh(BehaviorKind::BasalGrowth),
            Behavior::fresh(BehaviorKind::GrowDivide),
        ]
        .into_iter()
        .collect();
        let lists = propagate(&event(EventKind::Extension), &[AgentKind::NeuriteSegment], &mut source);
        assert!(lists[0].is_empty());
    }

    #[test]
    fn copy_never_lands_on_incompatible_kind() {
        let every = GrowDivide::builder()
            .accepted_events(EventMask::all())
            .build()
            .unwrap();
        let mut source: BehaviorList = [Behavior::from(every)].into_iter().collect();
        let lists = propagate(
            &event(EventKind::Extension),
            &[AgentKind::NeuriteSegment],
            &mut source,
        );
        assert!(lists[0].is_empty());
        assert_eq!(source[0].state(), Lifecycle::Uninitialized);

        let lists = propagate(&event(EventKind::Division), &[AgentKind::Soma], &mut source);
        assert_eq!(lists[0].len(), 1);
    }

    #[test]
    fn attach_checks_agent_kind() {
        let mut list = BehaviorList::new();
        let err = attach(
            &mut list,
            AgentKind::NeuriteSegment,
            Behavior::fresh(BehaviorKind::GrowDivide),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AttachError::IncompatibleAgent {
                behavior: "grow_divide",
                agent: AgentKind::NeuriteSegment,
            }
        );
        assert!(list.is_empty());
        attach(
            &mut list,
            AgentKind::NeuriteSegment,
            Behavior::fresh(BehaviorKind::BasalGrowth),
        )
        .unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_marks_and_detaches() {
        let mut list: BehaviorList = [
            Behavior::fresh(BehaviorKind::GrowDivide),
            Behavior::fresh(BehaviorKind::GrowDivide),
        ]
        .into_iter()
        .collect();
        let removed = remove(&mut list, BehaviorKind::GrowDivide).unwrap();
        assert_eq!(removed.state(), Lifecycle::Removed);
        assert_eq!(list.len(), 1);
        assert!(remove(&mut list, BehaviorKind::ApicalGrowth).is_none());
    }
}
