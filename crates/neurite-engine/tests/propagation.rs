//! Integration test: behaviors follow structural events through the world
//! exactly as their event masks say.

use neurite_core::{AgentId, AgentRef, EventMask};
use neurite_engine::{SimConfig, World};
use neurite_field::{Axis, DiffusionGrid, Initializer, SubstanceRegistry};
use neurite_growth::{ApicalGrowth, BasalGrowth, Behavior, BehaviorKind, GrowDivide, Lifecycle};

fn fields() -> SubstanceRegistry {
    let mut fields = SubstanceRegistry::new();
    for (name, mean) in [("apical", 100.0), ("basal", -100.0)] {
        let grid = DiffusionGrid::builder(name)
            .bounds(-100.0, 100.0)
            .resolution(20)
            .initializer(Initializer::GaussianBand {
                mean,
                sigma: 50.0,
                axis: Axis::Z,
            })
            .build()
            .unwrap();
        fields.register(grid).unwrap();
    }
    fields
}

fn kinds(world: &World, id: AgentId) -> Vec<BehaviorKind> {
    world
        .agent(id)
        .unwrap()
        .behaviors()
        .iter()
        .map(Behavior::kind)
        .collect()
}

fn new_agents(world: &World, before: usize) -> Vec<AgentId> {
    world.agents().skip(before).map(|a| a.id()).collect()
}

#[test]
fn extension_carries_no_behaviors() {
    let mut world = World::new(SimConfig::with_seed(1), fields()).unwrap();
    let soma = world.add_soma([0.0; 3], 6.0);
    world.attach(soma, GrowDivide::default()).unwrap();
    let seg = world.extend_neurite(soma, [1.0, 0.0, 0.0]).unwrap();
    assert!(kinds(&world, seg).is_empty());
    assert_eq!(kinds(&world, soma), [BehaviorKind::GrowDivide]);
}

#[test]
fn branch_child_gets_fresh_apical_only() {
    let mut world = World::new(SimConfig::with_seed(2), fields()).unwrap();
    let soma = world.add_soma([0.0; 3], 6.0);
    let tip = world.extend_neurite(soma, [0.0, 0.0, 1.0]).unwrap();
    let always = ApicalGrowth::builder()
        .branch_probability(1.0)
        .build()
        .unwrap();
    world.attach(tip, always).unwrap();
    world.set_can_branch(tip, true).unwrap();

    let before = world.len();
    let m = world.step().clone();
    assert_eq!(m.branches, 1);
    // proximal piece from the split, then the side branch
    let created = new_agents(&world, before);
    assert_eq!(created.len(), 2);
    let (proximal, child) = (created[0], created[1]);

    assert!(kinds(&world, proximal).is_empty());
    assert_eq!(kinds(&world, child), [BehaviorKind::ApicalGrowth]);
    let copy = &world.agent(child).unwrap().behaviors()[0];
    assert_eq!(copy.state(), Lifecycle::Uninitialized);
    let source = &world.agent(tip).unwrap().behaviors()[0];
    assert_eq!(source.state(), Lifecycle::Propagated);

    let side = world.segment(child).unwrap();
    assert!(!side.can_branch());
    assert_eq!(side.diameter(), 0.65);
    assert_eq!(side.mother(), AgentRef::Live(proximal));
    let p = world.segment(proximal).unwrap();
    assert_eq!(p.daughter_left(), Some(AgentRef::Live(tip)));
    assert_eq!(p.daughter_right(), Some(AgentRef::Live(child)));
    assert_eq!(world.soma(soma).unwrap().neurites(), [AgentRef::Live(proximal)]);
}

#[test]
fn bifurcation_daughters_get_basal_only() {
    let mut world = World::new(SimConfig::with_seed(3), fields()).unwrap();
    let soma = world.add_soma([0.0; 3], 6.0);
    let tip = world.extend_neurite(soma, [0.0, 0.0, -1.0]).unwrap();
    let always = BasalGrowth::builder()
        .bifurcation_probability(1.0)
        .build()
        .unwrap();
    let silent = ApicalGrowth::builder()
        .substance("basal")
        .accepted_events(EventMask::empty())
        .build()
        .unwrap();
    world.attach(tip, always).unwrap();
    world.attach(tip, silent).unwrap();

    let before = world.len();
    world.step();
    let created = new_agents(&world, before);
    assert_eq!(created.len(), 2);
    for d in &created {
        assert_eq!(kinds(&world, *d), [BehaviorKind::BasalGrowth]);
        let seg = world.segment(*d).unwrap();
        assert!(seg.is_terminal());
        assert_eq!(seg.mother(), AgentRef::Live(tip));
    }
    let parent = world.segment(tip).unwrap();
    assert!(!parent.is_terminal());
    assert_eq!(parent.daughter_left(), Some(AgentRef::Live(created[0])));
    assert_eq!(parent.daughter_right(), Some(AgentRef::Live(created[1])));
}

#[test]
fn soma_behavior_never_lands_on_a_neurite() {
    let mut world = World::new(SimConfig::with_seed(4), fields()).unwrap();
    let soma = world.add_soma([0.0; 3], 6.0);
    let every = GrowDivide::builder()
        .accepted_events(EventMask::all())
        .build()
        .unwrap();
    world.attach(soma, every).unwrap();
    let seg = world.extend_neurite(soma, [1.0, 0.0, 0.0]).unwrap();
    assert!(world.attach(seg, GrowDivide::default()).is_err());
    assert!(kinds(&world, seg).is_empty());
    assert_eq!(kinds(&world, soma), [BehaviorKind::GrowDivide]);
    let m = world.step().clone();
    assert_eq!(m.behaviors_run, 1);
    assert_eq!(m.behaviors_skipped, 1);
}

#[test]
fn removed_behavior_does_not_propagate() {
    let mut world = World::new(SimConfig::with_seed(5), fields()).unwrap();
    let soma = world.add_soma([0.0; 3], 20.0);
    world.set_can_divide(soma, true).unwrap();
    world.attach(soma, GrowDivide::default()).unwrap();
    let removed = world
        .remove_behavior(soma, BehaviorKind::GrowDivide)
        .unwrap()
        .unwrap();
    assert_eq!(removed.state(), Lifecycle::Removed);
    world.run(3);
    assert_eq!(world.len(), 1);
}
