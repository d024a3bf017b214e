//! Integration test: identical seeds give identical morphologies.
//!
//! Runs the pyramidal-cell scenario with aggressive branching and
//! bifurcation so that every structural operation occurs, then compares
//! the full agent state of two runs.

use neurite_engine::{Body, PyramidalCell, SimConfig, World};
use neurite_growth::{ApicalGrowth, BasalGrowth, BehaviorKind};

fn snapshot(world: &World) -> Vec<(Body, Vec<BehaviorKind>)> {
    world
        .agents()
        .map(|a| {
            let kinds = a.behaviors().iter().map(|b| b.kind()).collect();
            (a.body().clone(), kinds)
        })
        .collect()
}

fn bushy_world(seed: u64) -> World {
    let scenario = PyramidalCell {
        config: SimConfig {
            neurite_max_length: 2.0,
            ..SimConfig::with_seed(seed)
        },
        growth_steps: 0,
        ..PyramidalCell::default()
    };
    let mut run = scenario.run().unwrap();
    let apical = ApicalGrowth::builder()
        .branch_probability(0.5)
        .build()
        .unwrap();
    let basal = BasalGrowth::builder()
        .bifurcation_probability(0.05)
        .min_diameter(0.1)
        .build()
        .unwrap();
    run.world
        .remove_behavior(run.apical, BehaviorKind::ApicalGrowth)
        .unwrap();
    run.world
        .remove_behavior(run.basal, BehaviorKind::BasalGrowth)
        .unwrap();
    run.world.attach(run.apical, apical).unwrap();
    run.world.attach(run.basal, basal).unwrap();
    run.world.run(40);
    run.world
}

#[test]
fn same_seed_same_state() {
    let a = bushy_world(42);
    let b = bushy_world(42);
    assert!(a.len() > 10, "expected a branched tree, got {} agents", a.len());
    assert_eq!(snapshot(&a), snapshot(&b));
    assert_eq!(a.last_metrics().agents_created, b.last_metrics().agents_created);
}

#[test]
fn different_seed_different_state() {
    let a = bushy_world(1);
    let b = bushy_world(2);
    assert_ne!(snapshot(&a), snapshot(&b));
}

#[test]
fn every_structural_operation_occurs() {
    let mut world = bushy_world(7);
    let mut branches = 0;
    let mut bifurcations = 0;
    let mut splits = 0;
    for _ in 0..20 {
        let m = world.step();
        branches += m.branches;
        bifurcations += m.bifurcations;
        splits += m.splits;
    }
    assert!(branches > 0);
    assert!(bifurcations > 0);
    assert!(splits > 0);
}
