//! Benchmark profiles for the neurite growth engine.
//!
//! - [`reference_profile`]: one pyramidal cell, default constants
//! - [`forest_profile`]: a grid of cells with branch-heavy dendrites

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use neurite_engine::{PyramidalCell, SimConfig, World, WorldError};
use neurite_growth::{ApicalGrowth, BasalGrowth};

/// A single pyramidal cell, ready to grow, with `steps` steps already run.
///
/// # Errors
///
/// Returns `Err` if the scenario cannot be built.
pub fn reference_profile(seed: u64, steps: u64) -> Result<World, WorldError> {
    let scenario = PyramidalCell {
        config: SimConfig::with_seed(seed),
        growth_steps: steps,
        ..PyramidalCell::default()
    };
    Ok(scenario.run()?.world)
}

/// `side * side` cells on a 20-unit lattice in the xy plane, each with an
/// apical dendrite that branches often and a basal dendrite that
/// bifurcates often.
///
/// # Errors
///
/// Returns `Err` if the substance grids or behaviors cannot be built.
pub fn forest_profile(seed: u64, side: usize) -> Result<World, Box<dyn Error>> {
    let scenario = PyramidalCell {
        config: SimConfig::with_seed(seed),
        ..PyramidalCell::default()
    };
    let mut world = World::new(scenario.config.clone(), scenario.substances()?)?;
    let apical = ApicalGrowth::builder()
        .branch_probability(0.2)
        .build()?;
    let basal = BasalGrowth::builder()
        .bifurcation_probability(0.05)
        .build()?;
    let offset = (side as f64 - 1.0) * 10.0;
    for i in 0..side {
        for j in 0..side {
            let position = [i as f64 * 20.0 - offset, j as f64 * 20.0 - offset, 0.0];
            let soma = world.add_soma(position, 6.0);
            let up = world.extend_neurite(soma, [0.0, 0.0, 1.0])?;
            world.attach(up, apical.clone())?;
            world.set_can_branch(up, true)?;
            let down = world.extend_neurite(soma, [0.0, 0.0, -1.0])?;
            world.attach(down, basal.clone())?;
        }
    }
    Ok(world)
}
