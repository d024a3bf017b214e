//! Reference scenario: one pyramidal cell.
//!
//! A soma at the origin optionally grows and divides for a while, then
//! loses its division behavior and extends an apical dendrite along +z
//! and a basal dendrite along -z. The dendrites are guided by two static
//! substances, `apical` peaking above the soma and `basal` peaking below.

use neurite_core::AgentId;
use neurite_field::{Axis, DiffusionGrid, Initializer, SubstanceRegistry};
use neurite_growth::{ApicalGrowth, BasalGrowth, BehaviorKind, GrowDivide};
use tracing::info;

use crate::config::SimConfig;
use crate::error::WorldError;
use crate::world::World;

/// Parameters of the pyramidal-cell scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct PyramidalCell {
    /// World configuration.
    pub config: SimConfig,
    /// Initial soma diameter. Default: 6.
    pub soma_diameter: f64,
    /// Steps of grow/divide before the dendrites appear. Default: 0.
    pub division_steps: u64,
    /// Steps of dendrite growth. Default: 10.
    pub growth_steps: u64,
    /// Bounds of the substance grids along every axis. Default: -100..100.
    pub field_bounds: (f64, f64),
    /// Boxes per axis of the substance grids. Default: 20.
    pub field_resolution: usize,
}

impl Default for PyramidalCell {
    fn default() -> Self {
        Self {
            config: SimConfig::default(),
            soma_diameter: 6.0,
            division_steps: 0,
            growth_steps: 10,
            field_bounds: (-100.0, 100.0),
            field_resolution: 20,
        }
    }
}

/// Handles into a finished scenario.
#[derive(Debug)]
pub struct PyramidalRun {
    /// The world after the last step.
    pub world: World,
    /// The original soma.
    pub soma: AgentId,
    /// First segment of the apical dendrite.
    pub apical: AgentId,
    /// First segment of the basal dendrite.
    pub basal: AgentId,
}

impl PyramidalCell {
    /// Build the `apical` and `basal` substance grids.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Field`] if the bounds or resolution are invalid.
    pub fn substances(&self) -> Result<SubstanceRegistry, WorldError> {
        let (min, max) = self.field_bounds;
        let sigma = (max - min) / 4.0;
        let mut fields = SubstanceRegistry::new();
        for (name, mean) in [("apical", max), ("basal", min)] {
            let grid = DiffusionGrid::builder(name)
                .bounds(min, max)
                .resolution(self.field_resolution)
                .initializer(Initializer::GaussianBand {
                    mean,
                    sigma,
                    axis: Axis::Z,
                })
                .build()?;
            fields.register(grid)?;
        }
        Ok(fields)
    }

    /// Run both phases.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration or substance grids are invalid.
    pub fn run(&self) -> Result<PyramidalRun, WorldError> {
        let mut world = World::new(self.config.clone(), self.substances()?)?;
        let soma = world.add_soma([0.0; 3], self.soma_diameter);
        world.set_can_divide(soma, true)?;
        world.attach(soma, GrowDivide::default())?;

        if self.division_steps > 0 {
            info!(steps = self.division_steps, "division phase");
            world.run(self.division_steps);
        }
        let somas: Vec<AgentId> = world
            .agents()
            .filter(|a| a.body().as_soma().is_some())
            .map(|a| a.id())
            .collect();
        for id in &somas {
            world.remove_behavior(*id, BehaviorKind::GrowDivide)?;
        }

        info!(
            somas = somas.len(),
            steps = self.growth_steps,
            "dendrite growth phase"
        );
        let apical = world.extend_neurite(soma, [0.0, 0.0, 1.0])?;
        world.attach(apical, ApicalGrowth::default())?;
        world.set_can_branch(apical, true)?;
        let basal = world.extend_neurite(soma, [0.0, 0.0, -1.0])?;
        world.attach(basal, BasalGrowth::default())?;
        world.run(self.growth_steps);

        info!(
            agents = world.len(),
            tick = world.current_tick().0,
            "scenario complete"
        );
        Ok(PyramidalRun {
            world,
            soma,
            apical,
            basal,
        })
    }
}
