//! The simulation world and its step loop.
//!
//! [`World`] owns the agents, the substance grids, and the configuration.
//! One [`step()`](World::step) runs, in order:
//!
//! 1. every behavior of every agent that existed when the step began, in
//!    agent order, with creations queued per agent;
//! 2. the commit of all queued agents, in agent order;
//! 3. discretization of terminal segments that grew past the maximum
//!    length;
//! 4. one diffusion step of every substance grid.
//!
//! Each agent draws from its own random streams, so the result of a step
//! does not depend on whether agents run sequentially or in parallel.

use std::time::Instant;

use neurite_core::math::norm;
use neurite_core::{AgentId, AgentKind, AgentRef, AgentUid, SubstanceId, TickId, Vec3};
use neurite_field::{DiffusionGrid, SubstanceRegistry};
use neurite_growth::{propagation, Behavior, BehaviorKind, BehaviorList};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::agent::{Agent, AgentArena, Body};
use crate::config::SimConfig;
use crate::context::AgentContext;
use crate::error::WorldError;
use crate::metrics::StepMetrics;
use crate::neurite::NeuriteSegment;
use crate::rng::{AgentRng, RngStream};
use crate::soma::Soma;
use crate::spawn::SpawnBuffer;

/// A population of somas and neurite segments growing in substance fields.
///
/// # Examples
///
/// ```
/// use neurite_engine::{SimConfig, World};
/// use neurite_field::{DiffusionGrid, SubstanceRegistry};
///
/// let mut world = World::new(SimConfig::with_seed(1), SubstanceRegistry::new()).unwrap();
/// let soma = world.add_soma([0.0; 3], 10.0);
/// let tip = world.extend_neurite(soma, [0.0, 0.0, 1.0]).unwrap();
/// world.run(3);
/// assert_eq!(world.len(), 2);
/// assert!(world.segment(tip).is_some());
/// ```
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    fields: SubstanceRegistry,
    arena: AgentArena,
    tick: TickId,
    next_uid: u64,
    last_metrics: StepMetrics,
}

impl World {
    /// Create an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] if the configuration is invalid, or
    /// [`WorldError::Field`] if a substance grid would be numerically
    /// unstable at the configured `dt`.
    pub fn new(config: SimConfig, fields: SubstanceRegistry) -> Result<Self, WorldError> {
        config.validate()?;
        fields.check_stable(config.dt)?;
        debug!(seed = config.seed, dt = config.dt, substances = fields.len(), "world created");
        Ok(Self {
            config,
            fields,
            arena: AgentArena::default(),
            tick: TickId(0),
            next_uid: 0,
            last_metrics: StepMetrics::default(),
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The substance grids.
    pub fn fields(&self) -> &SubstanceRegistry {
        &self.fields
    }

    /// Mutable access to one substance grid, e.g. to inject a source.
    ///
    /// Only concentrations can be edited; the set of grids and their
    /// stability under `dt` are fixed by [`World::new`].
    pub fn grid_mut(&mut self, id: SubstanceId) -> Option<&mut DiffusionGrid> {
        self.fields.grid_mut(id)
    }

    /// Number of completed steps.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// Counters and timings of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the world holds no agents.
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Look up an agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.arena.get(id)
    }

    /// All agents, in creation order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.arena.as_slice().iter()
    }

    /// Look up a soma.
    pub fn soma(&self, id: AgentId) -> Option<&Soma> {
        self.arena.get(id).and_then(|a| a.body.as_soma())
    }

    /// Look up a neurite segment.
    pub fn segment(&self, id: AgentId) -> Option<&NeuriteSegment> {
        self.arena.get(id).and_then(|a| a.body.as_neurite())
    }

    /// Terminal segments, in creation order.
    pub fn terminals(&self) -> impl Iterator<Item = (AgentId, &NeuriteSegment)> {
        self.agents().filter_map(|a| {
            a.body
                .as_neurite()
                .filter(|n| n.is_terminal())
                .map(|n| (a.id(), n))
        })
    }

    // ── Population ─────────────────────────────────────────────────

    /// Add a soma with no behaviors. Division is disabled until
    /// [`set_can_divide`](Self::set_can_divide) is called.
    pub fn add_soma(&mut self, position: Vec3, diameter: f64) -> AgentId {
        let uid = self.allocate_uid();
        self.arena.insert(
            uid,
            Body::Soma(Soma::new(position, diameter)),
            BehaviorList::new(),
        )
    }

    /// Grow a new neurite out of `soma`, heading along `direction`.
    ///
    /// The soma's behaviors are offered an `Extension` event; with the
    /// default masks none of them follow.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDirection`] for a zero or non-finite
    /// direction, [`WorldError::UnknownAgent`] if `soma` is not live, and
    /// [`WorldError::WrongAgentKind`] if it is not a soma.
    pub fn extend_neurite(&mut self, soma: AgentId, direction: Vec3) -> Result<AgentId, WorldError> {
        if !direction.iter().all(|c| c.is_finite()) || norm(direction) == 0.0 {
            return Err(WorldError::InvalidDirection);
        }
        let agent = self
            .arena
            .get_mut(soma)
            .ok_or(WorldError::UnknownAgent(soma))?;
        let body = agent.body.as_soma_mut().ok_or(WorldError::WrongAgentKind {
            agent: soma,
            expected: AgentKind::Soma,
        })?;
        let mut buffer = SpawnBuffer::default();
        let pending = body.extend_new_neurite(soma, direction, &self.config, &mut buffer);
        buffer.propagate(&mut agent.behaviors);
        let ids = self.commit(soma, buffer);
        Ok(ids[pending.0 as usize])
    }

    /// Allow or forbid `soma` to divide.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `soma` is not a live soma.
    pub fn set_can_divide(&mut self, soma: AgentId, can_divide: bool) -> Result<(), WorldError> {
        self.body_mut(soma, AgentKind::Soma)?
            .as_soma_mut()
            .map(|s| s.set_can_divide(can_divide))
            .ok_or(WorldError::UnknownAgent(soma))
    }

    /// Allow or forbid side branches on `segment`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `segment` is not a live neurite segment.
    pub fn set_can_branch(&mut self, segment: AgentId, can_branch: bool) -> Result<(), WorldError> {
        self.body_mut(segment, AgentKind::NeuriteSegment)?
            .as_neurite_mut()
            .map(|n| n.set_can_branch(can_branch))
            .ok_or(WorldError::UnknownAgent(segment))
    }

    /// Attach a behavior to the end of `agent`'s list.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAgent`] if `agent` is not live, or
    /// [`WorldError::Attach`] if the behavior cannot run on it.
    pub fn attach(&mut self, agent: AgentId, behavior: impl Into<Behavior>) -> Result<(), WorldError> {
        let a = self
            .arena
            .get_mut(agent)
            .ok_or(WorldError::UnknownAgent(agent))?;
        let kind = a.kind();
        propagation::attach(&mut a.behaviors, kind, behavior.into())?;
        Ok(())
    }

    /// Detach the first behavior of `kind` from `agent`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAgent`] if `agent` is not live.
    pub fn remove_behavior(
        &mut self,
        agent: AgentId,
        kind: BehaviorKind,
    ) -> Result<Option<Behavior>, WorldError> {
        let a = self
            .arena
            .get_mut(agent)
            .ok_or(WorldError::UnknownAgent(agent))?;
        Ok(propagation::remove(&mut a.behaviors, kind))
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Advance the simulation by one step.
    pub fn step(&mut self) -> &StepMetrics {
        let step_start = Instant::now();
        let mut metrics = StepMetrics::default();

        // 1. Run behaviors.
        let behavior_start = Instant::now();
        let results = self.run_behaviors();
        metrics.behavior_us = behavior_start.elapsed().as_micros() as u64;

        // 2. Commit creations in agent order.
        let commit_start = Instant::now();
        for (id, buffer, counts) in results {
            metrics.merge_counts(&counts);
            if !buffer.is_empty() {
                metrics.agents_created += self.commit(id, buffer).len() as u32;
            }
        }

        // 3. Discretize long terminals.
        self.discretize(&mut metrics);
        metrics.commit_us = commit_start.elapsed().as_micros() as u64;

        // 4. Diffuse.
        let field_start = Instant::now();
        self.fields.step(self.config.dt);
        metrics.field_us = field_start.elapsed().as_micros() as u64;

        self.tick = TickId(self.tick.0 + 1);
        metrics.total_us = step_start.elapsed().as_micros() as u64;
        debug!(
            tick = self.tick.0,
            agents = self.arena.len(),
            created = metrics.agents_created,
            branches = metrics.branches,
            bifurcations = metrics.bifurcations,
            divisions = metrics.divisions,
            "step complete"
        );
        self.last_metrics = metrics;
        &self.last_metrics
    }

    /// Run `steps` steps.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    fn run_behaviors(&mut self) -> Vec<(AgentId, SpawnBuffer, StepMetrics)> {
        let config = &self.config;
        let fields = &self.fields;
        let tick = self.tick;
        let agents = self.arena.as_mut_slice();

        #[cfg(feature = "parallel")]
        let iter = agents.par_iter_mut();
        #[cfg(not(feature = "parallel"))]
        let iter = agents.iter_mut();

        iter.map(|agent| {
            let (buffer, counts) = step_agent(agent, config, fields, tick);
            (agent.id(), buffer, counts)
        })
        .collect()
    }

    fn commit(&mut self, source: AgentId, buffer: SpawnBuffer) -> Vec<AgentId> {
        let (spawns, relinks) = buffer.into_parts();

        // 1. Insert. Pending references may point forward, so all ids are
        //    assigned before any are resolved.
        let mut ids = Vec::with_capacity(spawns.len());
        for spawn in spawns {
            let uid = self.allocate_uid();
            ids.push(self.arena.insert(uid, spawn.body, spawn.behaviors));
        }

        // 2. Resolve pending references in the new agents and the source.
        for &id in ids.iter().chain(std::iter::once(&source)) {
            if let Some(agent) = self.arena.get_mut(id) {
                agent.body.resolve(&ids);
            }
        }

        // 3. Redirect live mothers.
        for relink in relinks {
            let Some(&to) = ids.get(relink.to.0 as usize) else {
                continue;
            };
            if let Some(mother) = self.arena.get_mut(relink.mother) {
                mother.body.replace_daughter(relink.from, AgentRef::Live(to));
            }
        }

        if !ids.is_empty() {
            trace!(source = ?source, created = ids.len(), "agents committed");
        }
        ids
    }

    fn discretize(&mut self, metrics: &mut StepMetrics) {
        let max_length = self.config.neurite_max_length;
        let portion = self.config.discretization_distal_portion;
        let long: Vec<AgentId> = self
            .terminals()
            .filter(|(_, n)| n.length() > max_length)
            .map(|(id, _)| id)
            .collect();

        for id in long {
            let mut buffer = SpawnBuffer::default();
            let Some(agent) = self.arena.get_mut(id) else {
                continue;
            };
            let Some(segment) = agent.body.as_neurite_mut() else {
                continue;
            };
            segment.split(id, portion, &mut buffer);
            buffer.propagate(&mut agent.behaviors);
            metrics.splits += 1;
            metrics.agents_created += self.commit(id, buffer).len() as u32;
        }
    }

    fn allocate_uid(&mut self) -> AgentUid {
        let uid = AgentUid(self.next_uid);
        self.next_uid += 1;
        uid
    }

    fn body_mut(&mut self, id: AgentId, expected: AgentKind) -> Result<&mut Body, WorldError> {
        let agent = self.arena.get_mut(id).ok_or(WorldError::UnknownAgent(id))?;
        if agent.kind() != expected {
            return Err(WorldError::WrongAgentKind { agent: id, expected });
        }
        Ok(&mut agent.body)
    }
}

/// Run every behavior attached to `agent` once, in list order.
///
/// Events raised by a behavior are propagated before the next behavior
/// runs, so a later behavior never sees an earlier one's creations
/// without their propagated copies.
fn step_agent(
    agent: &mut Agent,
    config: &SimConfig,
    fields: &SubstanceRegistry,
    tick: TickId,
) -> (SpawnBuffer, StepMetrics) {
    let mut buffer = SpawnBuffer::default();
    let mut counts = StepMetrics::default();
    let mut behavior_rng = AgentRng::new(config.seed, agent.uid(), tick, RngStream::Behavior);
    let mut geometry_rng = AgentRng::new(config.seed, agent.uid(), tick, RngStream::Geometry);
    let id = agent.id();

    for i in 0..agent.behaviors.len() {
        let mut ctx = AgentContext::new(id, &mut agent.body, config, &mut geometry_rng, &mut buffer);
        let outcome = agent.behaviors[i].run(&mut ctx, fields, &mut behavior_rng);
        counts.record(outcome);
        buffer.propagate(&mut agent.behaviors);
    }
    (buffer, counts)
}
