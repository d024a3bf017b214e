//! Facades handed to behaviors while an agent runs.
//!
//! A context borrows the agent's body, the step's geometry RNG stream, and
//! the agent's spawn buffer, and exposes them through the narrow
//! `neurite_core` facade traits.

use neurite_core::{
    AgentFacade, AgentId, AgentKind, NeuriteFacade, NeuriteState, PendingAgent, RandomSource,
    SomaFacade, Vec3,
};

use crate::agent::Body;
use crate::config::SimConfig;
use crate::neurite::NeuriteSegment;
use crate::soma::Soma;
use crate::spawn::SpawnBuffer;

// ── NeuriteContext ─────────────────────────────────────────────────

pub(crate) struct NeuriteContext<'a> {
    id: AgentId,
    segment: &'a mut NeuriteSegment,
    config: &'a SimConfig,
    rng: &'a mut dyn RandomSource,
    buffer: &'a mut SpawnBuffer,
}

impl NeuriteState for NeuriteContext<'_> {
    fn diameter(&self) -> f64 {
        self.segment.diameter()
    }

    fn set_diameter(&mut self, diameter: f64) {
        NeuriteState::set_diameter(self.segment, diameter);
    }

    fn position(&self) -> Vec3 {
        self.segment.position()
    }

    fn spring_axis(&self) -> Vec3 {
        self.segment.spring_axis()
    }

    fn is_terminal(&self) -> bool {
        self.segment.is_terminal()
    }

    fn can_branch(&self) -> bool {
        self.segment.can_branch()
    }

    fn set_can_branch(&mut self, can_branch: bool) {
        self.segment.set_can_branch(can_branch);
    }
}

impl NeuriteFacade for NeuriteContext<'_> {
    fn elongate_terminal(&mut self, speed: f64, direction: Vec3) {
        self.segment.elongate(speed, direction, self.config.dt);
    }

    fn branch(&mut self, direction: Vec3) -> PendingAgent {
        self.segment
            .branch(self.id, direction, self.config, self.buffer)
    }

    fn bifurcate(&mut self) -> (PendingAgent, PendingAgent) {
        self.segment
            .bifurcate(self.id, self.config, self.rng, self.buffer)
    }

    fn derived_mut(&mut self, agent: PendingAgent) -> Option<&mut dyn NeuriteState> {
        self.buffer
            .body_mut(agent)
            .and_then(Body::as_neurite_mut)
            .map(|n| n as &mut dyn NeuriteState)
    }
}

// ── SomaContext ────────────────────────────────────────────────────

pub(crate) struct SomaContext<'a> {
    id: AgentId,
    soma: &'a mut Soma,
    config: &'a SimConfig,
    rng: &'a mut dyn RandomSource,
    buffer: &'a mut SpawnBuffer,
}

impl SomaFacade for SomaContext<'_> {
    fn diameter(&self) -> f64 {
        self.soma.diameter()
    }

    fn volume(&self) -> f64 {
        self.soma.volume()
    }

    fn can_divide(&self) -> bool {
        self.soma.can_divide()
    }

    fn change_volume(&mut self, speed: f64) {
        self.soma.change_volume(speed, self.config.dt);
    }

    fn divide(&mut self) -> PendingAgent {
        self.soma
            .divide(self.id, self.config, self.rng, self.buffer)
    }
}

// ── AgentContext ───────────────────────────────────────────────────

pub(crate) enum AgentContext<'a> {
    Neurite(NeuriteContext<'a>),
    Soma(SomaContext<'a>),
}

impl<'a> AgentContext<'a> {
    pub(crate) fn new(
        id: AgentId,
        body: &'a mut Body,
        config: &'a SimConfig,
        rng: &'a mut dyn RandomSource,
        buffer: &'a mut SpawnBuffer,
    ) -> Self {
        match body {
            Body::Neurite(segment) => Self::Neurite(NeuriteContext {
                id,
                segment,
                config,
                rng,
                buffer,
            }),
            Body::Soma(soma) => Self::Soma(SomaContext {
                id,
                soma,
                config,
                rng,
                buffer,
            }),
        }
    }
}

impl AgentFacade for AgentContext<'_> {
    fn kind(&self) -> AgentKind {
        match self {
            Self::Neurite(_) => AgentKind::NeuriteSegment,
            Self::Soma(_) => AgentKind::Soma,
        }
    }

    fn as_neurite(&mut self) -> Option<&mut dyn NeuriteFacade> {
        match self {
            Self::Neurite(ctx) => Some(ctx),
            Self::Soma(_) => None,
        }
    }

    fn as_soma(&mut self) -> Option<&mut dyn SomaFacade> {
        match self {
            Self::Soma(ctx) => Some(ctx),
            Self::Neurite(_) => None,
        }
    }
}
