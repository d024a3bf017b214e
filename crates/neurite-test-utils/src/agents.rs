//! Mock agents that record what behaviors ask of them.

use std::f64::consts::PI;

use neurite_core::{
    AgentFacade, AgentKind, NeuriteFacade, NeuriteState, PendingAgent, SomaFacade, Vec3,
};

/// A segment requested through a [`MockNeurite`].
#[derive(Clone, Debug, PartialEq)]
pub struct MockDerived {
    pub diameter: f64,
    pub can_branch: bool,
    pub axis: Vec3,
}

impl NeuriteState for MockDerived {
    fn diameter(&self) -> f64 {
        self.diameter
    }

    fn set_diameter(&mut self, diameter: f64) {
        self.diameter = diameter;
    }

    fn position(&self) -> Vec3 {
        [0.0; 3]
    }

    fn spring_axis(&self) -> Vec3 {
        self.axis
    }

    fn is_terminal(&self) -> bool {
        true
    }

    fn can_branch(&self) -> bool {
        self.can_branch
    }

    fn set_can_branch(&mut self, can_branch: bool) {
        self.can_branch = can_branch;
    }
}

/// Mock neurite segment.
///
/// Defaults: diameter 1, at the origin, axis `(0, 0, 1)`, terminal, may
/// not branch. Elongation is recorded but does not move the segment.
#[derive(Clone, Debug)]
pub struct MockNeurite {
    diameter: f64,
    position: Vec3,
    axis: Vec3,
    terminal: bool,
    can_branch: bool,
    elongations: Vec<(f64, Vec3)>,
    branch_requests: Vec<Vec3>,
    bifurcations: usize,
    derived: Vec<MockDerived>,
}

impl Default for MockNeurite {
    fn default() -> Self {
        Self {
            diameter: 1.0,
            position: [0.0; 3],
            axis: [0.0, 0.0, 1.0],
            terminal: true,
            can_branch: false,
            elongations: Vec::new(),
            branch_requests: Vec::new(),
            bifurcations: 0,
            derived: Vec::new(),
        }
    }
}

impl MockNeurite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn with_can_branch(mut self, can_branch: bool) -> Self {
        self.can_branch = can_branch;
        self
    }

    /// `(speed, direction)` of every elongation request.
    pub fn elongations(&self) -> &[(f64, Vec3)] {
        &self.elongations
    }

    /// Direction of every side branch request.
    pub fn branch_requests(&self) -> &[Vec3] {
        &self.branch_requests
    }

    pub fn bifurcations(&self) -> usize {
        self.bifurcations
    }

    /// A segment requested by `branch` or `bifurcate`.
    pub fn derived(&self, agent: PendingAgent) -> Option<&MockDerived> {
        self.derived.get(agent.0 as usize)
    }

    fn spawn(&mut self, axis: Vec3) -> PendingAgent {
        self.derived.push(MockDerived {
            diameter: self.diameter,
            can_branch: false,
            axis,
        });
        PendingAgent(self.derived.len() as u32 - 1)
    }
}

impl NeuriteState for MockNeurite {
    fn diameter(&self) -> f64 {
        self.diameter
    }

    fn set_diameter(&mut self, diameter: f64) {
        self.diameter = diameter;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn spring_axis(&self) -> Vec3 {
        self.axis
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn can_branch(&self) -> bool {
        self.can_branch
    }

    fn set_can_branch(&mut self, can_branch: bool) {
        self.can_branch = can_branch;
    }
}

impl NeuriteFacade for MockNeurite {
    fn elongate_terminal(&mut self, speed: f64, direction: Vec3) {
        self.elongations.push((speed, direction));
    }

    fn branch(&mut self, direction: Vec3) -> PendingAgent {
        self.branch_requests.push(direction);
        self.spawn(direction)
    }

    fn bifurcate(&mut self) -> (PendingAgent, PendingAgent) {
        self.bifurcations += 1;
        self.terminal = false;
        let axis = self.axis;
        (self.spawn(axis), self.spawn(axis))
    }

    fn derived_mut(&mut self, agent: PendingAgent) -> Option<&mut dyn NeuriteState> {
        self.derived
            .get_mut(agent.0 as usize)
            .map(|d| d as &mut dyn NeuriteState)
    }
}

impl AgentFacade for MockNeurite {
    fn kind(&self) -> AgentKind {
        AgentKind::NeuriteSegment
    }

    fn as_neurite(&mut self) -> Option<&mut dyn NeuriteFacade> {
        Some(self)
    }

    fn as_soma(&mut self) -> Option<&mut dyn SomaFacade> {
        None
    }
}

/// Mock soma. Defaults: diameter 6, may divide.
#[derive(Clone, Debug)]
pub struct MockSoma {
    diameter: f64,
    can_divide: bool,
    volume_speeds: Vec<f64>,
    divisions: usize,
}

impl Default for MockSoma {
    fn default() -> Self {
        Self {
            diameter: 6.0,
            can_divide: true,
            volume_speeds: Vec::new(),
            divisions: 0,
        }
    }
}

impl MockSoma {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn with_can_divide(mut self, can_divide: bool) -> Self {
        self.can_divide = can_divide;
        self
    }

    pub fn volume_changes(&self) -> usize {
        self.volume_speeds.len()
    }

    pub fn last_volume_speed(&self) -> Option<f64> {
        self.volume_speeds.last().copied()
    }

    pub fn divisions(&self) -> usize {
        self.divisions
    }
}

impl SomaFacade for MockSoma {
    fn diameter(&self) -> f64 {
        self.diameter
    }

    fn volume(&self) -> f64 {
        PI / 6.0 * self.diameter.powi(3)
    }

    fn can_divide(&self) -> bool {
        self.can_divide
    }

    fn change_volume(&mut self, speed: f64) {
        self.volume_speeds.push(speed);
    }

    fn divide(&mut self) -> PendingAgent {
        self.divisions += 1;
        PendingAgent(self.divisions as u32 - 1)
    }
}

impl AgentFacade for MockSoma {
    fn kind(&self) -> AgentKind {
        AgentKind::Soma
    }

    fn as_neurite(&mut self) -> Option<&mut dyn NeuriteFacade> {
        None
    }

    fn as_soma(&mut self) -> Option<&mut dyn SomaFacade> {
        Some(self)
    }
}
