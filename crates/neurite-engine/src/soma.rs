//! Neuron cell bodies.

use std::f64::consts::PI;

use neurite_core::math::{add, norm, normalize, scalar_mult, sub};
use neurite_core::{
    AgentId, AgentRef, EventKind, PendingAgent, RandomSource, StructuralEvent, Vec3,
};

use crate::agent::Body;
use crate::config::SimConfig;
use crate::neurite::NeuriteSegment;
use crate::spawn::SpawnBuffer;

/// Smallest volume a soma can shrink to.
const MIN_VOLUME: f64 = 5.235_987_7e-7;

/// A spherical cell body.
#[derive(Clone, Debug, PartialEq)]
pub struct Soma {
    position: Vec3,
    diameter: f64,
    volume: f64,
    can_divide: bool,
    neurites: Vec<AgentRef>,
}

fn volume_of(diameter: f64) -> f64 {
    PI / 6.0 * diameter.powi(3)
}

fn diameter_of(volume: f64) -> f64 {
    (6.0 * volume / PI).cbrt()
}

impl Soma {
    /// A soma centered at `position`. Division is disabled.
    pub fn new(position: Vec3, diameter: f64) -> Self {
        Self {
            position,
            diameter,
            volume: volume_of(diameter),
            can_divide: false,
            neurites: Vec::new(),
        }
    }

    /// Center of the soma.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Diameter.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Whether the soma may divide.
    pub fn can_divide(&self) -> bool {
        self.can_divide
    }

    /// Allow or forbid division.
    pub fn set_can_divide(&mut self, can_divide: bool) {
        self.can_divide = can_divide;
    }

    /// First segments of the neurites attached to this soma.
    pub fn neurites(&self) -> &[AgentRef] {
        &self.neurites
    }

    pub(crate) fn neurites_mut(&mut self) -> &mut Vec<AgentRef> {
        &mut self.neurites
    }

    /// Grow the volume by `speed * dt`, updating the diameter.
    pub(crate) fn change_volume(&mut self, speed: f64, dt: f64) {
        self.volume = (self.volume + speed * dt).max(MIN_VOLUME);
        self.diameter = diameter_of(self.volume);
    }

    /// Request a new neurite starting at the surface, heading along
    /// `direction`. Raises an `Extension` event.
    pub(crate) fn extend_new_neurite(
        &mut self,
        me: AgentId,
        direction: Vec3,
        config: &SimConfig,
        buffer: &mut SpawnBuffer,
    ) -> PendingAgent {
        let heading = normalize(direction);
        let surface = add(self.position, scalar_mult(self.diameter / 2.0, heading));
        let axis = scalar_mult(config.neurite_default_length, heading);
        let segment = NeuriteSegment::new(
            surface,
            axis,
            config.neurite_default_diameter,
            AgentRef::Live(me),
        );
        let pending = buffer.push(Body::Neurite(segment));
        self.neurites.push(AgentRef::Pending(pending));
        buffer.raise(StructuralEvent::new(
            EventKind::Extension,
            AgentRef::Live(me),
            AgentRef::Pending(pending),
        ));
        pending
    }

    /// Split into mother and daughter along a random axis.
    ///
    /// The daughter takes `ratio / (1 + ratio)` of the volume, with the
    /// ratio drawn from the configured range. Both cells move apart along
    /// the division axis by a quarter radius in total. Neurites stay with
    /// the mother. Raises a `Division` event.
    pub(crate) fn divide(
        &mut self,
        me: AgentId,
        config: &SimConfig,
        rng: &mut dyn RandomSource,
        buffer: &mut SpawnBuffer,
    ) -> PendingAgent {
        let (low, high) = config.division_volume_ratio;
        let ratio = rng.uniform(low, high);
        let phi = rng.uniform(0.0, 2.0 * PI);
        let theta = rng.uniform(0.0, PI);
        let axis = [
            theta.cos() * phi.sin(),
            theta.sin() * phi.sin(),
            phi.cos(),
        ];

        let displacement = self.diameter / 8.0;
        let d_daughter = displacement / (ratio + 1.0);
        let d_mother = displacement - d_daughter;

        let total = self.volume;
        let daughter_volume = total * ratio / (1.0 + ratio);
        let mut daughter = Soma::new(add(self.position, scalar_mult(d_daughter, axis)), 0.0);
        daughter.volume = daughter_volume;
        daughter.diameter = diameter_of(daughter_volume);
        daughter.can_divide = self.can_divide;

        self.position = sub(self.position, scalar_mult(d_mother, axis));
        self.volume = total - daughter_volume;
        self.diameter = diameter_of(self.volume);

        let pending = buffer.push(Body::Soma(daughter));
        buffer.raise(StructuralEvent::new(
            EventKind::Division,
            AgentRef::Live(me),
            AgentRef::Pending(pending),
        ));
        pending
    }

    /// Distance between the two soma centers.
    pub fn distance_to(&self, other: &Soma) -> f64 {
        norm(sub(self.position, other.position))
    }
}
