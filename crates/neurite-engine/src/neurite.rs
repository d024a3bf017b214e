//! Cylindrical neurite segments and their geometric operations.
//!
//! A segment spans from its proximal end (attached to its mother) to its
//! distal end, the mass location. The spring axis points from proximal to
//! distal, so
//!
//! ```text
//! proximal_end = mass_location - spring_axis
//! position     = mass_location - spring_axis / 2
//! ```
//!
//! A segment with no left daughter is a terminal: the growing tip of its
//! branch.

use neurite_core::math::{add, dot, norm, normalize, perp3, rot_around_axis, scalar_mult, sub};
use neurite_core::{
    AgentId, AgentRef, EventKind, NeuriteState, PendingAgent, RandomSource, StructuralEvent, Vec3,
};

use crate::agent::Body;
use crate::config::SimConfig;
use crate::spawn::SpawnBuffer;

/// One segment of a dendrite or axon.
#[derive(Clone, Debug, PartialEq)]
pub struct NeuriteSegment {
    mass_location: Vec3,
    spring_axis: Vec3,
    diameter: f64,
    can_branch: bool,
    mother: AgentRef,
    daughter_left: Option<AgentRef>,
    daughter_right: Option<AgentRef>,
}

impl NeuriteSegment {
    /// A terminal segment from `proximal_end` along `axis`.
    pub fn new(proximal_end: Vec3, axis: Vec3, diameter: f64, mother: AgentRef) -> Self {
        Self {
            mass_location: add(proximal_end, axis),
            spring_axis: axis,
            diameter,
            can_branch: false,
            mother,
            daughter_left: None,
            daughter_right: None,
        }
    }

    /// Distal end.
    pub fn mass_location(&self) -> Vec3 {
        self.mass_location
    }

    /// End attached to the mother.
    pub fn proximal_end(&self) -> Vec3 {
        sub(self.mass_location, self.spring_axis)
    }

    /// Midpoint.
    pub fn position(&self) -> Vec3 {
        sub(self.mass_location, scalar_mult(0.5, self.spring_axis))
    }

    /// Proximal-to-distal vector.
    pub fn spring_axis(&self) -> Vec3 {
        self.spring_axis
    }

    /// Length of the spring axis.
    pub fn length(&self) -> f64 {
        norm(self.spring_axis)
    }

    /// Diameter.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Whether side branches may sprout from this segment.
    pub fn can_branch(&self) -> bool {
        self.can_branch
    }

    /// Allow or forbid side branches.
    pub fn set_can_branch(&mut self, can_branch: bool) {
        self.can_branch = can_branch;
    }

    /// The soma or segment this one is attached to.
    pub fn mother(&self) -> AgentRef {
        self.mother
    }

    /// Continuation of this branch, if any.
    pub fn daughter_left(&self) -> Option<AgentRef> {
        self.daughter_left
    }

    /// Side branch or second bifurcation daughter, if any.
    pub fn daughter_right(&self) -> Option<AgentRef> {
        self.daughter_right
    }

    /// Whether this is the growing tip of its branch.
    pub fn is_terminal(&self) -> bool {
        self.daughter_left.is_none()
    }

    pub(crate) fn refs_mut(&mut self) -> [Option<&mut AgentRef>; 3] {
        [
            Some(&mut self.mother),
            self.daughter_left.as_mut(),
            self.daughter_right.as_mut(),
        ]
    }

    pub(crate) fn replace_daughter(&mut self, from: AgentRef, to: AgentRef) {
        for daughter in [&mut self.daughter_left, &mut self.daughter_right] {
            if *daughter == Some(from) {
                *daughter = Some(to);
            }
        }
    }

    /// Move the distal end by `speed * dt` along `direction`, keeping the
    /// proximal end fixed.
    ///
    /// Ignored on non-terminal segments and when `direction` points
    /// backwards along the axis.
    pub(crate) fn elongate(&mut self, speed: f64, direction: Vec3, dt: f64) {
        if !self.is_terminal() || dot(direction, self.spring_axis) <= 0.0 {
            return;
        }
        let proximal = self.proximal_end();
        let displacement = scalar_mult(speed * dt, normalize(direction));
        self.mass_location = add(self.mass_location, displacement);
        self.spring_axis = sub(self.mass_location, proximal);
    }

    /// Cut this segment in two, keeping the distal `distal_portion` of the
    /// length. The proximal piece becomes a new segment between this one
    /// and the mother. Raises a `Split` event.
    pub(crate) fn split(
        &mut self,
        me: AgentId,
        distal_portion: f64,
        buffer: &mut SpawnBuffer,
    ) -> PendingAgent {
        let proximal_end = self.proximal_end();
        let cut = sub(
            self.mass_location,
            scalar_mult(distal_portion, self.spring_axis),
        );
        let mut proximal = NeuriteSegment::new(
            proximal_end,
            sub(cut, proximal_end),
            self.diameter,
            self.mother,
        );
        proximal.daughter_left = Some(AgentRef::Live(me));

        let pending = buffer.push(Body::Neurite(proximal));
        buffer.relink(self.mother, AgentRef::Live(me), pending);
        self.mother = AgentRef::Pending(pending);
        self.spring_axis = scalar_mult(distal_portion, self.spring_axis);
        buffer.raise(StructuralEvent::new(
            EventKind::Split,
            AgentRef::Live(me),
            AgentRef::Pending(pending),
        ));
        pending
    }

    /// Sprout a side branch along `direction`.
    ///
    /// This segment is first split at `branch_split_portion`; the branch
    /// hangs off the new proximal piece, so this segment stays terminal.
    /// The branch has the default length and this segment's diameter.
    /// Raises `Split` then `Branch`.
    pub(crate) fn branch(
        &mut self,
        me: AgentId,
        direction: Vec3,
        config: &SimConfig,
        buffer: &mut SpawnBuffer,
    ) -> PendingAgent {
        let proximal = self.split(me, config.branch_split_portion, buffer);
        let axis = scalar_mult(config.neurite_default_length, normalize(direction));
        let side = NeuriteSegment::new(
            self.proximal_end(),
            axis,
            self.diameter,
            AgentRef::Pending(proximal),
        );
        let child = buffer.push(Body::Neurite(side));
        if let Some(Body::Neurite(p)) = buffer.body_mut(proximal) {
            p.daughter_right = Some(AgentRef::Pending(child));
        }
        buffer.raise(StructuralEvent::new(
            EventKind::Branch,
            AgentRef::Live(me),
            AgentRef::Pending(child),
        ));
        child
    }

    /// Grow two terminal daughters from the distal end.
    ///
    /// Their directions are the spring axis rotated by plus and minus half
    /// the bifurcation angle within a random plane containing the axis.
    /// Raises `Bifurcation`.
    pub(crate) fn bifurcate(
        &mut self,
        me: AgentId,
        config: &SimConfig,
        rng: &mut dyn RandomSource,
        buffer: &mut SpawnBuffer,
    ) -> (PendingAgent, PendingAgent) {
        let plane = perp3(self.spring_axis, rng.uniform(0.0, 1.0));
        let half = config.bifurcation_angle / 2.0;
        let mut grow = |angle: f64| {
            let direction = rot_around_axis(self.spring_axis, angle, plane);
            let axis = scalar_mult(config.neurite_default_length, normalize(direction));
            buffer.push(Body::Neurite(NeuriteSegment::new(
                self.mass_location,
                axis,
                self.diameter,
                AgentRef::Live(me),
            )))
        };
        let left = grow(half);
        let right = grow(-half);
        self.daughter_left = Some(AgentRef::Pending(left));
        self.daughter_right = Some(AgentRef::Pending(right));
        buffer.raise(StructuralEvent::pair(
            EventKind::Bifurcation,
            AgentRef::Live(me),
            AgentRef::Pending(left),
            AgentRef::Pending(right),
        ));
        (left, right)
    }
}

impl NeuriteState for NeuriteSegment {
    fn diameter(&self) -> f64 {
        self.diameter
    }

    fn set_diameter(&mut self, diameter: f64) {
        self.diameter = diameter;
    }

    fn position(&self) -> Vec3 {
        NeuriteSegment::position(self)
    }

    fn spring_axis(&self) -> Vec3 {
        self.spring_axis
    }

    fn is_terminal(&self) -> bool {
        NeuriteSegment::is_terminal(self)
    }

    fn can_branch(&self) -> bool {
        self.can_branch
    }

    fn set_can_branch(&mut self, can_branch: bool) {
        self.can_branch = can_branch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurite_test_utils::ScriptedRandom;
    use proptest::prelude::*;
    use slotmap::SlotMap;
    use std::f64::consts::PI;

    fn ids() -> (AgentId, AgentId) {
        let mut map = SlotMap::<AgentId, ()>::with_key();
        (map.insert(()), map.insert(()))
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-9)
    }

    fn segment(mother: AgentId) -> NeuriteSegment {
        NeuriteSegment::new([0.0, 0.0, 3.0], [0.0, 0.0, 4.0], 1.0, AgentRef::Live(mother))
    }

    #[test]
    fn derived_points() {
        let (soma, _) = ids();
        let s = segment(soma);
        assert_eq!(s.mass_location(), [0.0, 0.0, 7.0]);
        assert_eq!(s.position(), [0.0, 0.0, 5.0]);
        assert_eq!(s.proximal_end(), [0.0, 0.0, 3.0]);
        assert_eq!(s.length(), 4.0);
        assert!(s.is_terminal());
    }

    #[test]
    fn elongation_moves_distal_end_only() {
        let (soma, _) = ids();
        let mut s = segment(soma);
        s.elongate(25.0, [0.0, 0.0, 3.0], 0.01);
        assert!(close(s.mass_location(), [0.0, 0.0, 7.25]));
        assert!(close(s.proximal_end(), [0.0, 0.0, 3.0]));
        assert!((s.length() - 4.25).abs() < 1e-12);
    }

    #[test]
    fn elongation_ignores_backward_direction() {
        let (soma, _) = ids();
        let mut s = segment(soma);
        s.elongate(25.0, [1.0, 0.0, -0.1], 0.01);
        s.elongate(25.0, [1.0, 0.0, 0.0], 0.01);
        assert_eq!(s, segment(soma));
    }

    #[test]
    fn split_inserts_proximal_piece() {
        let (soma, me) = ids();
        let mut s = segment(soma);
        let mut buffer = SpawnBuffer::default();
        let p = s.split(me, 0.25, &mut buffer);

        let proximal = buffer.body(p).and_then(Body::as_neurite).unwrap().clone();
        assert!(close(proximal.proximal_end(), [0.0, 0.0, 3.0]));
        assert!(close(proximal.mass_location(), [0.0, 0.0, 6.0]));
        assert_eq!(proximal.mother(), AgentRef::Live(soma));
        assert_eq!(proximal.daughter_left(), Some(AgentRef::Live(me)));
        assert!(!proximal.can_branch());
        assert!(close(s.proximal_end(), [0.0, 0.0, 6.0]));
        assert!(close(s.mass_location(), [0.0, 0.0, 7.0]));
        assert_eq!(s.mother(), AgentRef::Pending(p));
        assert!(s.is_terminal());
        assert_eq!(buffer.pending_events()[0].kind, EventKind::Split);
        assert_eq!(buffer.relink_count(), 1);
    }

    #[test]
    fn branch_hangs_off_proximal_piece() {
        let (soma, me) = ids();
        let mut s = segment(soma);
        let mut buffer = SpawnBuffer::default();
        let child = s.branch(me, [3.0, 0.0, 0.0], &SimConfig::default(), &mut buffer);

        let side = buffer.body(child).and_then(Body::as_neurite).unwrap();
        assert!(close(side.proximal_end(), [0.0, 0.0, 5.0]));
        assert!(close(side.spring_axis(), [1.0, 0.0, 0.0]));
        assert_eq!(side.diameter(), 1.0);
        let AgentRef::Pending(proximal) = side.mother() else {
            panic!("branch mother should be the new proximal piece");
        };
        let p = buffer.body(proximal).and_then(Body::as_neurite).unwrap();
        assert_eq!(p.daughter_right(), Some(AgentRef::Pending(child)));
        assert!(s.is_terminal());
        let kinds: Vec<_> = buffer.pending_events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::Split, EventKind::Branch]);
    }

    #[test]
    fn bifurcation_spreads_by_configured_angle() {
        let (soma, me) = ids();
        let mut s = segment(soma);
        let mut buffer = SpawnBuffer::default();
        let mut rng = ScriptedRandom::new([0.3]);
        let (a, b) = s.bifurcate(me, &SimConfig::default(), &mut rng, &mut buffer);

        let left = buffer.body(a).and_then(Body::as_neurite).unwrap();
        let right = buffer.body(b).and_then(Body::as_neurite).unwrap();
        assert_eq!(left.proximal_end(), s.mass_location());
        assert!((left.length() - 1.0).abs() < 1e-12);
        let cos = dot(normalize(left.spring_axis()), normalize(right.spring_axis()));
        assert!((cos - (PI / 3.0).cos()).abs() < 1e-9);
        assert!(!s.is_terminal());
        assert_eq!(s.daughter_right(), Some(AgentRef::Pending(b)));
        assert_eq!(rng.draws(), 1);
    }

    proptest! {
        #[test]
        fn elongation_never_moves_proximal_end(
            dx in -1.0f64..1.0,
            dy in -1.0f64..1.0,
            dz in -1.0f64..1.0,
            speed in 0.0f64..100.0,
        ) {
            let (soma, _) = ids();
            let mut s = segment(soma);
            let before = s.length();
            s.elongate(speed, [dx, dy, dz], 0.01);
            prop_assert!(close(s.proximal_end(), [0.0, 0.0, 3.0]));
            prop_assert!(s.length() >= before - 1e-12 || dz <= 0.0);
        }

        #[test]
        fn split_preserves_total_length(portion in 0.01f64..0.99) {
            let (soma, me) = ids();
            let mut s = segment(soma);
            let mut buffer = SpawnBuffer::default();
            let p = s.split(me, portion, &mut buffer);
            let proximal = buffer.body(p).and_then(Body::as_neurite).unwrap();
            prop_assert!((proximal.length() + s.length() - 4.0).abs() < 1e-9);
            prop_assert!(close(proximal.mass_location(), s.proximal_end()));
        }
    }
}
