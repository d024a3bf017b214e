//! Test utilities and mock types for neurite development.
//!
//! Provides mock implementations of the collaborator traits
//! ([`GradientField`], [`RandomSource`], [`AgentFacade`](neurite_core::AgentFacade)) so growth
//! behaviors can be tested without an engine.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod agents;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use neurite_core::{GradientField, RandomSource, SubstanceId, Vec3};

pub use agents::{MockDerived, MockNeurite, MockSoma};

/// Mock implementation of [`GradientField`].
///
/// Each registered substance has a constant gradient everywhere. Ids are
/// assigned in registration order. Counts calls to `resolve` so tests can
/// check lazy resolution.
#[derive(Default)]
pub struct MockGradientField {
    substances: Vec<(String, Vec3)>,
    resolve_calls: AtomicUsize,
}

impl MockGradientField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with a constant `gradient`.
    pub fn with_substance(mut self, name: &str, gradient: Vec3) -> Self {
        self.substances.push((name.to_string(), gradient));
        self
    }

    /// Number of `resolve` calls so far.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::Relaxed)
    }
}

impl GradientField for MockGradientField {
    fn resolve(&self, substance: &str) -> Option<SubstanceId> {
        self.resolve_calls.fetch_add(1, Ordering::Relaxed);
        self.substances
            .iter()
            .position(|(n, _)| n == substance)
            .map(|i| SubstanceId(i as u32))
    }

    fn gradient(&self, substance: SubstanceId, _position: Vec3) -> Vec3 {
        self.substances
            .get(substance.0 as usize)
            .map(|(_, g)| *g)
            .unwrap_or([0.0; 3])
    }
}

/// Mock implementation of [`RandomSource`].
///
/// Returns the scripted values verbatim, ignoring the requested range, then
/// the midpoint of the range once the script runs out. The midpoint of the
/// noise range is zero and of the unit range is 0.5, so an exhausted
/// script means "no noise, no branching".
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    calls: Vec<(f64, f64)>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: values.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    /// A source with no scripted values.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.calls.len()
    }

    /// `(low, high)` of every draw, in order.
    pub fn calls(&self) -> &[(f64, f64)] {
        &self.calls
    }

    /// Scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.calls.push((low, high));
        self.script
            .pop_front()
            .unwrap_or(low + (high - low) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_then_midpoint() {
        let mut rng = ScriptedRandom::new([0.25]);
        assert_eq!(rng.uniform(0.0, 1.0), 0.25);
        assert_eq!(rng.uniform(-1.0, 1.0), 0.0);
        assert_eq!(rng.uniform(0.0, 1.0), 0.5);
        assert_eq!(rng.draws(), 3);
        assert_eq!(rng.calls()[1], (-1.0, 1.0));
    }

    #[test]
    fn field_counts_resolves() {
        let f = MockGradientField::new()
            .with_substance("a", [1.0, 0.0, 0.0])
            .with_substance("b", [0.0, 2.0, 0.0]);
        assert_eq!(f.resolve("b"), Some(SubstanceId(1)));
        assert_eq!(f.resolve("c"), None);
        assert_eq!(f.resolve_calls(), 2);
        assert_eq!(f.gradient(SubstanceId(1), [9.0; 3]), [0.0, 2.0, 0.0]);
        assert_eq!(f.gradient(SubstanceId(5), [9.0; 3]), [0.0; 3]);
    }
}
