//! Basal dendrite growth: chemotactic elongation of terminal tips with
//! occasional bifurcation.

use neurite_core::{AgentFacade, EventKind, EventMask, GradientField, RandomSource};
use tracing::{debug, trace};

use crate::cache::FieldCache;
use crate::compositor::{compose_direction, DirectionWeights};
use crate::lifecycle::{BehaviorCore, Lifecycle};
use crate::outcome::{SkipReason, StepOutcome};
use crate::params::{check_non_negative, check_probability, check_substance, check_weights};

/// Tunable constants of [`BasalGrowth`].
#[derive(Clone, Debug, PartialEq)]
pub struct BasalParams {
    /// Name of the guidance substance.
    pub substance: String,
    /// Direction component weights.
    pub weights: DirectionWeights,
    /// Elongation speed.
    pub speed: f64,
    /// Diameter lost per step.
    pub shrink: f64,
    /// Only terminals thicker than this grow.
    pub min_diameter: f64,
    /// Per-step probability of bifurcating.
    pub bifurcation_probability: f64,
    /// Extra diameter lost when bifurcating.
    pub bifurcation_shrink: f64,
}

impl Default for BasalParams {
    fn default() -> Self {
        Self {
            substance: "basal".to_string(),
            weights: DirectionWeights::new(5.0, 0.02, 0.5),
            speed: 25.0,
            shrink: 0.001,
            min_diameter: 0.75,
            bifurcation_probability: 0.008,
            bifurcation_shrink: 0.01,
        }
    }
}

/// Growth of a basal dendrite.
///
/// Only terminal segments thicker than 0.75 grow. The heading is weighted
/// more strongly than for apical growth (5.0 against 3.0) and the gradient
/// less (0.02). With probability 0.008 per step the tip loses a further 0.01
/// of diameter and bifurcates.
///
/// Propagated on `Branch` and `Bifurcation` by default.
#[derive(Clone, Debug, PartialEq)]
pub struct BasalGrowth {
    params: BasalParams,
    core: BehaviorCore,
    field: FieldCache,
}

impl Default for BasalGrowth {
    fn default() -> Self {
        Self::from_parts(BasalParams::default(), Self::default_mask())
    }
}

/// Builder for [`BasalGrowth`].
pub struct BasalGrowthBuilder {
    params: BasalParams,
    accepted: EventMask,
}

impl BasalGrowth {
    /// Behavior with the default constants and mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for configuring a `BasalGrowth` behavior.
    pub fn builder() -> BasalGrowthBuilder {
        BasalGrowthBuilder {
            params: BasalParams::default(),
            accepted: Self::default_mask(),
        }
    }

    /// Events this variant propagates on unless overridden.
    pub fn default_mask() -> EventMask {
        EventMask::of(&[EventKind::Branch, EventKind::Bifurcation])
    }

    fn from_parts(params: BasalParams, accepted: EventMask) -> Self {
        Self {
            params,
            core: BehaviorCore::new(accepted),
            field: FieldCache::new(),
        }
    }

    /// The configured constants.
    pub fn params(&self) -> &BasalParams {
        &self.params
    }

    /// Events this instance propagates on.
    pub fn accepted_events(&self) -> EventMask {
        self.core.accepted()
    }

    /// Lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.core.state()
    }

    /// The substance handle cache.
    pub fn field_cache(&self) -> &FieldCache {
        &self.field
    }

    pub(crate) fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    pub(crate) fn derive(&self) -> Self {
        Self {
            params: self.params.clone(),
            core: self.core.derive(),
            field: FieldCache::new(),
        }
    }

    /// Run one step on `agent`.
    pub fn run(
        &mut self,
        agent: &mut dyn AgentFacade,
        fields: &dyn GradientField,
        rng: &mut dyn RandomSource,
    ) -> StepOutcome {
        if self.core.state() == Lifecycle::Removed {
            return StepOutcome::Skipped(SkipReason::Removed);
        }
        let substance = self.field.get_or_resolve(&self.params.substance, fields);
        self.core.on_run();

        let Some(neurite) = agent.as_neurite() else {
            trace!(behavior = "basal_growth", "skipped: not a neurite");
            return StepOutcome::Skipped(SkipReason::IncompatibleAgent);
        };
        if !(neurite.is_terminal() && neurite.diameter() > self.params.min_diameter) {
            trace!(
                terminal = neurite.is_terminal(),
                diameter = neurite.diameter(),
                "basal growth skipped"
            );
            return StepOutcome::Skipped(SkipReason::GuardUnmet);
        }
        let Some(substance) = substance else {
            return StepOutcome::Skipped(SkipReason::SubstanceMissing);
        };

        let gradient = fields.gradient(substance, neurite.position());
        let noise = rng.uniform_vec3(-1.0, 1.0);
        let direction =
            compose_direction(neurite.spring_axis(), gradient, noise, self.params.weights);
        neurite.elongate_terminal(self.params.speed, direction);
        neurite.set_diameter(neurite.diameter() - self.params.shrink);

        if rng.uniform(0.0, 1.0) < self.params.bifurcation_probability {
            neurite.set_diameter(neurite.diameter() - self.params.bifurcation_shrink);
            let children = neurite.bifurcate();
            debug!(left = %children.0, right = %children.1, "basal bifurcation requested");
            return StepOutcome::Bifurcated { children };
        }
        StepOutcome::Elongated
    }
}

impl BasalGrowthBuilder {
    /// Set the guidance substance name (default: `"basal"`).
    pub fn substance(mut self, name: impl Into<String>) -> Self {
        self.params.substance = name.into();
        self
    }

    /// Set the direction weights (default: 5.0 / 0.02 / 0.5).
    pub fn weights(mut self, weights: DirectionWeights) -> Self {
        self.params.weights = weights;
        self
    }

    /// Set the elongation speed (default: 25).
    pub fn speed(mut self, speed: f64) -> Self {
        self.params.speed = speed;
        self
    }

    /// Set the per-step diameter loss (default: 0.001).
    pub fn shrink(mut self, shrink: f64) -> Self {
        self.params.shrink = shrink;
        self
    }

    /// Set the diameter a terminal must exceed to grow (default: 0.75).
    pub fn min_diameter(mut self, min_diameter: f64) -> Self {
        self.params.min_diameter = min_diameter;
        self
    }

    /// Set the per-step bifurcation probability (default: 0.008).
    pub fn bifurcation_probability(mut self, p: f64) -> Self {
        self.params.bifurcation_probability = p;
        self
    }

    /// Set the extra diameter loss on bifurcation (default: 0.01).
    pub fn bifurcation_shrink(mut self, shrink: f64) -> Self {
        self.params.bifurcation_shrink = shrink;
        self
    }

    /// Set the events the behavior propagates on (default: branch, bifurcation).
    pub fn accepted_events(mut self, mask: EventMask) -> Self {
        self.accepted = mask;
        self
    }

    /// Build the behavior, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the substance name is empty, a weight is not finite,
    /// a length or diameter constant is negative or NaN, or
    /// `bifurcation_probability` is outside `[0, 1]`.
    pub fn build(self) -> Result<BasalGrowth, String> {
        let p = &self.params;
        check_substance(&p.substance)?;
        check_weights(&p.weights)?;
        check_non_negative("speed", p.speed)?;
        check_non_negative("shrink", p.shrink)?;
        check_non_negative("min_diameter", p.min_diameter)?;
        check_non_negative("bifurcation_shrink", p.bifurcation_shrink)?;
        check_probability("bifurcation_probability", p.bifurcation_probability)?;
        Ok(BasalGrowth::from_parts(self.params, self.accepted))
    }
}
