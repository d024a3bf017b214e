//! Apical dendrite growth: chemotactic elongation with occasional side
//! branches.

use neurite_core::math::{add, perp3};
use neurite_core::{AgentFacade, EventKind, EventMask, GradientField, RandomSource};
use tracing::{debug, trace};

use crate::cache::FieldCache;
use crate::compositor::{compose_direction, DirectionWeights};
use crate::lifecycle::{BehaviorCore, Lifecycle};
use crate::outcome::{SkipReason, StepOutcome};
use crate::params::{check_non_negative, check_probability, check_substance, check_weights};

/// Tunable constants of [`ApicalGrowth`].
#[derive(Clone, Debug, PartialEq)]
pub struct ApicalParams {
    /// Name of the guidance substance.
    pub substance: String,
    /// Direction component weights.
    pub weights: DirectionWeights,
    /// Elongation speed in length units per unit time.
    pub speed: f64,
    /// Diameter lost per step.
    pub shrink: f64,
    /// Segments at or below this diameter stop growing.
    pub min_diameter: f64,
    /// Per-step probability of a side branch.
    pub branch_probability: f64,
    /// Half-width of the uniform jitter added to the branch direction.
    pub branch_noise: f64,
    /// Diameter given to a new side branch.
    pub branch_diameter: f64,
}

impl Default for ApicalParams {
    fn default() -> Self {
        Self {
            substance: "apical".to_string(),
            weights: DirectionWeights::new(3.0, 0.04, 0.3),
            speed: 25.0,
            shrink: 0.001,
            min_diameter: 0.5,
            branch_probability: 0.033,
            branch_noise: 0.1,
            branch_diameter: 0.65,
        }
    }
}

/// Growth of an apical dendrite.
///
/// Each step, on a segment thicker than `min_diameter`:
///
/// 1. draw a noise vector in `[-1, 1)^3`,
/// 2. elongate along `3.0 * axis + 0.3 * noise + 0.04 * gradient` at speed 25,
/// 3. shrink the diameter by 0.001,
/// 4. if the segment may branch and is a terminal, with probability 0.033
///    sprout a side branch of diameter 0.65 that may not branch itself.
///
/// Propagated on `Branch` and `Bifurcation` by default.
#[derive(Clone, Debug, PartialEq)]
pub struct ApicalGrowth {
    params: ApicalParams,
    core: BehaviorCore,
    field: FieldCache,
}

impl Default for ApicalGrowth {
    fn default() -> Self {
        Self::from_parts(ApicalParams::default(), Self::default_mask())
    }
}

/// Builder for [`ApicalGrowth`].
///
/// Every field has a default; see [`ApicalParams`].
pub struct ApicalGrowthBuilder {
    params: ApicalParams,
    accepted: EventMask,
}

impl ApicalGrowth {
    /// Behavior with the default constants and mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for configuring an `ApicalGrowth` behavior.
    pub fn builder() -> ApicalGrowthBuilder {
        ApicalGrowthBuilder {
            params: ApicalParams::default(),
            accepted: Self::default_mask(),
        }
    }

    /// Events this variant propagates on unless overridden.
    pub fn default_mask() -> EventMask {
        EventMask::of(&[EventKind::Branch, EventKind::Bifurcation])
    }

    fn from_parts(params: ApicalParams, accepted: EventMask) -> Self {
        Self {
            params,
            core: BehaviorCore::new(accepted),
            field: FieldCache::new(),
        }
    }

    /// The configured constants.
    pub fn params(&self) -> &ApicalParams {
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

    /// Copy for a derived agent: same constants and mask, fresh state.
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
            trace!(behavior = "apical_growth", "skipped: not a neurite");
            return StepOutcome::Skipped(SkipReason::IncompatibleAgent);
        };
        if neurite.diameter() <= self.params.min_diameter {
            trace!(diameter = neurite.diameter(), "apical growth skipped: too thin");
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

        if neurite.can_branch()
            && neurite.is_terminal()
            && rng.uniform(0.0, 1.0) < self.params.branch_probability
        {
            let spread = self.params.branch_noise;
            let jitter = rng.uniform_vec3(-spread, spread);
            let heading = add(neurite.unit_direction(), jitter);
            let branch_direction = add(perp3(heading, rng.uniform(0.0, 1.0)), neurite.spring_axis());
            let child = neurite.branch(branch_direction);
            if let Some(branch) = neurite.derived_mut(child) {
                branch.set_can_branch(false);
                branch.set_diameter(self.params.branch_diameter);
            }
            debug!(%child, "apical side branch requested");
            return StepOutcome::Branched { child };
        }
        StepOutcome::Elongated
    }
}

impl ApicalGrowthBuilder {
    /// Set the guidance substance name (default: `"apical"`).
    pub fn substance(mut self, name: impl Into<String>) -> Self {
        self.params.substance = name.into();
        self
    }

    /// Set the direction weights (default: 3.0 / 0.04 / 0.3).
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

    /// Set the diameter at or below which growth stops (default: 0.5).
    pub fn min_diameter(mut self, min_diameter: f64) -> Self {
        self.params.min_diameter = min_diameter;
        self
    }

    /// Set the per-step branch probability (default: 0.033).
    pub fn branch_probability(mut self, p: f64) -> Self {
        self.params.branch_probability = p;
        self
    }

    /// Set the branch direction jitter half-width (default: 0.1).
    pub fn branch_noise(mut self, noise: f64) -> Self {
        self.params.branch_noise = noise;
        self
    }

    /// Set the diameter of new side branches (default: 0.65).
    pub fn branch_diameter(mut self, diameter: f64) -> Self {
        self.params.branch_diameter = diameter;
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
    /// Returns `Err` if:
    /// - the substance name is empty
    /// - a weight is not finite
    /// - `speed`, `shrink`, `min_diameter`, `branch_noise` or
    ///   `branch_diameter` is negative or NaN
    /// - `branch_probability` is outside `[0, 1]`
    pub fn build(self) -> Result<ApicalGrowth, String> {
        let p = &self.params;
        check_substance(&p.substance)?;
        check_weights(&p.weights)?;
        check_non_negative("speed", p.speed)?;
        check_non_negative("shrink", p.shrink)?;
        check_non_negative("min_diameter", p.min_diameter)?;
        check_non_negative("branch_noise", p.branch_noise)?;
        check_non_negative("branch_diameter", p.branch_diameter)?;
        check_probability("branch_probability", p.branch_probability)?;
        Ok(ApicalGrowth::from_parts(self.params, self.accepted))
    }
}
