//! Soma growth and division.

use neurite_core::{AgentFacade, EventKind, EventMask};
use tracing::debug;

use crate::lifecycle::{BehaviorCore, Lifecycle};
use crate::outcome::{SkipReason, StepOutcome};
use crate::params::check_non_negative;

/// Tunable constants of [`GrowDivide`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowDivideParams {
    /// Diameter above which the soma divides instead of growing.
    pub threshold: f64,
    /// Volume growth rate.
    pub growth_rate: f64,
}

impl Default for GrowDivideParams {
    fn default() -> Self {
        Self {
            threshold: 8.0,
            growth_rate: 400.0,
        }
    }
}

/// Grow a soma until its diameter exceeds a threshold, then divide it.
///
/// Propagated on `Division` by default, so both halves keep dividing.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowDivide {
    params: GrowDivideParams,
    core: BehaviorCore,
}

impl Default for GrowDivide {
    fn default() -> Self {
        Self {
            params: GrowDivideParams::default(),
            core: BehaviorCore::new(Self::default_mask()),
        }
    }
}

/// Builder for [`GrowDivide`].
pub struct GrowDivideBuilder {
    params: GrowDivideParams,
    accepted: EventMask,
}

impl GrowDivide {
    /// Behavior with threshold 8 and growth rate 400.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for configuring a `GrowDivide` behavior.
    pub fn builder() -> GrowDivideBuilder {
        GrowDivideBuilder {
            params: GrowDivideParams::default(),
            accepted: Self::default_mask(),
        }
    }

    /// Events this variant propagates on unless overridden.
    pub fn default_mask() -> EventMask {
        EventMask::of(&[EventKind::Division])
    }

    /// The configured constants.
    pub fn params(&self) -> GrowDivideParams {
        self.params
    }

    /// Events this instance propagates on.
    pub fn accepted_events(&self) -> EventMask {
        self.core.accepted()
    }

    /// Lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.core.state()
    }

    pub(crate) fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    pub(crate) fn derive(&self) -> Self {
        Self {
            params: self.params,
            core: self.core.derive(),
        }
    }

    /// Run one step on `agent`.
    pub fn run(&mut self, agent: &mut dyn AgentFacade) -> StepOutcome {
        if self.core.state() == Lifecycle::Removed {
            return StepOutcome::Skipped(SkipReason::Removed);
        }
        self.core.on_run();
        let Some(soma) = agent.as_soma() else {
            return StepOutcome::Skipped(SkipReason::IncompatibleAgent);
        };
        if !soma.can_divide() {
            return StepOutcome::Skipped(SkipReason::CannotDivide);
        }
        if soma.diameter() <= self.params.threshold {
            soma.change_volume(self.params.growth_rate);
            StepOutcome::Grew
        } else {
            let daughter = soma.divide();
            debug!(%daughter, diameter = soma.diameter(), "soma division requested");
            StepOutcome::Divided { daughter }
        }
    }
}

impl GrowDivideBuilder {
    /// Set the division threshold diameter (default: 8).
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.params.threshold = threshold;
        self
    }

    /// Set the volume growth rate (default: 400).
    pub fn growth_rate(mut self, rate: f64) -> Self {
        self.params.growth_rate = rate;
        self
    }

    /// Set the events the behavior propagates on (default: division).
    pub fn accepted_events(mut self, mask: EventMask) -> Self {
        self.accepted = mask;
        self
    }

    /// Build the behavior.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `threshold` or `growth_rate` is negative or NaN.
    pub fn build(self) -> Result<GrowDivide, String> {
        check_non_negative("threshold", self.params.threshold)?;
        check_non_negative("growth_rate", self.params.growth_rate)?;
        Ok(GrowDivide {
            params: self.params,
            core: BehaviorCore::new(self.accepted),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurite_test_utils::{MockNeurite, MockSoma};

    #[test]
    fn grows_below_threshold() {
        let mut behavior = GrowDivide::new();
        let mut soma = MockSoma::new().with_diameter(6.0);
        assert_eq!(behavior.run(&mut soma), StepOutcome::Grew);
        assert_eq!(soma.volume_changes(), 1);
        assert_eq!(soma.last_volume_speed(), Some(400.0));
        assert_eq!(soma.divisions(), 0);
    }

    #[test]
    fn divides_above_threshold() {
        let mut behavior = GrowDivide::new();
        let mut soma = MockSoma::new().with_diameter(8.5);
        let outcome = behavior.run(&mut soma);
        assert!(matches!(outcome, StepOutcome::Divided { .. }));
        assert_eq!(soma.divisions(), 1);
        assert_eq!(soma.volume_changes(), 0);
    }

    #[test]
    fn threshold_itself_still_grows() {
        let mut behavior = GrowDivide::new();
        let mut soma = MockSoma::new().with_diameter(8.0);
        assert_eq!(behavior.run(&mut soma), StepOutcome::Grew);
    }

    #[test]
    fn respects_can_divide() {
        let mut behavior = GrowDivide::new();
        let mut soma = MockSoma::new().with_diameter(9.0).with_can_divide(false);
        assert_eq!(
            behavior.run(&mut soma),
            StepOutcome::Skipped(SkipReason::CannotDivide)
        );
        assert_eq!(soma.divisions(), 0);
    }

    #[test]
    fn neurite_is_incompatible() {
        let mut behavior = GrowDivide::new();
        let mut neurite = MockNeurite::new();
        assert_eq!(
            behavior.run(&mut neurite),
            StepOutcome::Skipped(SkipReason::IncompatibleAgent)
        );
    }

    #[test]
    fn builder_rejects_nan_rate() {
        let result = GrowDivide::builder().growth_rate(f64::NAN).build();
        assert!(result.unwrap_err().contains("growth_rate"));
    }
}
