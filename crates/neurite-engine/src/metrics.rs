//! Per-step counters for the simulation engine.

use neurite_growth::StepOutcome;

/// Counters and timings collected during a single step.
///
/// Durations are in microseconds. The world replaces its copy after each
/// `step()` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent running behaviors, in microseconds.
    pub behavior_us: u64,
    /// Time spent inserting new agents and discretizing, in microseconds.
    pub commit_us: u64,
    /// Time spent advancing the diffusion grids, in microseconds.
    pub field_us: u64,
    /// Behavior invocations, including skipped ones.
    pub behaviors_run: u32,
    /// Invocations that did nothing.
    pub behaviors_skipped: u32,
    /// Elongation requests.
    pub elongations: u32,
    /// Side branches created.
    pub branches: u32,
    /// Bifurcations performed.
    pub bifurcations: u32,
    /// Long segments split by discretization.
    pub splits: u32,
    /// Soma volume increases.
    pub volume_growths: u32,
    /// Soma divisions.
    pub divisions: u32,
    /// Agents inserted into the world this step.
    pub agents_created: u32,
}

impl StepMetrics {
    /// Count one behavior invocation.
    pub fn record(&mut self, outcome: StepOutcome) {
        self.behaviors_run += 1;
        match outcome {
            StepOutcome::Skipped(_) => self.behaviors_skipped += 1,
            StepOutcome::Elongated => self.elongations += 1,
            StepOutcome::Branched { .. } => {
                self.elongations += 1;
                self.branches += 1;
            }
            StepOutcome::Bifurcated { .. } => {
                self.elongations += 1;
                self.bifurcations += 1;
            }
            StepOutcome::Grew => self.volume_growths += 1,
            StepOutcome::Divided { .. } => self.divisions += 1,
        }
    }

    /// Add another set of counters into this one. Timings are left alone.
    pub fn merge_counts(&mut self, other: &StepMetrics) {
        self.behaviors_run += other.behaviors_run;
        self.behaviors_skipped += other.behaviors_skipped;
        self.elongations += other.elongations;
        self.branches += other.branches;
        self.bifurcations += other.bifurcations;
        self.splits += other.splits;
        self.volume_growths += other.volume_growths;
        self.divisions += other.divisions;
        self.agents_created += other.agents_created;
    }
}
