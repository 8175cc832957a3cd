use super::evaluator::Backend;
use std::time::Duration;

/// Outcome of one Metropolis step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Index of the molecule that was moved.
    pub molecule: usize,
    pub accepted: bool,
    /// Change of the moved molecule's interaction energy caused by the proposal.
    pub delta: f64,
}

/// Aggregate results of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub backend: Backend,
    /// The step the run started at; non-zero for resumed runs.
    pub step_start: usize,
    pub steps: usize,
    pub molecule_count: usize,
    pub initial_energy: f64,
    /// Running total: the initial energy plus every accepted delta.
    pub final_energy: f64,
    pub accepted: usize,
    pub rejected: usize,
    pub run_time: Duration,
}

impl RunSummary {
    /// The step the next run would start at when resuming from this one.
    pub fn final_step(&self) -> usize {
        self.step_start + self.steps
    }

    /// Percentage of proposals that were accepted; zero for an empty run.
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.accepted + self.rejected;
        if total == 0 {
            0.0
        } else {
            100.0 * self.accepted as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(accepted: usize, rejected: usize) -> RunSummary {
        RunSummary {
            backend: Backend::Sequential,
            step_start: 100,
            steps: accepted + rejected,
            molecule_count: 5,
            initial_energy: -1.0,
            final_energy: -2.0,
            accepted,
            rejected,
            run_time: Duration::from_millis(5),
        }
    }

    #[test]
    fn acceptance_rate_is_a_percentage() {
        assert_eq!(summary(3, 1).acceptance_rate(), 75.0);
        assert_eq!(summary(0, 0).acceptance_rate(), 0.0);
    }

    #[test]
    fn final_step_continues_from_start() {
        assert_eq!(summary(6, 4).final_step(), 110);
    }
}
