// crate modules
use crate::accumulator::StepOutcome;

// lettools modules
use lettools_utils::f;

// external crates
use serde::Serialize;

/// Running counts of what the accumulator has seen
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AccumulatorStats {
    /// Number of runs started
    pub runs: u64,
    /// Number of events started
    pub events: u64,
    /// Steps added to the grids
    pub recorded: u64,
    /// Steps dropped for a zero weighted deposit
    pub zero_deposit: u64,
    /// Steps dropped for being outside the grid
    pub outside_grid: u64,
    /// Steps dropped after a failed physics lookup
    pub lookup_skipped: u64,
}

impl AccumulatorStats {
    /// Count one step by its outcome
    pub fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Recorded => self.recorded += 1,
            StepOutcome::ZeroDeposit => self.zero_deposit += 1,
            StepOutcome::OutsideGrid => self.outside_grid += 1,
            StepOutcome::LookupSkipped => self.lookup_skipped += 1,
        }
    }

    /// Total number of steps seen, recorded or not
    pub fn steps(&self) -> u64 {
        self.recorded + self.zero_deposit + self.outside_grid + self.lookup_skipped
    }

    /// Add the counts from another accumulator
    pub fn merge(&mut self, other: &AccumulatorStats) {
        self.runs += other.runs;
        self.events += other.events;
        self.recorded += other.recorded;
        self.zero_deposit += other.zero_deposit;
        self.outside_grid += other.outside_grid;
        self.lookup_skipped += other.lookup_skipped;
    }
}

impl std::fmt::Display for AccumulatorStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = f!(
            "{} runs, {} events, {} steps ({} recorded, {} zero deposit, {} outside, {} skipped)",
            self.runs,
            self.events,
            self.steps(),
            self.recorded,
            self.zero_deposit,
            self.outside_grid,
            self.lookup_skipped
        );
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn counts_by_outcome() {
        let mut stats = AccumulatorStats::default();
        stats.record(StepOutcome::Recorded);
        stats.record(StepOutcome::Recorded);
        stats.record(StepOutcome::OutsideGrid);
        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.steps(), 3);
    }

    #[rstest]
    fn merge_and_display() {
        let mut a = AccumulatorStats {
            runs: 1,
            recorded: 4,
            ..Default::default()
        };
        let b = AccumulatorStats {
            events: 10,
            lookup_skipped: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(
            a.to_string(),
            "1 runs, 10 events, 5 steps (4 recorded, 0 zero deposit, 0 outside, 1 skipped)"
        );
    }
}
