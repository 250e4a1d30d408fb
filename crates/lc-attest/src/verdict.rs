//! Check results.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a check concluded.
///
/// `Cancelled` is deliberately distinct from `TimedOut` so callers can tell
/// "ran out of time" from "was told to stop".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The predicate held under the plan's timing strategy.
    Passed,

    /// The predicate failed and retrying could not (or may not) help:
    /// an immediate miss, a consistency break, or an infrastructure fault.
    Failed,

    /// The retry window expired without the predicate ever holding.
    TimedOut,

    /// The run's cancellation token fired before the check concluded.
    Cancelled,
}

/// The result contract every check method returns.
///
/// Carries the last observation regardless of outcome so a failure report
/// can show what was actually seen on the final attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// How the check concluded.
    pub outcome: Outcome,

    /// Human-readable description of the last observation (or of the
    /// infrastructure fault / cancellation that ended the check).
    pub last_observation: String,

    /// Number of probe attempts issued.
    pub attempts: u32,

    /// Wall time spent in the check, measured monotonically.
    pub elapsed: Duration,
}

impl Verdict {
    /// Whether this check passed.
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub(crate) fn new(
        outcome: Outcome,
        last_observation: impl Into<String>,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            outcome,
            last_observation: last_observation.into(),
            attempts,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_passed_outcome_passes() {
        for (outcome, expected) in [
            (Outcome::Passed, true),
            (Outcome::Failed, false),
            (Outcome::TimedOut, false),
            (Outcome::Cancelled, false),
        ] {
            let verdict = Verdict::new(outcome, "obs", 1, Duration::ZERO);
            assert_eq!(verdict.passed(), expected, "{outcome:?}");
        }
    }

    #[test]
    fn test_cancelled_distinguishable_from_timeout() {
        let cancelled = Verdict::new(Outcome::Cancelled, "cancelled", 3, Duration::ZERO);
        let timed_out = Verdict::new(Outcome::TimedOut, "exit code 1", 3, Duration::ZERO);
        assert_ne!(cancelled.outcome, timed_out.outcome);
    }
}
