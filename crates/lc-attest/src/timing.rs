//! Timing strategy state machine.

use crate::config::Config;
use std::time::Duration;

/// Interval between probe attempts for the retrying strategies.
///
/// Short enough to observe sub-second transients; callers must not rely on
/// an exact attempt count.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// When a plan's checks are evaluated.
///
/// Every plan starts out `Immediate`. The builder methods on the plan types
/// move it to `Eventually` (retry until success or the window expires) or
/// `Consistently` (require success for the whole window), each carrying its
/// window duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Probe exactly once.
    Immediate,

    /// Retry until the predicate holds or the window expires.
    Eventually(Duration),

    /// Require the predicate to hold on every poll through the window.
    Consistently(Duration),
}

impl Timing {
    /// Transition to `Eventually` with the configured default window.
    pub(crate) fn eventually(self, config: &Config) -> Self {
        Timing::Eventually(config.default_retry_timeout)
    }

    /// Override the `Eventually` window.
    ///
    /// # Panics
    ///
    /// Panics when the plan is not in `Eventually` - that is a bug in the
    /// calling test code, not a test failure, and must not reach the
    /// verdict channel.
    pub(crate) fn within(self, window: Duration) -> Self {
        match self {
            Timing::Eventually(_) => Timing::Eventually(window),
            _ => panic!("within() can only be called after eventually()"),
        }
    }

    /// Transition to `Consistently` with the configured default window.
    pub(crate) fn consistently(self, config: &Config) -> Self {
        Timing::Consistently(config.default_consistency_duration)
    }

    /// Override the `Consistently` window.
    ///
    /// # Panics
    ///
    /// Panics when the plan is not in `Consistently`.
    pub(crate) fn hold_for(self, window: Duration) -> Self {
        match self {
            Timing::Consistently(_) => Timing::Consistently(window),
            _ => panic!("hold_for() can only be called after consistently()"),
        }
    }
}
