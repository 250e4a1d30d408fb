//! Run-wide engine configuration.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Settings shared by every plan created within one test run.
///
/// Built once per `lc test` invocation and handed around as `Arc<Config>`;
/// read-only after construction. The cancellation token is the run-wide
/// stop signal (user interrupt, enclosing deadline) and is observed by
/// every polling loop in the engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default window for `eventually()` when `within()` is not called.
    pub default_retry_timeout: Duration,

    /// Default window for `consistently()` when `hold_for()` is not called.
    pub default_consistency_duration: Duration,

    /// Run-wide cancellation signal.
    pub cancellation: CancellationToken,
}

impl Config {
    /// Create a configuration with the standard defaults.
    pub fn new() -> Self {
        Self {
            default_retry_timeout: Duration::from_secs(10),
            default_consistency_duration: Duration::from_secs(1),
            cancellation: CancellationToken::new(),
        }
    }

    /// Override the default retry timeout.
    pub fn with_retry_timeout(mut self, timeout: Duration) -> Self {
        self.default_retry_timeout = timeout;
        self
    }

    /// Override the default consistency window.
    pub fn with_consistency_duration(mut self, duration: Duration) -> Self {
        self.default_consistency_duration = duration;
        self
    }

    /// Attach an externally-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.default_retry_timeout, Duration::from_secs(10));
        assert_eq!(config.default_consistency_duration, Duration::from_secs(1));
        assert!(!config.cancellation.is_cancelled());
    }

    #[test]
    fn test_builder_overrides() {
        let token = CancellationToken::new();
        let config = Config::new()
            .with_retry_timeout(Duration::from_secs(3))
            .with_consistency_duration(Duration::from_millis(500))
            .with_cancellation(token.clone());

        assert_eq!(config.default_retry_timeout, Duration::from_secs(3));
        assert_eq!(config.default_consistency_duration, Duration::from_millis(500));

        token.cancel();
        assert!(config.cancellation.is_cancelled());
    }
}
