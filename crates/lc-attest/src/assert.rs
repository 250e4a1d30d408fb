//! Finalized asserts and the polling/verdict engine.
//!
//! An assert wraps a finalized plan plus the shared [`Config`]; it is
//! stateless beyond that, so every check call is an independent execution
//! under the plan's timing strategy. The evaluation loop is written once,
//! against the shared probe abstraction, and both assert kinds reduce their
//! check methods to a predicate over [`Observation`]s.

use crate::config::Config;
use crate::observation::{Observation, Probe};
use crate::timing::{Timing, POLL_INTERVAL};
use crate::verdict::{Outcome, Verdict};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Execute `probe` under `timing`, evaluating `predicate` on every
/// observation, and reduce to a [`Verdict`].
async fn evaluate<P>(
    config: &Config,
    timing: Timing,
    probe: &Probe,
    what: &str,
    predicate: P,
) -> Verdict
where
    P: Fn(&Observation) -> bool,
{
    let start = Instant::now();

    match timing {
        Timing::Immediate => {
            if config.cancellation.is_cancelled() {
                return Verdict::new(Outcome::Cancelled, "cancelled", 0, start.elapsed());
            }
            match probe.run_once().await {
                Ok(obs) => {
                    let outcome = if predicate(&obs) {
                        Outcome::Passed
                    } else {
                        Outcome::Failed
                    };
                    Verdict::new(outcome, obs.to_string(), 1, start.elapsed())
                }
                Err(err) => Verdict::new(Outcome::Failed, err.to_string(), 1, start.elapsed()),
            }
        }

        Timing::Eventually(window) => {
            let mut attempts = 0u32;
            loop {
                if config.cancellation.is_cancelled() {
                    return Verdict::new(Outcome::Cancelled, "cancelled", attempts, start.elapsed());
                }

                attempts += 1;
                let last = match probe.run_once().await {
                    Ok(obs) => {
                        if predicate(&obs) {
                            debug!(what, attempts, elapsed = ?start.elapsed(), "check passed");
                            return Verdict::new(
                                Outcome::Passed,
                                obs.to_string(),
                                attempts,
                                start.elapsed(),
                            );
                        }
                        obs.to_string()
                    }
                    // Infrastructure fault: retrying cannot fix a malformed
                    // request or a missing binary.
                    Err(err) => {
                        return Verdict::new(
                            Outcome::Failed,
                            err.to_string(),
                            attempts,
                            start.elapsed(),
                        )
                    }
                };

                debug!(what, attempts, last, "check not satisfied yet");

                if start.elapsed() >= window {
                    return Verdict::new(Outcome::TimedOut, last, attempts, start.elapsed());
                }

                tokio::select! {
                    _ = config.cancellation.cancelled() => {
                        return Verdict::new(Outcome::Cancelled, "cancelled", attempts, start.elapsed());
                    }
                    _ = tokio::time::sleep(POLL_INTERVAL) => {}
                }
            }
        }

        Timing::Consistently(window) => {
            let mut attempts = 0u32;
            loop {
                if config.cancellation.is_cancelled() {
                    return Verdict::new(Outcome::Cancelled, "cancelled", attempts, start.elapsed());
                }

                attempts += 1;
                let last = match probe.run_once().await {
                    Ok(obs) => {
                        // Fail fast on the first bad poll: the "stays true"
                        // claim is already broken, do not wait out the window.
                        if !predicate(&obs) {
                            debug!(what, attempts, elapsed = ?start.elapsed(), "consistency broken");
                            return Verdict::new(
                                Outcome::Failed,
                                obs.to_string(),
                                attempts,
                                start.elapsed(),
                            );
                        }
                        obs.to_string()
                    }
                    Err(err) => {
                        return Verdict::new(
                            Outcome::Failed,
                            err.to_string(),
                            attempts,
                            start.elapsed(),
                        )
                    }
                };

                if start.elapsed() >= window {
                    return Verdict::new(Outcome::Passed, last, attempts, start.elapsed());
                }

                tokio::select! {
                    _ = config.cancellation.cancelled() => {
                        return Verdict::new(Outcome::Cancelled, "cancelled", attempts, start.elapsed());
                    }
                    _ = tokio::time::sleep(POLL_INTERVAL) => {}
                }
            }
        }
    }
}

/// Checks over HTTP observations.
#[derive(Debug, Clone)]
pub struct HttpAssert {
    pub(crate) config: Arc<Config>,
    pub(crate) timing: Timing,
    pub(crate) probe: Probe,
}

impl HttpAssert {
    async fn check<P>(&self, what: &str, predicate: P) -> Verdict
    where
        P: Fn(&Observation) -> bool,
    {
        evaluate(&self.config, self.timing, &self.probe, what, predicate).await
    }

    /// Any HTTP response came back at all, whatever the status.
    pub async fn responds(&self) -> Verdict {
        self.check("any response", |obs| {
            matches!(obs, Observation::Response { .. })
        })
        .await
    }

    /// The response status equals `expected`.
    pub async fn status(&self, expected: u16) -> Verdict {
        self.check(&format!("status == {expected}"), move |obs| {
            matches!(obs, Observation::Response { status, .. } if *status == expected)
        })
        .await
    }

    /// The response status is in the 2xx range.
    pub async fn status_ok(&self) -> Verdict {
        self.check("status is 2xx", |obs| {
            matches!(obs, Observation::Response { status, .. } if (200..300).contains(status))
        })
        .await
    }

    /// The response body equals `expected` exactly.
    pub async fn body_equals(&self, expected: &str) -> Verdict {
        self.check(&format!("body == {expected:?}"), move |obs| {
            matches!(obs, Observation::Response { body, .. } if body == expected.as_bytes())
        })
        .await
    }

    /// The response body contains `needle`.
    pub async fn body_contains(&self, needle: &str) -> Verdict {
        self.check(&format!("body contains {needle:?}"), move |obs| {
            matches!(obs, Observation::Response { body, .. }
                if String::from_utf8_lossy(body).contains(needle))
        })
        .await
    }

    /// The response carries header `name` (case-insensitive) with exactly
    /// `value`.
    pub async fn header(&self, name: &str, value: &str) -> Verdict {
        self.check(&format!("header {name}: {value}"), move |obs| {
            matches!(obs, Observation::Response { headers, .. }
                if headers
                    .iter()
                    .any(|(n, v)| n.eq_ignore_ascii_case(name) && v == value))
        })
        .await
    }
}

/// Checks over CLI observations.
#[derive(Debug, Clone)]
pub struct CliAssert {
    pub(crate) config: Arc<Config>,
    pub(crate) timing: Timing,
    pub(crate) probe: Probe,
}

impl CliAssert {
    async fn check<P>(&self, what: &str, predicate: P) -> Verdict
    where
        P: Fn(&Observation) -> bool,
    {
        evaluate(&self.config, self.timing, &self.probe, what, predicate).await
    }

    /// The command exited with `expected`.
    pub async fn exit_code(&self, expected: i32) -> Verdict {
        self.check(&format!("exit code == {expected}"), move |obs| {
            matches!(obs, Observation::Exit { code: Some(code), .. } if *code == expected)
        })
        .await
    }

    /// The command exited with 0.
    pub async fn succeeds(&self) -> Verdict {
        self.exit_code(0).await
    }

    /// Stdout equals `expected` exactly (including any trailing newline).
    pub async fn stdout_equals(&self, expected: &str) -> Verdict {
        self.check(&format!("stdout == {expected:?}"), move |obs| {
            matches!(obs, Observation::Exit { stdout, .. } if stdout == expected)
        })
        .await
    }

    /// Stdout contains `needle`.
    pub async fn stdout_contains(&self, needle: &str) -> Verdict {
        self.check(&format!("stdout contains {needle:?}"), move |obs| {
            matches!(obs, Observation::Exit { stdout, .. } if stdout.contains(needle))
        })
        .await
    }

    /// Stderr contains `needle`.
    pub async fn stderr_contains(&self, needle: &str) -> Verdict {
        self.check(&format!("stderr contains {needle:?}"), move |obs| {
            matches!(obs, Observation::Exit { stderr, .. } if stderr.contains(needle))
        })
        .await
    }
}
