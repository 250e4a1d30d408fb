//! Plan builders.
//!
//! A plan is an immutable description of one probe plus a timing selection.
//! The builder methods consume and return the plan, so a plan cannot change
//! after [`HttpPlan::into_assert`] / [`CliPlan::into_assert`] - ownership
//! enforces the "immutable once finalized" rule.

use crate::assert::{CliAssert, HttpAssert};
use crate::config::Config;
use crate::observation::Probe;
use crate::timing::Timing;
use reqwest::Method;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Client-side cap on any single HTTP probe. The engine's timing window
/// bounds its own polling, not a hung request; this is the probe's own
/// timeout.
const HTTP_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A plan for one HTTP request.
#[derive(Debug, Clone)]
pub struct HttpPlan {
    config: Arc<Config>,
    timing: Timing,
    method: Method,
    url: String,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl HttpPlan {
    /// Plan a request with an arbitrary method.
    pub fn request(config: Arc<Config>, method: Method, url: impl Into<String>) -> Self {
        Self {
            config,
            timing: Timing::Immediate,
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Plan a GET request.
    pub fn get(config: Arc<Config>, url: impl Into<String>) -> Self {
        Self::request(config, Method::GET, url)
    }

    /// Plan a POST request.
    pub fn post(config: Arc<Config>, url: impl Into<String>) -> Self {
        Self::request(config, Method::POST, url)
    }

    /// Plan a PUT request.
    pub fn put(config: Arc<Config>, url: impl Into<String>) -> Self {
        Self::request(config, Method::PUT, url)
    }

    /// Plan a DELETE request.
    pub fn delete(config: Arc<Config>, url: impl Into<String>) -> Self {
        Self::request(config, Method::DELETE, url)
    }

    /// Set a request header. Re-setting a name replaces its value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Retry until success, for the configured default retry timeout.
    pub fn eventually(mut self) -> Self {
        self.timing = self.timing.eventually(&self.config);
        self
    }

    /// Override the retry window.
    ///
    /// # Panics
    ///
    /// Panics unless [`eventually`](Self::eventually) was called first.
    pub fn within(mut self, window: Duration) -> Self {
        self.timing = self.timing.within(window);
        self
    }

    /// Require success for the configured default consistency window.
    pub fn consistently(mut self) -> Self {
        self.timing = self.timing.consistently(&self.config);
        self
    }

    /// Override the consistency window. (`for` is reserved in Rust; this is
    /// the `For` operation.)
    ///
    /// # Panics
    ///
    /// Panics unless [`consistently`](Self::consistently) was called first.
    pub fn hold_for(mut self, window: Duration) -> Self {
        self.timing = self.timing.hold_for(window);
        self
    }

    /// Finalize the plan into its assert.
    pub fn into_assert(self) -> HttpAssert {
        let client = reqwest::Client::builder()
            .timeout(HTTP_PROBE_TIMEOUT)
            .user_agent(concat!("lc-attest/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        HttpAssert {
            config: self.config,
            timing: self.timing,
            probe: Probe::Http {
                client,
                method: self.method,
                url: self.url,
                headers: self.headers,
                body: self.body,
            },
        }
    }
}

/// A plan for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliPlan {
    config: Arc<Config>,
    timing: Timing,
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliPlan {
    /// Plan an invocation of `program`.
    pub fn command(config: Arc<Config>, program: impl Into<String>) -> Self {
        Self {
            config,
            timing: Timing::Immediate,
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Add an environment variable for the invocation.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Retry until success, for the configured default retry timeout.
    pub fn eventually(mut self) -> Self {
        self.timing = self.timing.eventually(&self.config);
        self
    }

    /// Override the retry window.
    ///
    /// # Panics
    ///
    /// Panics unless [`eventually`](Self::eventually) was called first.
    pub fn within(mut self, window: Duration) -> Self {
        self.timing = self.timing.within(window);
        self
    }

    /// Require success for the configured default consistency window.
    pub fn consistently(mut self) -> Self {
        self.timing = self.timing.consistently(&self.config);
        self
    }

    /// Override the consistency window.
    ///
    /// # Panics
    ///
    /// Panics unless [`consistently`](Self::consistently) was called first.
    pub fn hold_for(mut self, window: Duration) -> Self {
        self.timing = self.timing.hold_for(window);
        self
    }

    /// Finalize the plan into its assert.
    pub fn into_assert(self) -> CliAssert {
        CliAssert {
            config: self.config,
            timing: self.timing,
            probe: Probe::Cli {
                program: self.program,
                args: self.args,
                current_dir: self.current_dir,
                envs: self.envs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<Config> {
        Arc::new(Config::new())
    }

    #[test]
    fn test_http_plan_defaults_to_immediate() {
        let plan = HttpPlan::get(config(), "http://localhost:4221/");
        assert_eq!(plan.timing, Timing::Immediate);
    }

    #[test]
    fn test_http_plan_timing_chain() {
        let plan = HttpPlan::get(config(), "http://localhost:4221/")
            .eventually()
            .within(Duration::from_secs(2));
        assert_eq!(plan.timing, Timing::Eventually(Duration::from_secs(2)));
    }

    #[test]
    fn test_http_plan_header_replaces_value() {
        let plan = HttpPlan::get(config(), "http://localhost:4221/")
            .header("accept", "text/plain")
            .header("accept", "application/json");
        assert_eq!(
            plan.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_cli_plan_collects_args() {
        let plan = CliPlan::command(config(), "grep")
            .arg("-c")
            .args(["needle", "haystack.txt"]);
        assert_eq!(plan.args, vec!["-c", "needle", "haystack.txt"]);
    }

    #[test]
    #[should_panic(expected = "within() can only be called after eventually()")]
    fn test_within_before_eventually_panics() {
        let _ = HttpPlan::get(config(), "http://localhost:4221/").within(Duration::from_secs(1));
    }

    #[test]
    #[should_panic(expected = "hold_for() can only be called after consistently()")]
    fn test_hold_for_before_consistently_panics() {
        let _ = CliPlan::command(config(), "echo").hold_for(Duration::from_secs(1));
    }
}
