//! lc-attest - Assertion and retry engine for challenge test suites
//!
//! A stage's test function declares *plans* (an HTTP request or a CLI
//! invocation), attaches a timing strategy, and finalizes each plan into an
//! assert whose check methods execute the probe and return a [`Verdict`]:
//!
//! - `Immediate` (the default): probe once, evaluate once.
//! - `Eventually`: retry until the predicate holds or the window expires.
//! - `Consistently`: require the predicate to hold for the entire window.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # use lc_attest::{Config, HttpPlan};
//! # async fn demo() {
//! let config = Arc::new(Config::new());
//! let verdict = HttpPlan::get(config, "http://localhost:4221/health")
//!     .eventually()
//!     .within(Duration::from_secs(2))
//!     .into_assert()
//!     .status(200)
//!     .await;
//! assert!(verdict.passed());
//! # }
//! ```

pub mod assert;
pub mod config;
pub mod error;
pub mod observation;
pub mod plan;
pub mod suite;
pub mod timing;
pub mod verdict;

// Re-export key types
pub use assert::{CliAssert, HttpAssert};
pub use config::Config;
pub use error::ProbeError;
pub use observation::Observation;
pub use plan::{CliPlan, HttpPlan};
pub use suite::{CheckReport, Suite, SuiteReport};
pub use timing::Timing;
pub use verdict::{Outcome, Verdict};
