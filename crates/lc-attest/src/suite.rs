//! Suite aggregation and reporting.

use crate::config::Config;
use crate::verdict::{Outcome, Verdict};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

type CheckFn = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Verdict> + Send>> + Send>;

/// The outcome of one named check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub verdict: Verdict,
}

/// All check outcomes for a stage, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub checks: Vec<CheckReport>,
}

impl SuiteReport {
    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.verdict.passed())
    }

    /// Number of checks that passed.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.verdict.passed()).count()
    }

    /// Number of checks that failed.
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count()
    }
}

/// An ordered collection of named checks for one stage.
///
/// Checks are declared as closures capturing their asserts and run
/// sequentially in declaration order. The suite runs every check - no
/// short-circuit - so the learner always sees the complete report, then
/// reduces to a single pass/fail.
pub struct Suite {
    config: Arc<Config>,
    checks: Vec<(String, CheckFn)>,
}

impl Suite {
    /// Create an empty suite bound to the run's config.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            checks: Vec::new(),
        }
    }

    /// The run-wide config, for building plans inside check closures.
    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Declare a named check.
    pub fn check<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Verdict> + Send + 'static,
    {
        self.checks.push((
            name.into(),
            Box::new(move || {
                let fut: Pin<Box<dyn Future<Output = Verdict> + Send>> = Box::pin(f());
                fut
            }),
        ));
    }

    /// Run every check in declaration order, print the report, and return
    /// it.
    pub async fn run(self) -> SuiteReport {
        let mut reports = Vec::with_capacity(self.checks.len());

        for (name, check) in self.checks {
            info!(check = %name, "running check");
            let verdict = check().await;
            print_check(&name, &verdict);
            reports.push(CheckReport { name, verdict });
        }

        let report = SuiteReport { checks: reports };
        println!(
            "\n{} passed, {} failed",
            report.passed_count(),
            report.failed_count()
        );
        report
    }
}

fn print_check(name: &str, verdict: &Verdict) {
    if verdict.passed() {
        println!("{} {name}", "✓".green());
        return;
    }

    let label = match verdict.outcome {
        Outcome::TimedOut => " (timed out)",
        Outcome::Cancelled => " (cancelled)",
        _ => "",
    };
    println!("{} {name}{label}", "✗".red());
    println!("    last observation: {}", verdict.last_observation);
    println!(
        "    attempts: {}, elapsed: {:?}",
        verdict.attempts, verdict.elapsed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn verdict(outcome: Outcome) -> Verdict {
        Verdict {
            outcome,
            last_observation: "exit code 1".to_string(),
            attempts: 1,
            elapsed: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_suite_runs_checks_in_declaration_order() {
        let mut suite = Suite::new(Arc::new(Config::new()));
        suite.check("first", || async { verdict(Outcome::Passed) });
        suite.check("second", || async { verdict(Outcome::Failed) });
        suite.check("third", || async { verdict(Outcome::Passed) });

        let report = suite.run().await;
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_suite_does_not_short_circuit() {
        let mut suite = Suite::new(Arc::new(Config::new()));
        suite.check("fails", || async { verdict(Outcome::Failed) });
        suite.check("still runs", || async { verdict(Outcome::Passed) });

        let report = suite.run().await;
        assert!(!report.passed());
        assert_eq!(report.checks.len(), 2);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_suite_passes() {
        let suite = Suite::new(Arc::new(Config::new()));
        let report = suite.run().await;
        assert!(report.passed());
        assert_eq!(report.checks.len(), 0);
    }
}
