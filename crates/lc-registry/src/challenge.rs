//! Challenge and stage definitions.

use lc_attest::{Config, Suite};
use std::sync::Arc;
use thiserror::Error;

/// Registry lookup errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown challenge '{key}'")]
    UnknownChallenge { key: String },

    #[error("unknown stage '{key}' in challenge '{challenge}'")]
    UnknownStage { challenge: String, key: String },
}

/// How the learner's program is exercised.
///
/// Decides whether `lc test` supervises a long-lived `run.sh` process
/// (HTTP challenges) or lets the stage suites invoke it per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    /// The program is a server; `run.sh` is started before the suite and
    /// probed over HTTP.
    HttpServer,

    /// The program is a command; suites invoke it directly.
    Cli,
}

/// One stage of a challenge.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Stable key, used in `lc.state` and on the command line.
    pub key: &'static str,

    /// Human-readable name.
    pub name: &'static str,

    /// Builds the stage's test suite against the run-wide config.
    pub suite: fn(Arc<Config>) -> Suite,
}

/// A challenge: ordered stages plus presentation metadata.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub key: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub kind: ChallengeKind,
    stages: Vec<Stage>,
}

impl Challenge {
    /// # Panics
    ///
    /// Panics in debug builds when `stages` is empty - a challenge without
    /// stages is a bug in its bundled definition, not a runtime condition.
    pub fn new(
        key: &'static str,
        name: &'static str,
        summary: &'static str,
        kind: ChallengeKind,
        stages: Vec<Stage>,
    ) -> Self {
        debug_assert!(!stages.is_empty(), "a challenge needs at least one stage");
        Self {
            key,
            name,
            summary,
            kind,
            stages,
        }
    }

    /// Stages in progression order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stage a fresh challenge starts on.
    pub fn first_stage(&self) -> &Stage {
        &self.stages[0]
    }

    /// Look up a stage by key.
    pub fn stage(&self, key: &str) -> Result<&Stage, RegistryError> {
        self.stages
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| RegistryError::UnknownStage {
                challenge: self.key.to_string(),
                key: key.to_string(),
            })
    }

    /// Position of a stage in the progression, if it exists.
    pub fn stage_index(&self, key: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.key == key)
    }

    /// Render the scaffolded README for this challenge.
    pub fn readme(&self) -> String {
        let mut text = format!("# {}\n\n{}\n\n## Stages\n\n", self.name, self.summary);
        for stage in &self.stages {
            text.push_str(&format!("- `{}` - {}\n", stage.key, stage.name));
        }
        text.push_str(
            "\nImplement each stage in order. Run `lc test` to check the \
             current stage and `lc next` to advance.\n",
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_suite(config: Arc<Config>) -> Suite {
        Suite::new(config)
    }

    fn sample() -> Challenge {
        Challenge::new(
            "sample",
            "Sample Challenge",
            "A challenge for tests.",
            ChallengeKind::Cli,
            vec![
                Stage {
                    key: "one",
                    name: "Stage One",
                    suite: empty_suite,
                },
                Stage {
                    key: "two",
                    name: "Stage Two",
                    suite: empty_suite,
                },
            ],
        )
    }

    #[test]
    fn test_stage_lookup_and_order() {
        let challenge = sample();
        assert_eq!(challenge.len(), 2);
        assert_eq!(challenge.first_stage().key, "one");
        assert_eq!(challenge.stage("two").expect("stage").name, "Stage Two");
        assert_eq!(challenge.stage_index("two"), Some(1));
        assert_eq!(challenge.stage_index("three"), None);
    }

    #[test]
    fn test_unknown_stage_errors_with_both_keys() {
        let err = sample().stage("missing").expect_err("should not resolve");
        let text = err.to_string();
        assert!(text.contains("missing"));
        assert!(text.contains("sample"));
    }

    #[test]
    #[should_panic(expected = "at least one stage")]
    fn test_empty_challenge_is_rejected() {
        let _ = Challenge::new("empty", "Empty", "No stages.", ChallengeKind::Cli, Vec::new());
    }

    #[test]
    fn test_readme_lists_stages() {
        let readme = sample().readme();
        assert!(readme.contains("# Sample Challenge"));
        assert!(readme.contains("`one` - Stage One"));
        assert!(readme.contains("`two` - Stage Two"));
    }
}
