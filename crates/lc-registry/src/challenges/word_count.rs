//! The "word-count" challenge: build a wc-style counting tool.
//!
//! CLI challenge: the suites invoke the learner's `run.sh` directly, once
//! per probe, instead of supervising a long-lived server.

use crate::challenge::{Challenge, ChallengeKind, Stage};
use lc_attest::{CliPlan, Config, Suite};
use std::sync::Arc;

const PROGRAM: &str = "./run.sh";

pub fn challenge() -> Challenge {
    Challenge::new(
        "word-count",
        "Build a Word Counter",
        "Implement a wc-style tool that counts lines, words and bytes in files.",
        ChallengeKind::Cli,
        vec![
            Stage {
                key: "exit-clean",
                name: "Exit 0 on a readable file",
                suite: exit_clean,
            },
            Stage {
                key: "count-lines",
                name: "Count lines with -l",
                suite: count_lines,
            },
            Stage {
                key: "report-errors",
                name: "Report missing files on stderr",
                suite: report_errors,
            },
        ],
    )
}

fn exit_clean(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);
    let cfg = suite.config();
    // README.md is scaffolded by `lc init`, so it always exists here.
    suite.check("counts README.md without failing", move || async move {
        CliPlan::command(cfg, PROGRAM)
            .arg("README.md")
            .into_assert()
            .succeeds()
            .await
    });
    suite
}

fn count_lines(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);

    let cfg = suite.config();
    suite.check("-l prints the file name", move || async move {
        CliPlan::command(cfg, PROGRAM)
            .args(["-l", "README.md"])
            .into_assert()
            .stdout_contains("README.md")
            .await
    });

    let cfg = suite.config();
    suite.check("-l exits 0", move || async move {
        CliPlan::command(cfg, PROGRAM)
            .args(["-l", "README.md"])
            .into_assert()
            .succeeds()
            .await
    });

    suite
}

fn report_errors(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);

    let cfg = suite.config();
    suite.check("missing file exits non-zero", move || async move {
        CliPlan::command(cfg, PROGRAM)
            .arg("no-such-file.txt")
            .into_assert()
            .exit_code(1)
            .await
    });

    let cfg = suite.config();
    suite.check("missing file is named on stderr", move || async move {
        CliPlan::command(cfg, PROGRAM)
            .arg("no-such-file.txt")
            .into_assert()
            .stderr_contains("no-such-file.txt")
            .await
    });

    suite
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let challenge = challenge();
        let keys: Vec<&str> = challenge.stages().iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["exit-clean", "count-lines", "report-errors"]);
        assert_eq!(challenge.kind, ChallengeKind::Cli);
    }
}
