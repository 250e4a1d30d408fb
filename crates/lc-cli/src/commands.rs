//! Subcommand implementations: init, test, next, status, challenges.

use crate::runner;
use crate::scaffold;
use crate::state::State;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use lc_attest::Config;
use lc_registry::{all_challenges, get_challenge, Challenge, ChallengeKind};
use std::path::Path;
use std::sync::Arc;

const DOCS_BASE_URL: &str = "https://littleclusters.com";

/// OSC 8 terminal hyperlink.
fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\")
}

fn guide_url(challenge_key: &str, stage_key: &str) -> String {
    format!("{DOCS_BASE_URL}/{challenge_key}/{stage_key}")
}

/// `lc init <challenge> [path]` - scaffold a new challenge directory.
pub fn init(challenge_key: &str, path: Option<&Path>) -> Result<()> {
    let challenge = get_challenge(challenge_key)?;

    let target = match path {
        Some(path) => {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create directory {}", path.display()))?;
            path
        }
        None => Path::new("."),
    };

    scaffold::create_challenge_files(&challenge, target)?;

    if target == Path::new(".") {
        println!("Created challenge in current directory.");
    } else {
        println!("Created challenge in directory: ./{}", target.display());
    }
    println!("  run.sh       - Builds and runs your implementation");
    println!("  README.md    - Challenge overview and requirements");
    println!("  lc.state     - Tracks your progress");
    println!("  .gitignore   - Ignores .lc/ working directory (server files and logs)\n");

    let first_stage = challenge.first_stage().key;
    if target == Path::new(".") {
        println!(
            "Implement {first_stage} stage, then run {}.",
            "'lc test'".yellow()
        );
    } else {
        println!(
            "cd {} and implement {first_stage} stage, then run {}.",
            target.display(),
            "'lc test'".yellow()
        );
    }

    Ok(())
}

/// Check that `run.sh` exists and load the progress state.
fn validate_environment() -> Result<State> {
    if !Path::new("run.sh").exists() {
        bail!(
            "run.sh not found\n\
             Create an executable run.sh script that starts your implementation."
        );
    }
    Ok(State::load()?)
}

/// Run one stage's suite, supervising `run.sh` for server challenges.
async fn run_stage_tests(
    config: Arc<Config>,
    challenge: &Challenge,
    stage_key: &str,
) -> Result<bool> {
    let stage = match challenge.stage(stage_key) {
        Ok(stage) => stage,
        Err(err) => {
            let mut msg = String::from("\nAvailable stages:\n");
            for stage in challenge.stages() {
                msg.push_str(&format!("- {}\n", stage.key));
            }
            bail!("{err}{msg}");
        }
    };

    println!("Testing {stage_key}: {}\n", stage.name);

    let program = match challenge.kind {
        ChallengeKind::HttpServer => Some(runner::launch(Path::new("."))?),
        ChallengeKind::Cli => None,
    };

    let suite = (stage.suite)(config);
    let report = suite.run().await;

    if let Some(program) = program {
        program.shutdown().await;
    }

    Ok(report.passed())
}

/// `lc test [stage]` - run tests for the current or specified stage.
pub async fn test(config: Arc<Config>, stage: Option<&str>) -> Result<()> {
    let state = validate_environment()?;
    let challenge = get_challenge(&state.challenge)?;
    let stage_key = stage.unwrap_or(&state.stage);

    let passed = run_stage_tests(config, &challenge, stage_key).await?;
    if passed {
        println!("\nRun {} to advance to the next stage.", "'lc next'".yellow());
        Ok(())
    } else {
        let guide = guide_url(&state.challenge, stage_key);
        bail!("\nRead the guide: {}", hyperlink(&guide, &guide));
    }
}

/// What `lc next` should do once the current stage's tests have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advancement {
    /// Tests failed; stay on the current stage.
    Refuse,

    /// Tests passed; move to the stage at this index.
    Advance { next_index: usize },

    /// Tests passed on the final stage; the challenge is done.
    Completed,
}

fn decide_advancement(challenge: &Challenge, current_index: usize, passed: bool) -> Advancement {
    if !passed {
        return Advancement::Refuse;
    }
    if current_index == challenge.len() - 1 {
        return Advancement::Completed;
    }
    Advancement::Advance {
        next_index: current_index + 1,
    }
}

/// `lc next` - verify the current stage and advance to the next one.
pub async fn next(config: Arc<Config>) -> Result<()> {
    let mut state = validate_environment()?;
    let challenge = get_challenge(&state.challenge)?;

    let Some(current_index) = challenge.stage_index(&state.stage) else {
        bail!("Current stage '{}' not found in challenge", state.stage);
    };

    let passed = run_stage_tests(config, &challenge, &state.stage).await?;
    println!();

    match decide_advancement(&challenge, current_index, passed) {
        Advancement::Refuse => bail!("Complete {} before advancing.", state.stage),

        Advancement::Completed => {
            println!("You've completed all stages for {}! 🎉\n", state.challenge);
            println!(
                "Try another challenge at {}",
                hyperlink(DOCS_BASE_URL, DOCS_BASE_URL)
            );
            state.save()?;
            Ok(())
        }

        Advancement::Advance { next_index } => {
            let next_stage = &challenge.stages()[next_index];
            state.stage = next_stage.key.to_string();
            state.save()?;

            println!("Advanced to {}: {}\n", next_stage.key, next_stage.name);
            let guide = guide_url(&state.challenge, next_stage.key);
            println!("Read the guide: {}\n", hyperlink(&guide, &guide));
            println!("Run {} when ready.", "'lc test'".yellow());
            Ok(())
        }
    }
}

/// `lc status` - show challenge progress and next steps.
pub fn status() -> Result<()> {
    let state = State::load()?;
    let challenge = get_challenge(&state.challenge)?;

    println!("{}\n\n{}\n", challenge.name, challenge.summary);

    println!("Progress:");
    let current_index = challenge.stage_index(&state.stage);
    for (i, stage) in challenge.stages().iter().enumerate() {
        let marker = match current_index {
            Some(current) if i < current => "✓",
            Some(current) if i == current => "→",
            _ => " ",
        };
        println!("{marker} {:<18} - {}", stage.key, stage.name);
    }

    let guide = guide_url(&state.challenge, &state.stage);
    println!("\nRead the guide: {}\n", hyperlink(&guide, &guide));
    println!(
        "Implement {}, then run {}.",
        state.stage,
        "'lc test'".yellow()
    );

    Ok(())
}

/// `lc challenges` - list available challenges.
pub fn challenges() -> Result<()> {
    println!("Available challenges:\n");
    for challenge in all_challenges() {
        println!(
            "  {:<20} - {} ({} stages)",
            challenge.key,
            challenge.name,
            challenge.len()
        );
    }
    println!("\nStart with: lc init <challenge-name>");
    Ok(())
}
