//! Challenge directory scaffolding for `lc init`.

use crate::state::{State, STATE_FILE};
use anyhow::{Context, Result};
use lc_registry::Challenge;
use std::path::Path;

const RUN_SH_TEMPLATE: &str = r#"#!/bin/bash -e

# This script builds and runs your implementation.
# lc will execute this script to start your program.
# "$@" passes command-line arguments from lc to your program, e.g.:
#   --working-dir=<path>: Directory where your program should write files

echo "Replace this line with the command that runs your implementation."
# Examples:
#   exec cargo run --release -- "$@"
#   exec python main.py "$@"
#   exec ./my-program "$@"
"#;

const GITIGNORE_CONTENT: &str = ".lc/\n";

/// Write the initial files for a new challenge into `target`.
///
/// Creates `run.sh` (executable), `README.md`, `lc.state` pointing at the
/// first stage, and a `.gitignore` for the `.lc/` working directory.
pub fn create_challenge_files(challenge: &Challenge, target: &Path) -> Result<()> {
    let script_path = target.join("run.sh");
    std::fs::write(&script_path, RUN_SH_TEMPLATE).context("failed to create run.sh")?;
    make_executable(&script_path)?;

    std::fs::write(target.join("README.md"), challenge.readme())
        .context("failed to create README.md")?;

    let state = State {
        challenge: challenge.key.to_string(),
        stage: challenge.first_stage().key.to_string(),
    };
    state
        .save_to(&target.join(STATE_FILE))
        .context("failed to create lc.state")?;

    std::fs::write(target.join(".gitignore"), GITIGNORE_CONTENT)
        .context("failed to create .gitignore")?;

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .context("failed to mark run.sh executable")
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
