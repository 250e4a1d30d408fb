//! Supervision of the learner's `run.sh` for server challenges.
//!
//! The engine itself never manages the target process; `lc test` starts it
//! here before running an HTTP stage's suite and stops it afterwards. The
//! program's output goes to `.lc/program.log` so test output stays clean.
//!
//! `run.sh` is put in its own process group so shutdown can reach whatever
//! it spawned - a server backgrounded without `exec` would otherwise
//! outlive the shell and hold its port into the next run.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

const WORK_DIR: &str = ".lc";
const LOG_FILE: &str = "program.log";

/// A running learner program.
///
/// The shell itself is killed when the handle is dropped, so an early
/// return from a failing test run cannot leak it; use
/// [`shutdown`](Program::shutdown) to also sweep the process group.
pub struct Program {
    child: Child,
}

/// Start `./run.sh` from `dir`, logging to `.lc/program.log`.
pub fn launch(dir: &Path) -> Result<Program> {
    let work_dir = dir.join(WORK_DIR);
    std::fs::create_dir_all(&work_dir).context("failed to create .lc working directory")?;

    let log_path = work_dir.join(LOG_FILE);
    let log = std::fs::File::create(&log_path).context("failed to create program log")?;
    let log_err = log.try_clone().context("failed to clone program log handle")?;

    let mut command = Command::new("./run.sh");
    command
        .arg(format!("--working-dir={}", work_dir.display()))
        .current_dir(dir)
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err))
        .kill_on_drop(true);

    // Lead a fresh process group: run.sh's pid doubles as the pgid, so
    // shutdown can signal the whole group.
    #[cfg(unix)]
    command.process_group(0);

    let child = command
        .spawn()
        .context("failed to start run.sh - is it executable?")?;

    info!(pid = child.id(), log = %log_path.display(), "started run.sh");
    Ok(Program { child })
}

impl Program {
    /// Stop the program, its whole process group, and reap the shell.
    pub async fn shutdown(mut self) {
        debug!(pid = self.child.id(), "stopping run.sh");

        let pgid = self.child.id();
        if let Some(pid) = pgid {
            signal_group(pid, GroupSignal::Term);
        }

        let _ = self.child.start_kill();
        let _ = self.child.wait().await;

        // Grandchildren that ignored or raced the SIGTERM.
        if let Some(pid) = pgid {
            signal_group(pid, GroupSignal::Kill);
        }
    }
}

enum GroupSignal {
    Term,
    Kill,
}

#[cfg(unix)]
fn signal_group(pid: u32, signal: GroupSignal) {
    let signal = match signal {
        GroupSignal::Term => libc::SIGTERM,
        GroupSignal::Kill => libc::SIGKILL,
    };
    // A negative pid addresses the process group run.sh leads.
    unsafe {
        libc::kill(-(pid as i32), signal);
    }
}

#[cfg(not(unix))]
fn signal_group(_pid: u32, _signal: GroupSignal) {}
