//! lc - guided programming challenges in your own repository
//!
//! ## Commands
//!
//! - `init`: scaffold a challenge directory (run.sh, README, progress file)
//! - `test`: run the current stage's test suite against your program
//! - `next`: verify the current stage and advance to the next one
//! - `status`: show progress through the challenge
//! - `challenges`: list available challenges

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Level;

mod commands;
mod runner;
mod scaffold;
mod state;
mod telemetry;

#[derive(Parser)]
#[command(name = "lc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scaffold and test guided programming challenges", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a challenge in the current or given directory
    Init {
        /// Challenge to scaffold (see `lc challenges`)
        challenge: String,

        /// Target directory (default: current directory)
        path: Option<PathBuf>,
    },

    /// Run tests for the current or specified stage
    Test {
        /// Stage to test (default: current stage from lc.state)
        stage: Option<String>,
    },

    /// Verify the current stage and advance to the next one
    Next,

    /// Show challenge progress
    Status,

    /// List available challenges
    Challenges,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging. Suite output goes to stdout directly; tracing is for
    // diagnostics, so stay quiet unless asked.
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    telemetry::init_tracing(cli.json, level);

    // One cancellation token per run, fired by Ctrl-C; every polling loop
    // in the engine observes it.
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let config = Arc::new(lc_attest::Config::new().with_cancellation(token));

    match cli.command {
        Commands::Init { challenge, path } => commands::init(&challenge, path.as_deref()),
        Commands::Test { stage } => commands::test(config, stage.as_deref()).await,
        Commands::Next => commands::next(config).await,
        Commands::Status => commands::status(),
        Commands::Challenges => commands::challenges(),
    }
}
