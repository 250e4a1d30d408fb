//! The `lc.state` progress file.
//!
//! A single line, `<challenge>:<stage>`, written into the challenge
//! directory by `lc init` and advanced by `lc next`.

use std::path::Path;
use thiserror::Error;

/// File name, relative to the challenge directory.
pub const STATE_FILE: &str = "lc.state";

#[derive(Debug, Error)]
pub enum StateError {
    #[error(
        "not in a challenge directory\n\
         Run this command from a directory created with 'lc init <challenge>'"
    )]
    NotFound,

    #[error("invalid state format: expected '<challenge>:<stage>', got: {content}")]
    Malformed { content: String },

    #[error("failed to access state file: {0}")]
    Io(#[from] std::io::Error),
}

/// Current position within a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub challenge: String,
    pub stage: String,
}

impl State {
    /// Load from `lc.state` in the current directory.
    pub fn load() -> Result<Self, StateError> {
        Self::load_from(Path::new(STATE_FILE))
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Err(StateError::NotFound);
        }

        let content = std::fs::read_to_string(path)?;
        let trimmed = content.trim();
        let Some((challenge, stage)) = trimmed.split_once(':') else {
            return Err(StateError::Malformed {
                content: trimmed.to_string(),
            });
        };

        Ok(State {
            challenge: challenge.trim().to_string(),
            stage: stage.trim().to_string(),
        })
    }

    /// Save to `lc.state` in the current directory.
    pub fn save(&self) -> Result<(), StateError> {
        self.save_to(Path::new(STATE_FILE))
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), StateError> {
        let content = format!("{}:{}\n", self.challenge, self.stage);
        std::fs::write(path, content)?;
        Ok(())
    }
}
