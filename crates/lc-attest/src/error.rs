//! Engine-level probe errors.
//!
//! These are infrastructure faults the probe cannot recover from by
//! retrying - a malformed request or a binary that does not exist. Expected
//! failure modes (non-2xx status, non-zero exit, connection refused) are
//! observations, not errors; see [`crate::Observation`].

use thiserror::Error;

/// Errors that abort a probe before it can produce an observation.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The HTTP request could not be constructed (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The CLI probe's executable could not be launched.
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
