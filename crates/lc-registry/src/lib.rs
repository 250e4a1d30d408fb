//! lc-registry - challenge and stage registry
//!
//! A challenge is an ordered sequence of stages; each stage carries a test
//! function that builds an attest [`Suite`](lc_attest::Suite) for the
//! learner's running program. The CLI looks challenges up by key, walks
//! their stage order for progress tracking, and renders their README when
//! scaffolding.

pub mod challenge;
mod challenges;

pub use challenge::{Challenge, ChallengeKind, RegistryError, Stage};

/// All bundled challenges, in presentation order.
pub fn all_challenges() -> Vec<Challenge> {
    vec![challenges::http_server::challenge(), challenges::word_count::challenge()]
}

/// Look up a challenge by key.
pub fn get_challenge(key: &str) -> Result<Challenge, RegistryError> {
    all_challenges()
        .into_iter()
        .find(|c| c.key == key)
        .ok_or_else(|| RegistryError::UnknownChallenge {
            key: key.to_string(),
        })
}
