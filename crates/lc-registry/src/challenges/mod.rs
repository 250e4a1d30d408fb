//! Bundled challenge definitions.

pub mod http_server;
pub mod word_count;
