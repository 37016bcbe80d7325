//! Error types for worker groups and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a collective operation. Any of these is fatal for the search
/// that observed it.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("worker {peer} hung up while worker {rank} was waiting on it")]
    Disconnected { rank: usize, peer: usize },
    #[error("worker {rank} gave up: another worker in the cluster failed")]
    Aborted { rank: usize },
    #[error("collective protocol violated: {0}")]
    Protocol(String),
    #[error("payload could not be encoded or decoded")]
    Codec(#[from] serde_json::Error),
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}

/// Problems loading or validating a [`crate::SearchConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid TOML")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
