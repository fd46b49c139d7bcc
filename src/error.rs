//! Process-level failures surfaced from `run_app`.

use std::net::SocketAddr;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration invalid")]
    Config(#[from] ConfigError),
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server terminated unexpectedly")]
    Serve(#[source] std::io::Error),
}
