use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Failures that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to prepare upload directory: {0}")]
    Bootstrap(#[source] io::Error),

    #[error("PORT is not a usable port: {0}")]
    InvalidPort(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
