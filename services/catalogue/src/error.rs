//! services/catalogue/src/error.rs
//!
//! The error `main` returns. Anything that reaches it ends the client.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The environment could not be turned into a `Config`.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The reqwest client could not be built (TLS backend, bad timeout).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading commands from stdin or writing pages to stdout failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
