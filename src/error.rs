//! Error taxonomy for the access layer.
//!
//! Network failures are a thin pass-through from the transport — there is no
//! retry or recovery here, that belongs to callers.

use thiserror::Error;

/// Errors surfaced by the Gatherer access layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying HTTP transport failed (connect, TLS, timeout, read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A redirect chain exceeded the hop limit without reaching a terminal
    /// response.
    #[error("redirect limit of {limit} exceeded while following {uri}")]
    RedirectLimitExceeded { limit: usize, uri: String },

    /// A request target or `Location` header could not be resolved against
    /// the Gatherer base URL.
    #[error("invalid request target {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        source: url::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
