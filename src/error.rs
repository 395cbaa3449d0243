use std::time::Duration;

use thiserror::Error;

use crate::api::errors::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Cloudflare answered with `success: false`.
    #[error("{kind}: {message} (code {code})")]
    Api {
        kind: ErrorKind,
        code: u32,
        message: String,
    },

    #[error("zone {zone_id} did not become active within {waited:?}")]
    Timeout { zone_id: String, waited: Duration },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("session is closed")]
    SessionClosed,
}

impl Error {
    /// The mapped Cloudflare error kind, for errors reported by the API.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
