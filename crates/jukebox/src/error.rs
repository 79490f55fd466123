use std::path::PathBuf;
use thiserror::Error;

/// Authorization failures. Unrecoverable for the session; surfaced at
/// startup and halts the program.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("authorization request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    TokenExchange {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("redirect URL has no authorization code: {0}")]
    BadRedirect(String),

    #[error("cached token expired and no refresh token is available")]
    Expired,

    #[error("failed to {action} token cache {path}: {source}")]
    Cache {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("authorization prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Per-operation remote call failures. Callers degrade these to a
/// sentinel; nothing in the gateway retries.
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),
}
