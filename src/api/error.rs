use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {status}")]
    Status { status: StatusCode, body: String },
    /// `success: false` from the backend. The text is shown to the user as is.
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid endpoint '{path}': {reason}")]
    Endpoint { path: String, reason: String },
}

impl ApiError {
    /// Message for a notification about a failed `action`. Backend-provided
    /// text is passed through verbatim; everything else collapses into a
    /// generic failure.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            Self::Rejected(message) => format!("{action} failed: {message}"),
            Self::File { path, .. } => {
                format!("{action} failed: could not read {}", path.display())
            }
            _ => format!("{action} failed: the server could not be reached"),
        }
    }
}
