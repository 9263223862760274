//! Error type shared by every YouTube client operation.

use thiserror::Error;

/// Errors returned by [`crate::YouTubeClient`] and its helpers.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("HTTP request to YouTube API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("YouTube API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response was not JSON or did not have the expected shape.
    #[error("Failed to decode YouTube API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A caller-supplied argument was empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A lookup returned no matching items.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The duration string has no digit groups or more than four.
    #[error("Unsupported duration format: {0}")]
    UnsupportedDuration(String),

    /// The configured base URL could not be parsed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T, E = YouTubeError> = std::result::Result<T, E>;
