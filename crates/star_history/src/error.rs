//! Errors surfaced by a star history computation.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur while sampling a repository's star history.
///
/// Every variant is terminal for the current call: the sampler never retries
/// and never returns partial data.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The GitHub API answered with a non-2xx status.
    #[error("GitHub API returned HTTP {status}")]
    Upstream { status: u16, body: String },

    /// The repository has no stargazers, so there is no curve to draw.
    #[error("Repository {repo} has no stargazers")]
    EmptyRepository { repo: String },

    /// The identifier is not of the form `owner/name`.
    #[error("Invalid repository identifier {0:?}, expected owner/name")]
    InvalidRepository(String),

    /// GitHub is still computing contributor statistics (HTTP 202).
    #[error("Contributor statistics for {repo} are still being computed")]
    StatisticsPending { repo: String },

    /// Network failure below the HTTP layer.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// A response body could not be decoded.
    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// A concurrent fetch task failed to run to completion.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HistoryError {
    /// Create an upstream error from a status code and raw body.
    #[inline]
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error.
    #[inline]
    pub fn decode(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// The upstream HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// Rate limits (403/429), server errors, transport failures and pending
    /// statistics are transient; everything else needs a different input.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => matches!(status, 403 | 429 | 500..=599),
            Self::Transport(_) | Self::StatisticsPending { .. } => true,
            _ => false,
        }
    }
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
