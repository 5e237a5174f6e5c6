// Error types for repocard.
// Classifies GitHub API failures, malformed input, and local filesystem errors.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoCardError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("repo parameter is required")]
    MissingRepo,

    #[error("Invalid repo format '{0}'. Use: owner/repo")]
    InvalidRepo(String),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded, resets at {reset_at}")]
    RateLimited { status: u16, reset_at: String },

    #[error("GitHub API error: {status}")]
    Upstream { status: u16 },

    #[error("Cannot read content at {}: {reason}", path.display())]
    ContentRoot { path: PathBuf, reason: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl RepoCardError {
    /// HTTP status reported to request-time callers for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RepoCardError::MissingRepo | RepoCardError::InvalidRepo(_) => StatusCode::BAD_REQUEST,
            RepoCardError::NotFound(_) => StatusCode::NOT_FOUND,
            RepoCardError::RateLimited { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::FORBIDDEN)
            }
            RepoCardError::Upstream { status } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoCardError>;
