//! APS API Errors
//!
//! HTTPレベルのエラー。リポジトリ境界で `JobError` に変換される

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::JobError;

/// Max characters of a response body kept in an error
pub const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Access token could not be obtained
    #[error("{0}")]
    Token(String),
}

impl ApiError {
    pub fn status(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            body: truncate_body(body),
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Transient failures: 5xx, 429, connect errors and timeouts
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(StatusCode::CONFLICT)
    }

    /// Map into the job taxonomy. Token failures always become `JobError::Auth`.
    pub fn into_job_error<F>(self, stage: F) -> JobError
    where
        F: FnOnce(String) -> JobError,
    {
        match self {
            ApiError::Token(message) => JobError::Auth(message),
            other => stage(other.to_string()),
        }
    }
}

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        match e {
            JobError::Auth(message) => ApiError::Token(message),
            other => ApiError::Token(other.to_string()),
        }
    }
}

pub fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{}...", truncated)
}
