//! Error types for calls against the task API.

use reqwest::StatusCode;
use thiserror::Error;

use crate::task::TaskId;

/// Ways a task API call can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, TLS, reading the body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body did not match the task schema
    #[error("malformed API response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The referenced id is not in the local task list
    #[error("task '{0}' is not loaded")]
    UnknownTask(TaskId),
}

pub type ApiResult<T> = Result<T, ApiError>;
