//! Typed error hierarchy for adctl.
//!
//! Two top-level enums cover the two library layers:
//! - `ApiError` — single backend HTTP operations
//! - `BulkError` — sequenced multi-item operations driven by the board

use thiserror::Error;

/// Errors from a single call against the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `detail` is the backend's `detail` field when the
    /// body carried one, otherwise a generic status message.
    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid backend URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    #[error("Status {0} cannot be set directly; only ACTIVE or PAUSED")]
    UnsupportedStatus(String),
}

impl ApiError {
    /// Build the error for a non-2xx response, falling back to a generic
    /// message when the backend sent no usable `detail`.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        ApiError::Http { status, detail }
    }

    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from a bulk batch or from the board state machine around it.
#[derive(Debug, Error)]
pub enum BulkError {
    #[error("Campaign {item} failed ({completed} of {total} done): {source}")]
    ItemFailed {
        item: String,
        /// Items that finished successfully before the failure.
        completed: usize,
        total: usize,
        #[source]
        source: ApiError,
    },

    #[error("Batch cancelled after {completed} of {total} items")]
    Cancelled { completed: usize, total: usize },

    #[error("Bulk actions need at least {min} selected campaigns, got {selected}")]
    NotEnoughSelected { selected: usize, min: usize },

    #[error("A bulk action is already running")]
    AlreadyRunning,

    #[error("No bulk action is awaiting confirmation")]
    NotConfirming,
}

impl BulkError {
    /// The backend error behind an item failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            BulkError::ItemFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
