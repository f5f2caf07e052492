// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop (or degrade) a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or malformed environment configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The CSV source was unreachable or answered with a non-success status.
    #[error("failed to fetch sheet CSV: {0}")]
    Fetch(String),

    /// Index creation failed with something other than "already exists".
    #[error("failed to create index `{index}`: {detail}")]
    IndexCreation { index: String, detail: String },

    /// The bulk document write was rejected or never reached the service.
    #[error("failed to upload documents to `{index}`: {detail}")]
    Upload { index: String, detail: String },

    /// The settings patch was rejected or never reached the service.
    #[error("failed to update settings of `{index}`: {detail}")]
    Settings { index: String, detail: String },
}

impl SyncError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn index_creation(index: &str, detail: impl Into<String>) -> Self {
        Self::IndexCreation {
            index: index.to_string(),
            detail: detail.into(),
        }
    }

    pub fn upload(index: &str, detail: impl Into<String>) -> Self {
        Self::Upload {
            index: index.to_string(),
            detail: detail.into(),
        }
    }

    pub fn settings(index: &str, detail: impl Into<String>) -> Self {
        Self::Settings {
            index: index.to_string(),
            detail: detail.into(),
        }
    }
}

/// Renders a rejected response as `HTTP <status>: <body>` for error details.
pub(crate) fn status_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body)
    }
}
