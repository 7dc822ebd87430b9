// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Subscription to {path} failed: {message}")]
    Subscription { path: String, message: String },

    #[error("Write to {path} failed: {message}")]
    Write { path: String, message: String },

    #[error("Document {path} not found")]
    NotFound { path: String },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Invalid path '{0}'")]
    InvalidPath(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Wrap a failure raised by the remote while writing `path`.
    pub fn write(path: impl ToString, err: impl std::fmt::Display) -> Self {
        SyncError::Write {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub fn subscription(path: impl ToString, err: impl std::fmt::Display) -> Self {
        SyncError::Subscription {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
