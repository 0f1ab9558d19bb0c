// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the generation engine

/// Result type alias for engine operations that can fail
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Engine error type
///
/// Classification, chunking and usage estimation are total and never produce
/// these; only option validation and event encoding can.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid generation options: {message}")]
    InvalidOptions { message: String },

    #[error("Event encoding error: {source}")]
    Encoding {
        #[from]
        source: serde_json::Error,
    },
}
