// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server error types and handling

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use mock_stream_contract::{ApiContractError, BODY_FIELD, ProblemDetails};
use mock_stream_core::CoreError;
use std::collections::HashMap;

use crate::config::ConfigError;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

const PROBLEM_JSON: &str = "application/problem+json";

/// Detail sent for every 500; the cause only goes to the log
const INTERNAL_DETAIL: &str = "An unexpected error occurred while generating the response";

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Contract(#[from] ApiContractError),

    #[error("Generation error: {0}")]
    Generation(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            ServerError::Contract(err @ ApiContractError::Malformed(_)) => ProblemDetails::new(
                "https://docs.example.com/errors/malformed-request",
                "Malformed Request",
                StatusCode::BAD_REQUEST.as_u16(),
                format!("Request body is not valid JSON: {}", source_message(err)),
            ),
            ServerError::Contract(
                err @ (ApiContractError::Schema(_) | ApiContractError::Validation(_)),
            ) => validation_problem(err.field_errors()),
            ServerError::Contract(ApiContractError::MissingUserMessage) => ProblemDetails::new(
                "https://docs.example.com/errors/bad-request",
                "Bad Request",
                StatusCode::BAD_REQUEST.as_u16(),
                "The conversation must contain at least one user message",
            ),
            ServerError::Generation(CoreError::InvalidOptions { message }) => {
                validation_problem(HashMap::from([(
                    BODY_FIELD.to_string(),
                    vec![message.clone()],
                )]))
            }
            ServerError::Generation(CoreError::Encoding { .. })
            | ServerError::Config(_)
            | ServerError::Internal(_) => ProblemDetails::new(
                "https://docs.example.com/errors/internal",
                "Internal Server Error",
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                INTERNAL_DETAIL,
            ),
        }
    }
}

fn validation_problem(errors: HashMap<String, Vec<String>>) -> ProblemDetails {
    ProblemDetails::new(
        "https://docs.example.com/errors/validation",
        "Validation Error",
        StatusCode::BAD_REQUEST.as_u16(),
        "Request validation failed",
    )
    .with_errors(errors)
}

fn source_message(err: &ApiContractError) -> String {
    std::error::Error::source(err)
        .map(ToString::to_string)
        .unwrap_or_else(|| err.to_string())
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        let status = StatusCode::from_u16(problem.status.unwrap_or(500))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(problem)).into_response()
    }
}

/// Convert any error to ServerError
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(format!("{err:#}"))
    }
}
