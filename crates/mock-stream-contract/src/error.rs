// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for request parsing and validation

use std::collections::HashMap;
use thiserror::Error;

use crate::validation::field_errors;

/// Field path used when an error is not attributable to a single field
pub const BODY_FIELD: &str = "body";

/// Errors that can occur while turning a request body into a typed request
#[derive(Debug, Error)]
pub enum ApiContractError {
    /// The body is not JSON at all
    #[error("Malformed JSON body: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The body is JSON but does not fit the request type
    #[error("Request body does not match the schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Conversation contains no user message")]
    MissingUserMessage,
}

impl ApiContractError {
    /// Field-level messages for the Problem+JSON `errors` member
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        match self {
            ApiContractError::Validation(errors) => field_errors(errors),
            ApiContractError::Schema(err) => {
                HashMap::from([(BODY_FIELD.to_string(), vec![err.to_string()])])
            }
            ApiContractError::Malformed(_) | ApiContractError::MissingUserMessage => {
                HashMap::new()
            }
        }
    }
}

/// Problem+JSON error response format as per RFC 7807
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: String,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub errors: HashMap<String, Vec<String>>,
}

impl ProblemDetails {
    pub fn new(
        problem_type: impl Into<String>,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            problem_type: problem_type.into(),
            title: title.into(),
            status: Some(status),
            detail: detail.into(),
            errors: HashMap::new(),
        }
    }

    pub fn with_errors(mut self, errors: HashMap<String, Vec<String>>) -> Self {
        self.errors = errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_details_omits_empty_errors() {
        let problem = ProblemDetails::new("about:blank", "Bad Request", 400, "nope");
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "about:blank",
                "title": "Bad Request",
                "status": 400,
                "detail": "nope"
            })
        );
    }

    #[test]
    fn problem_details_roundtrip_with_errors() {
        let problem = ProblemDetails::new("about:blank", "Validation Error", 400, "failed")
            .with_errors(HashMap::from([(
                "count".to_string(),
                vec!["must be between 1 and 100".to_string()],
            )]));
        let json = serde_json::to_string(&problem).unwrap();
        let parsed: ProblemDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(problem, parsed);
    }

    #[test]
    fn schema_errors_are_reported_against_body() {
        let err = serde_json::from_str::<Vec<u8>>("\"text\"").unwrap_err();
        let errors = ApiContractError::Schema(err).field_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(BODY_FIELD));
    }

    #[test]
    fn malformed_and_missing_user_have_no_field_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(ApiContractError::Malformed(err).field_errors().is_empty());
        assert!(ApiContractError::MissingUserMessage.field_errors().is_empty());
    }
}
