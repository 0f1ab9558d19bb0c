// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Request bodies for the mock streaming endpoints

use mock_stream_core::{LoremOptions, Message, last_user_prompt};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiContractError;
use crate::validation::RequestBody;

/// `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one message is required"))]
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// Normalized text of the most recent user message
    pub fn prompt(&self) -> Result<String, ApiContractError> {
        last_user_prompt(&self.messages).ok_or(ApiContractError::MissingUserMessage)
    }
}

impl RequestBody for ChatRequest {}

/// `POST /api/lorem`
///
/// Generation fields sit at the top level of the body next to `messages` and
/// fall back to [`LoremOptions::default`] when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoremRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one message is required"))]
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub options: LoremOptions,
}

impl LoremRequest {
    pub fn prompt(&self) -> Result<String, ApiContractError> {
        last_user_prompt(&self.messages).ok_or(ApiContractError::MissingUserMessage)
    }
}

impl RequestBody for LoremRequest {
    fn validate_relations(&self, errors: &mut ValidationErrors) {
        for issue in self.options.issues() {
            errors.add(
                issue.field,
                ValidationError::new(issue.code).with_message(issue.message.into()),
            );
        }
    }
}
