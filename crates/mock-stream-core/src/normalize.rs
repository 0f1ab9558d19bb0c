// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Flattening of message content into prompt text

use serde_json::Value;

use crate::message::{Message, MessageContent, Role};

/// Flatten message content into a single string.
///
/// Never fails: anything that does not carry an obvious text field is rendered
/// as compact JSON.
pub fn normalize_content(content: Option<&MessageContent>) -> String {
    match content {
        None => String::new(),
        Some(MessageContent::Text(text)) => text.clone(),
        Some(MessageContent::Parts(parts)) => {
            parts.iter().map(normalize_part).collect::<Vec<_>>().join(" ")
        }
        Some(MessageContent::Object(map)) => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => serialize(&Value::Object(map.clone())),
        },
    }
}

/// Normalized content of the most recent user message, if there is one
pub fn last_user_prompt(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .map(|message| normalize_content(message.content.as_ref()))
}

fn normalize_part(part: &Value) -> String {
    if let Value::String(text) = part {
        return text.clone();
    }
    if let Some(Value::String(text)) = part.get("text") {
        return text.clone();
    }
    if let Some(Value::String(data)) = part.get("data") {
        return data.clone();
    }
    serialize(part)
}

fn serialize(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
