// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Inbound chat message types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single chat message as received from the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Convenience constructor for a plain-text message
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(MessageContent::Text(content.into())),
            name: None,
            tool_call_id: None,
        }
    }
}

/// Message content, dispatched by JSON shape at deserialization time.
///
/// Strings, arrays and objects map to their own variant. Other scalars
/// (numbers, booleans) are kept as `Text` holding their JSON rendering so a
/// strange client never fails the request.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<Value>),
    Object(Map<String, Value>),
}

impl From<Value> for MessageContent {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => MessageContent::Text(text),
            Value::Array(parts) => MessageContent::Parts(parts),
            Value::Object(map) => MessageContent::Object(map),
            Value::Null => MessageContent::Text(String::new()),
            other => MessageContent::Text(other.to_string()),
        }
    }
}

impl From<MessageContent> for Value {
    fn from(content: MessageContent) -> Self {
        match content {
            MessageContent::Text(text) => Value::String(text),
            MessageContent::Parts(parts) => Value::Array(parts),
            MessageContent::Object(map) => Value::Object(map),
        }
    }
}

impl Serialize for MessageContent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MessageContent::from)
    }
}
