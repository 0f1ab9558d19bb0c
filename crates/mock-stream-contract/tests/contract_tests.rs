// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use mock_stream_contract::{ApiContractError, ChatRequest, LoremRequest, parse_request};
use mock_stream_core::{LoremUnits, MessageContent};

#[test]
fn chat_request_accepts_every_content_shape() {
    let body = br#"{
        "messages": [
            {"role": "system", "content": "stay in character"},
            {"role": "user", "content": {"text": "object form"}},
            {"role": "assistant", "content": null},
            {"role": "tool", "content": 42, "toolCallId": "call-1"},
            {"role": "user", "content": [{"type": "text", "text": "who is"}, "Grace Hopper"]}
        ]
    }"#;

    let request: ChatRequest = parse_request(body).unwrap();
    assert_eq!(request.messages.len(), 5);
    assert_eq!(request.messages[2].content, None);
    assert_eq!(
        request.messages[3].content,
        Some(MessageContent::Text("42".to_string()))
    );
    assert_eq!(request.messages[3].tool_call_id.as_deref(), Some("call-1"));
    assert_eq!(request.prompt().unwrap(), "who is Grace Hopper");
}

#[test]
fn chat_request_with_only_assistant_messages_has_no_prompt() {
    let request: ChatRequest =
        parse_request(br#"{"messages": [{"role": "assistant", "content": "hi"}]}"#).unwrap();
    assert!(matches!(
        request.prompt(),
        Err(ApiContractError::MissingUserMessage)
    ));
}

#[test]
fn lorem_request_upper_range_is_enforced() {
    let err = parse_request::<LoremRequest>(
        br#"{"messages": [{"role": "user", "content": ""}], "paragraphUpperBound": 101}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ApiContractError::Validation(_)));
    assert!(err.field_errors().contains_key("paragraphUpperBound"));
}

#[test]
fn lorem_request_rejects_unknown_units() {
    let err = parse_request::<LoremRequest>(
        br#"{"messages": [{"role": "user", "content": ""}], "units": "chapters"}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ApiContractError::Schema(_)));
}

#[test]
fn lorem_request_word_units() {
    let request: LoremRequest = parse_request(
        br#"{"messages": [{"role": "user", "content": "go"}], "units": "words", "count": 100}"#,
    )
    .unwrap();
    assert_eq!(request.options.units, LoremUnits::Words);
    assert_eq!(request.options.count, 100);
}
