// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end tests: messages in, ordered events out

use futures::StreamExt;
use mock_stream_core::{
    Category, FixedIndex, LoremIpsum, LoremOptions, LoremUnits, Message, MessageContent, Pacing,
    Pipeline, Role, SeededIndex, StreamEmitter, StreamEvent, StreamProfile, last_user_prompt,
};
use pretty_assertions::assert_eq;
use rand::{SeedableRng, rngs::SmallRng};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn conversation(last_user: &str) -> Vec<Message> {
    vec![
        Message::text(Role::System, "be brief"),
        Message::text(Role::User, "earlier question"),
        Message::text(Role::Assistant, "earlier answer"),
        Message::text(Role::User, last_user),
    ]
}

fn type_names(events: &[StreamEvent]) -> Vec<String> {
    events
        .iter()
        .map(|event| {
            serde_json::to_value(event).unwrap()["type"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn chat_request_streams_the_full_namespaced_sequence() {
    let messages = conversation("Who is Ada Lovelace?");
    let prompt = last_user_prompt(&messages).unwrap();
    let prepared = Pipeline::default().prepare_chat(&prompt, None, &mut FixedIndex(1));
    let chunk_count = prepared.turn.chunks.len();
    let usage = prepared.turn.usage;

    let emitter = StreamEmitter::new(StreamProfile::default(), Pacing::none());
    let events: Vec<StreamEvent> = emitter
        .emit(prepared.turn, CancellationToken::new())
        .collect()
        .await;

    let types = type_names(&events);
    assert_eq!(types.len(), chunk_count + 4);
    assert_eq!(types[0], "start");
    assert_eq!(types[1], "text-start");
    assert!(types[2..2 + chunk_count].iter().all(|t| t == "text-delta"));
    assert_eq!(types[types.len() - 2], "text-end");
    assert_eq!(types[types.len() - 1], "finish");

    let finish = serde_json::to_value(events.last().unwrap()).unwrap();
    assert_eq!(finish["finishReason"], json!("stop"));
    assert_eq!(finish["providerMetadata"]["mock"]["category"], json!("person"));
    assert_eq!(
        finish["providerMetadata"]["mock"]["usage"],
        serde_json::to_value(usage).unwrap()
    );
    assert!(finish.get("usage").is_none());
}

#[tokio::test]
async fn multi_part_content_is_classified_as_one_prompt() {
    let messages = vec![Message {
        role: Role::User,
        content: Some(MessageContent::Parts(vec![
            json!({"type": "text", "text": "tell me about"}),
            json!("the startup"),
            json!({"data": "Acme"}),
        ])),
        name: None,
        tool_call_id: None,
    }];
    let prompt = last_user_prompt(&messages).unwrap();
    assert_eq!(prompt, "tell me about the startup Acme");

    let prepared = Pipeline::default().prepare_chat(&prompt, None, &mut SeededIndex::new(7));
    assert_eq!(prepared.category, Category::Company);
    assert_eq!(prepared.subject, "the startup Acme");
}

#[tokio::test]
async fn empty_prompt_uses_placeholder_subject() {
    let prompt = last_user_prompt(&conversation("   ")).unwrap();
    let prepared = Pipeline::default().prepare_chat(&prompt, None, &mut FixedIndex(0));
    assert_eq!(prepared.subject, "Lorem Ipsum");
    assert_eq!(prepared.category, Category::Generic);
    assert!(prepared.text.contains("Lorem Ipsum"));
}

#[tokio::test]
async fn lorem_request_streams_plain_profile_losslessly() {
    let options = LoremOptions {
        count: 2,
        units: LoremUnits::Paragraphs,
        ..Default::default()
    };
    let mut rng = SmallRng::seed_from_u64(21);
    let turn = Pipeline::default()
        .prepare_lorem("give me filler", &options, &LoremIpsum, &mut rng)
        .unwrap();
    let expected_text = turn.chunks.concat();

    let emitter = StreamEmitter::new(StreamProfile::Plain, Pacing::none());
    let events: Vec<StreamEvent> = emitter.emit(turn, CancellationToken::new()).collect().await;

    assert_eq!(type_names(&events)[0], "text-start");
    let streamed: String = events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::TextDelta { delta, .. } => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(streamed, expected_text);

    let finish = serde_json::to_value(events.last().unwrap()).unwrap();
    assert!(finish["usage"]["inputTokens"].as_u64().unwrap() > 0);
    assert!(finish.get("providerMetadata").is_none());
}

#[tokio::test(start_paused = true)]
async fn cancelled_chat_stream_never_finishes() {
    let prepared = Pipeline::default().prepare_chat("explain ownership", None, &mut FixedIndex(0));
    assert!(prepared.turn.chunks.len() > 3);

    let cancel = CancellationToken::new();
    let emitter = StreamEmitter::new(
        StreamProfile::default(),
        Pacing::per_chunk(std::time::Duration::from_millis(20)),
    );
    let mut stream = emitter.emit(prepared.turn, cancel.clone());

    let mut seen = Vec::new();
    while let Some(event) = stream.next().await {
        let is_delta = matches!(event, StreamEvent::TextDelta { .. });
        seen.push(event);
        if is_delta {
            cancel.cancel();
        }
    }

    assert_eq!(type_names(&seen), vec!["start", "text-start", "text-delta"]);
}
