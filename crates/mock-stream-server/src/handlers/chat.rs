// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `POST /api/chat`: catalog or collection text, bounded-word chunks

use axum::{body::Bytes, extract::State, response::Response};
use mock_stream_contract::{ChatRequest, parse_request};
use tracing::info;

use crate::{ServerResult, sse, state::AppState};

/// Stream a mock assistant reply to the last user message
#[tracing::instrument(name = "chat", skip_all)]
pub async fn stream_chat(State(state): State<AppState>, body: Bytes) -> ServerResult<Response> {
    let request: ChatRequest = parse_request(&body)?;
    let prompt = request.prompt()?;

    let canned = state.collections.lookup(&prompt).await?;
    let mut source = state.index_source();
    let prepared = state.pipeline.prepare_chat(&prompt, canned, &mut source);

    info!(
        category = %prepared.category,
        subject = %prepared.subject,
        origin = ?prepared.origin,
        chunks = prepared.turn.chunks.len(),
        total_tokens = prepared.turn.usage.total_tokens,
        "streaming chat response"
    );

    let events = state.chat_emitter.emit(prepared.turn, state.stream_token());
    Ok(sse::stream_response(events))
}
