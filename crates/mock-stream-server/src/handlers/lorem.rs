// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `POST /api/lorem`: parameter-driven filler, whitespace chunks

use axum::{body::Bytes, extract::State, response::Response};
use mock_stream_contract::{LoremRequest, parse_request};
use tracing::info;

use crate::{ServerResult, sse, state::AppState};

#[tracing::instrument(name = "lorem", skip_all)]
pub async fn stream_lorem(State(state): State<AppState>, body: Bytes) -> ServerResult<Response> {
    let request: LoremRequest = parse_request(&body)?;
    let prompt = request.prompt()?;
    let options = &request.options;

    let mut source = state.index_source();
    let turn = state.pipeline.prepare_lorem(
        &prompt,
        options,
        state.text_source.as_ref(),
        source.rng_mut(),
    )?;

    info!(
        units = ?options.units,
        count = options.count,
        chunks = turn.chunks.len(),
        total_tokens = turn.usage.total_tokens,
        "streaming filler response"
    );

    let events = state.lorem_emitter.emit(turn, state.stream_token());
    Ok(sse::stream_response(events))
}
