// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! SSE framing for core event streams
//!
//! Every event becomes one `data: <json>` frame. A `data: [DONE]` frame
//! follows `finish`, so a cancelled stream never carries it.

use axum::response::{
    IntoResponse, Response,
    sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt, stream};
use mock_stream_core::{EventStream, StreamEvent};
use std::{convert::Infallible, pin::Pin, time::Duration};

/// Header announcing the UI message stream protocol to clients
pub const UI_MESSAGE_STREAM_HEADER: &str = "x-vercel-ai-ui-message-stream";

/// Terminal sentinel sent after `finish`
pub const DONE_SENTINEL: &str = "[DONE]";

type ChatSseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

/// Wrap a core event stream as an SSE response
pub fn stream_response(events: EventStream) -> Response {
    let frames: ChatSseStream = Box::pin(events.flat_map(|event| {
        let done = event.is_terminal().then(|| Ok(Event::default().data(DONE_SENTINEL)));
        stream::iter(std::iter::once(Ok(to_sse(&event))).chain(done))
    }));

    (
        [(UI_MESSAGE_STREAM_HEADER, "v1")],
        Sse::new(frames).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))),
    )
        .into_response()
}

fn to_sse(event: &StreamEvent) -> Event {
    match event.to_json() {
        Ok(json) => Event::default().data(json),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode stream event");
            Event::default().comment("encoding error")
        }
    }
}
