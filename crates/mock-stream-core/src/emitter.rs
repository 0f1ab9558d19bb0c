// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Canonical stream-event emission
//!
//! A response turn is emitted as:
//!
//! ```text
//! start?  text-start{id}  text-delta{id, delta}*  text-end{id}  finish{stop}
//! ```
//!
//! The stream is cold and single-pass: nothing is produced until the consumer
//! polls, the chunks are owned by the stream, and a finished or cancelled
//! stream cannot be replayed. Pacing delays are `tokio` timers raced against
//! the cancellation token, so a paced stream only ever suspends its own task.

use futures::{Stream, StreamExt, stream};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::pin::Pin;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::usage::Usage;

/// Boxed event stream handed to transports
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Why the turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    Stop,
}

/// One protocol event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    Start,
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    Finish {
        #[serde(rename = "finishReason")]
        finish_reason: FinishReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
        #[serde(
            rename = "providerMetadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<Map<String, Value>>,
        #[serde(
            rename = "messageMetadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        message_metadata: Option<Map<String, Value>>,
    },
}

impl StreamEvent {
    /// Compact JSON for one wire frame
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Finish { .. })
    }
}

/// Wire variant. Both share one emitter; only the framing of the leading and
/// terminal events differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamProfile {
    /// Leading `start`; usage and metadata under `providerMetadata.<namespace>`
    Namespaced { namespace: String },
    /// No `start`; top-level `usage`, metadata under `messageMetadata`
    Plain,
}

impl Default for StreamProfile {
    fn default() -> Self {
        StreamProfile::Namespaced {
            namespace: "mock".to_string(),
        }
    }
}

impl StreamProfile {
    pub fn emits_start(&self) -> bool {
        matches!(self, StreamProfile::Namespaced { .. })
    }

    fn finish(&self, usage: Usage, metadata: Map<String, Value>) -> StreamEvent {
        match self {
            StreamProfile::Namespaced { namespace } => {
                let mut scoped = metadata;
                scoped.insert(
                    "usage".to_string(),
                    serde_json::to_value(usage).unwrap_or(Value::Null),
                );
                let mut provider = Map::new();
                provider.insert(namespace.clone(), Value::Object(scoped));
                StreamEvent::Finish {
                    finish_reason: FinishReason::Stop,
                    usage: None,
                    provider_metadata: Some(provider),
                    message_metadata: None,
                }
            }
            StreamProfile::Plain => StreamEvent::Finish {
                finish_reason: FinishReason::Stop,
                usage: Some(usage),
                provider_metadata: None,
                message_metadata: (!metadata.is_empty()).then_some(metadata),
            },
        }
    }
}

/// Artificial timing applied while emitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Delay before the first event, in milliseconds
    pub initial_delay_ms: u64,
    /// Delay before each `text-delta`, in milliseconds
    pub chunk_delay_ms: u64,
}

impl Pacing {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn per_chunk(delay: Duration) -> Self {
        Self {
            initial_delay_ms: 0,
            chunk_delay_ms: delay.as_millis() as u64,
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

/// Everything needed to emit one response turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Turn {
    /// Text block id; generated when absent
    pub id: Option<String>,
    pub chunks: Vec<String>,
    pub usage: Usage,
    /// Extra fields merged into the finish metadata
    pub metadata: Map<String, Value>,
}

/// Builds event streams for a fixed profile and pacing
#[derive(Debug, Clone, Default)]
pub struct StreamEmitter {
    profile: StreamProfile,
    pacing: Pacing,
}

impl StreamEmitter {
    pub fn new(profile: StreamProfile, pacing: Pacing) -> Self {
        Self { profile, pacing }
    }

    pub fn profile(&self) -> &StreamProfile {
        &self.profile
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Emit `turn` lazily. Cancelling `cancel` ends the stream before the next
    /// event; a pending pacing delay is abandoned immediately.
    pub fn emit(&self, turn: Turn, cancel: CancellationToken) -> EventStream {
        let id = turn
            .id
            .unwrap_or_else(|| format!("txt-{}", Uuid::new_v4().simple()));
        let state = Emission {
            id,
            chunks: turn.chunks.into_iter(),
            usage: turn.usage,
            metadata: Some(turn.metadata),
            profile: self.profile.clone(),
            pacing: self.pacing,
            cancel,
            phase: Phase::Start,
            delivered: 0,
        };

        Box::pin(
            stream::unfold(state, |mut state| async move {
                let event = state.next_event().await?;
                Some((event, state))
            })
            .fuse(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    TextStart,
    Deltas,
    TextEnd,
    Finish,
    Done,
}

struct Emission {
    id: String,
    chunks: std::vec::IntoIter<String>,
    usage: Usage,
    metadata: Option<Map<String, Value>>,
    profile: StreamProfile,
    pacing: Pacing,
    cancel: CancellationToken,
    phase: Phase,
    delivered: usize,
}

impl Emission {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        loop {
            if self.phase == Phase::Done {
                return None;
            }
            if self.cancel.is_cancelled() {
                return self.abandon();
            }

            match self.phase {
                Phase::Start => {
                    self.phase = Phase::TextStart;
                    if !self.pause(self.pacing.initial_delay()).await {
                        return self.abandon();
                    }
                    if self.profile.emits_start() {
                        return Some(StreamEvent::Start);
                    }
                }
                Phase::TextStart => {
                    self.phase = Phase::Deltas;
                    return Some(StreamEvent::TextStart {
                        id: self.id.clone(),
                    });
                }
                Phase::Deltas => match self.chunks.next() {
                    Some(delta) => {
                        if !self.pause(self.pacing.chunk_delay()).await {
                            return self.abandon();
                        }
                        self.delivered += 1;
                        return Some(StreamEvent::TextDelta {
                            id: self.id.clone(),
                            delta,
                        });
                    }
                    None => self.phase = Phase::TextEnd,
                },
                Phase::TextEnd => {
                    self.phase = Phase::Finish;
                    return Some(StreamEvent::TextEnd {
                        id: self.id.clone(),
                    });
                }
                Phase::Finish => {
                    self.phase = Phase::Done;
                    let metadata = self.metadata.take().unwrap_or_default();
                    tracing::debug!(
                        turn_id = %self.id,
                        chunks = self.delivered,
                        output_tokens = self.usage.output_tokens,
                        "stream finished"
                    );
                    return Some(self.profile.finish(self.usage, metadata));
                }
                Phase::Done => return None,
            }
        }
    }

    /// Wait out `delay` unless cancelled first. Returns false on cancellation.
    async fn pause(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    fn abandon(&mut self) -> Option<StreamEvent> {
        self.phase = Phase::Done;
        tracing::info!(
            turn_id = %self.id,
            delivered = self.delivered,
            "stream cancelled by consumer"
        );
        None
    }
}
