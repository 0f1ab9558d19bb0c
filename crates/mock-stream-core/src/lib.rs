// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mock generation and stream-emission engine
//!
//! This crate turns a chat-style request into a canonical, time-ordered event
//! stream without running a model. The flow for one request is:
//!
//! ```text
//! messages ─► normalize ─► classifier ─► catalog ─► chunker ─► emitter ─► consumer
//!                                                     usage ───┘
//! ```
//!
//! Every stage is request-local. Templates and vocabulary tables are immutable
//! statics; randomness is always injected through [`catalog::IndexSource`] or a
//! caller-owned RNG so tests can pin the output.

pub mod catalog;
pub mod chunker;
pub mod classifier;
pub mod emitter;
pub mod error;
pub mod lorem;
pub mod message;
pub mod normalize;
pub mod pipeline;
pub mod usage;

pub use catalog::{Catalog, FixedIndex, IndexSource, SeededIndex};
pub use chunker::{ChunkMode, DEFAULT_CHUNK_MAX_LEN, chunk};
pub use classifier::{Category, SUBJECT_PLACEHOLDER, classify, derive_subject};
pub use emitter::{
    EventStream, FinishReason, Pacing, StreamEmitter, StreamEvent, StreamProfile, Turn,
};
pub use error::{CoreError, CoreResult};
pub use lorem::{LOREM_LIMIT, LoremIpsum, LoremIssue, LoremOptions, LoremUnits, TextSource};
pub use message::{Message, MessageContent, Role};
pub use normalize::{last_user_prompt, normalize_content};
pub use pipeline::{Pipeline, PreparedChat, ResponseOrigin};
pub use usage::{Usage, estimate};
