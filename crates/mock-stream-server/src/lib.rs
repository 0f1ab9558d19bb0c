// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mock LLM streaming server
//!
//! Serves `POST /api/chat` and `POST /api/lorem` as server-sent event streams
//! built by `mock-stream-core`, plus `/healthz` and `/version`. Request errors
//! are reported as Problem+JSON.

pub mod collections;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;
pub mod state;

pub use collections::{CollectionLookup, InMemoryCollections};
pub use config::{CONFIG_ENV_VAR, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::Server;
pub use state::AppState;
