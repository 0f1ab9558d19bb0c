// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server state management

use mock_stream_core::{Catalog, LoremIpsum, Pipeline, SeededIndex, StreamEmitter, TextSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::collections::{CollectionLookup, InMemoryCollections};
use crate::config::ServerConfig;

/// Shared server state. Everything here is immutable after start-up; each
/// request builds its own generation state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pipeline: Arc<Pipeline>,
    pub chat_emitter: StreamEmitter,
    pub lorem_emitter: StreamEmitter,
    pub collections: Arc<dyn CollectionLookup>,
    pub text_source: Arc<dyn TextSource>,
    /// Cancelled on shutdown; every stream holds a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// State with the built-in catalog, lorem generator and the configured
    /// collections
    pub fn new(config: ServerConfig) -> Self {
        let collections = Arc::new(InMemoryCollections::from_records(&config.collections));
        Self::with_sources(config, collections, Arc::new(LoremIpsum))
    }

    /// State with caller-provided collaborators
    pub fn with_sources(
        config: ServerConfig,
        collections: Arc<dyn CollectionLookup>,
        text_source: Arc<dyn TextSource>,
    ) -> Self {
        let pipeline = Pipeline::new(Catalog::standard(), config.chat.chunk_max_len);
        let chat_emitter = StreamEmitter::new(config.chat.profile.clone(), config.chat.pacing);
        let lorem_emitter = StreamEmitter::new(config.lorem.profile.clone(), config.lorem.pacing);

        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            chat_emitter,
            lorem_emitter,
            collections,
            text_source,
            shutdown: CancellationToken::new(),
        }
    }

    /// Per-request randomness: the configured seed, or fresh entropy
    pub fn index_source(&self) -> SeededIndex {
        match self.config.generation.seed {
            Some(seed) => SeededIndex::new(seed),
            None => SeededIndex::from_entropy(),
        }
    }

    /// Cancellation token for one response stream
    pub fn stream_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
