// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Request-local composition of the generation stages

use rand::RngCore;
use serde_json::{Map, Value, json};

use crate::catalog::{Catalog, IndexSource};
use crate::chunker::{ChunkMode, DEFAULT_CHUNK_MAX_LEN, chunk};
use crate::classifier::{Category, classify, derive_subject};
use crate::emitter::Turn;
use crate::error::CoreResult;
use crate::lorem::{LoremOptions, TextSource};
use crate::usage::estimate;

/// Where the response text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrigin {
    /// A precomputed record supplied by the caller
    Canned,
    /// A catalog template; `None` is the fallback template
    Template(Option<usize>),
}

/// A chat turn ready to emit, with the decisions that produced it
#[derive(Debug, Clone)]
pub struct PreparedChat {
    pub subject: String,
    pub category: Category,
    pub origin: ResponseOrigin,
    pub text: String,
    pub turn: Turn,
}

/// Stateless generation pipeline shared by all requests
#[derive(Debug, Clone)]
pub struct Pipeline {
    catalog: Catalog,
    chunk_max_len: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Catalog::standard(), DEFAULT_CHUNK_MAX_LEN)
    }
}

impl Pipeline {
    pub fn new(catalog: Catalog, chunk_max_len: usize) -> Self {
        Self {
            catalog,
            chunk_max_len: chunk_max_len.max(1),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Classify `prompt`, pick or accept response text, chunk it with the
    /// bounded-word policy and attach usage.
    pub fn prepare_chat(
        &self,
        prompt: &str,
        canned: Option<String>,
        source: &mut dyn IndexSource,
    ) -> PreparedChat {
        let subject = derive_subject(prompt);
        let category = classify(prompt);

        let (origin, text) = match canned {
            Some(text) => (ResponseOrigin::Canned, text),
            None => {
                let (index, text) = self.catalog.pick_with_index(category, &subject, source);
                (ResponseOrigin::Template(index), text)
            }
        };

        let chunks = chunk(
            &text,
            ChunkMode::BoundedWords {
                max_len: self.chunk_max_len,
            },
        );
        let usage = estimate(prompt, &text);

        tracing::debug!(
            %category,
            ?origin,
            chunks = chunks.len(),
            total_tokens = usage.total_tokens,
            "prepared chat turn"
        );

        let mut metadata = Map::new();
        metadata.insert("category".to_string(), json!(category.as_str()));
        metadata.insert("subject".to_string(), Value::String(subject.clone()));

        PreparedChat {
            subject,
            category,
            origin,
            text,
            turn: Turn {
                id: None,
                chunks,
                usage,
                metadata,
            },
        }
    }

    /// Generate filler text from `source` and chunk it losslessly
    pub fn prepare_lorem(
        &self,
        prompt: &str,
        options: &LoremOptions,
        source: &dyn TextSource,
        rng: &mut dyn RngCore,
    ) -> CoreResult<Turn> {
        let text = source.generate(options, rng)?;
        let chunks = chunk(&text, ChunkMode::Whitespace);
        let usage = estimate(prompt, &text);

        tracing::debug!(
            units = ?options.units,
            count = options.count,
            chunks = chunks.len(),
            "prepared filler turn"
        );

        Ok(Turn {
            id: None,
            chunks,
            usage,
            metadata: Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FixedIndex, SeededIndex};
    use crate::lorem::{LoremIpsum, LoremUnits};
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn chat_turn_reassembles_the_rendered_template() {
        let pipeline = Pipeline::default();
        let prepared = pipeline.prepare_chat("Who is Ada Lovelace?", None, &mut FixedIndex(0));

        assert_eq!(prepared.category, Category::Person);
        assert_eq!(prepared.subject, "Ada Lovelace?");
        assert_eq!(prepared.origin, ResponseOrigin::Template(Some(0)));
        assert!(prepared.text.contains("Ada Lovelace?"));
        assert_eq!(prepared.turn.usage, estimate("Who is Ada Lovelace?", &prepared.text));

        let squash = |text: &str| text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(squash(&prepared.turn.chunks.concat()), squash(&prepared.text));
    }

    #[test]
    fn canned_text_bypasses_catalog() {
        let pipeline = Pipeline::default();
        let prepared = pipeline.prepare_chat(
            "hello",
            Some("Canned answer.".to_string()),
            &mut SeededIndex::new(1),
        );
        assert_eq!(prepared.origin, ResponseOrigin::Canned);
        assert_eq!(prepared.turn.chunks, vec!["Canned answer."]);
    }

    #[test]
    fn chat_metadata_carries_category_and_subject() {
        let prepared =
            Pipeline::default().prepare_chat("the startup scene", None, &mut SeededIndex::new(5));
        assert_eq!(prepared.turn.metadata["category"], json!("company"));
        assert_eq!(prepared.turn.metadata["subject"], json!("the startup scene"));
    }

    #[test]
    fn lorem_turn_is_lossless() {
        let pipeline = Pipeline::default();
        let options = LoremOptions {
            count: 2,
            units: LoremUnits::Paragraphs,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let turn = pipeline.prepare_lorem("", &options, &LoremIpsum, &mut rng).unwrap();

        let mut rng = SmallRng::seed_from_u64(3);
        let expected = LoremIpsum.generate(&options, &mut rng).unwrap();
        assert_eq!(turn.chunks.concat(), expected);
        assert_eq!(turn.usage.input_tokens, 0);
    }

    #[test]
    fn lorem_rejects_invalid_options() {
        let options = LoremOptions {
            paragraph_lower_bound: 8,
            paragraph_upper_bound: 2,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(Pipeline::default()
            .prepare_lorem("x", &options, &LoremIpsum, &mut rng)
            .is_err());
    }
}
