// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Precomputed prompt/response collections

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::CollectionRecord;

/// Lookup interface for canned responses
#[async_trait]
pub trait CollectionLookup: Send + Sync {
    /// Response text recorded for `prompt`, if any
    async fn lookup(&self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Collection store built once from configuration. Prompts that differ
/// only in case or whitespace share one slot; the last record wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollections {
    records: HashMap<String, String>,
}

impl InMemoryCollections {
    pub fn from_records(records: &[CollectionRecord]) -> Self {
        let records = records
            .iter()
            .map(|record| (match_key(&record.prompt), record.response.clone()))
            .collect();
        Self { records }
    }
}

#[async_trait]
impl CollectionLookup for InMemoryCollections {
    async fn lookup(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        Ok(self.records.get(&match_key(prompt)).cloned())
    }
}

fn match_key(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prompt: &str, response: &str) -> CollectionRecord {
        CollectionRecord {
            prompt: prompt.to_string(),
            response: response.to_string(),
        }
    }

    #[tokio::test]
    async fn lookup_ignores_case_and_whitespace() {
        let collections =
            InMemoryCollections::from_records(&[record("What is  Rust?", "A language.")]);

        assert_eq!(
            collections.lookup("  what IS rust?\n").await.unwrap(),
            Some("A language.".to_string())
        );
        assert_eq!(collections.lookup("what is go?").await.unwrap(), None);
    }

    #[tokio::test]
    async fn later_record_replaces_equivalent_prompt() {
        let collections = InMemoryCollections::from_records(&[
            record("Hello", "first"),
            record("  hello ", "second"),
        ]);

        assert_eq!(
            collections.lookup("HELLO").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn empty_prompt_only_matches_empty_record() {
        let empty = InMemoryCollections::default();
        assert_eq!(empty.lookup("").await.unwrap(), None);

        let collections = InMemoryCollections::from_records(&[record("", "blank")]);
        assert_eq!(
            collections.lookup("   ").await.unwrap(),
            Some("blank".to_string())
        );
        assert_eq!(collections.lookup("x").await.unwrap(), None);
    }
}
