// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Parameter-driven filler text

use rand::{Rng, RngCore, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const DEFAULT_WORDS: &[&str] = &[
    "ad", "adipisicing", "aliqua", "aliquip", "amet", "anim", "aute", "cillum", "commodo",
    "consectetur", "consequat", "culpa", "cupidatat", "deserunt", "do", "dolor", "dolore", "duis",
    "ea", "eiusmod", "elit", "enim", "esse", "est", "et", "eu", "ex", "excepteur", "exercitation",
    "fugiat", "id", "in", "incididunt", "ipsum", "irure", "labore", "laboris", "laborum", "lorem",
    "magna", "minim", "mollit", "nisi", "non", "nostrud", "nulla", "occaecat", "officia",
    "pariatur", "proident", "qui", "quis", "reprehenderit", "sint", "sit", "sunt", "tempor",
    "ullamco", "ut", "velit", "veniam", "voluptate",
];

/// Unit that `count` refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoremUnits {
    Words,
    #[default]
    Sentences,
    Paragraphs,
}

/// Structural bounds for generated filler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoremOptions {
    pub count: u32,
    pub paragraph_lower_bound: u32,
    pub paragraph_upper_bound: u32,
    pub sentence_lower_bound: u32,
    pub sentence_upper_bound: u32,
    /// Separator placed between paragraphs
    pub suffix: String,
    pub units: LoremUnits,
    /// Replacement vocabulary; the built-in latin list when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
}

impl Default for LoremOptions {
    fn default() -> Self {
        Self {
            count: 1,
            paragraph_lower_bound: 3,
            paragraph_upper_bound: 7,
            sentence_lower_bound: 5,
            sentence_upper_bound: 15,
            suffix: "\n".to_string(),
            units: LoremUnits::Sentences,
            words: None,
        }
    }
}

/// Largest accepted count or bound
pub const LOREM_LIMIT: u32 = 100;

/// One broken option rule, keyed by the camelCase field name clients send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoremIssue {
    pub field: &'static str,
    pub code: &'static str,
    pub message: &'static str,
}

impl LoremIssue {
    fn new(field: &'static str, code: &'static str, message: &'static str) -> Self {
        Self {
            field,
            code,
            message,
        }
    }
}

impl LoremOptions {
    /// Every rule these options break, in field order
    pub fn issues(&self) -> Vec<LoremIssue> {
        let mut issues = Vec::new();

        let ranged = [
            ("count", self.count),
            ("paragraphLowerBound", self.paragraph_lower_bound),
            ("paragraphUpperBound", self.paragraph_upper_bound),
            ("sentenceLowerBound", self.sentence_lower_bound),
            ("sentenceUpperBound", self.sentence_upper_bound),
        ];
        for (field, value) in ranged {
            if !(1..=LOREM_LIMIT).contains(&value) {
                issues.push(LoremIssue::new(field, "range", "must be between 1 and 100"));
            }
        }

        if self.paragraph_lower_bound > self.paragraph_upper_bound {
            issues.push(LoremIssue::new(
                "paragraphLowerBound",
                "bound_order",
                "must not exceed paragraphUpperBound",
            ));
        }
        if self.sentence_lower_bound > self.sentence_upper_bound {
            issues.push(LoremIssue::new(
                "sentenceLowerBound",
                "bound_order",
                "must not exceed sentenceUpperBound",
            ));
        }
        if self.words.as_ref().is_some_and(|words| words.is_empty()) {
            issues.push(LoremIssue::new(
                "words",
                "length",
                "must not be empty when provided",
            ));
        }

        issues
    }

    pub fn validate(&self) -> CoreResult<()> {
        match self.issues().first() {
            Some(issue) => Err(CoreError::InvalidOptions {
                message: format!("{} {}", issue.field, issue.message),
            }),
            None => Ok(()),
        }
    }
}

/// Pluggable source of filler text.
///
/// Implementations must be deterministic for a given RNG state.
pub trait TextSource: Send + Sync {
    fn generate(&self, options: &LoremOptions, rng: &mut dyn RngCore) -> CoreResult<String>;
}

/// Classic lorem-ipsum generator
#[derive(Debug, Clone, Copy, Default)]
pub struct LoremIpsum;

impl TextSource for LoremIpsum {
    fn generate(&self, options: &LoremOptions, rng: &mut dyn RngCore) -> CoreResult<String> {
        options.validate()?;

        let vocabulary: Vec<&str> = match &options.words {
            Some(words) => words.iter().map(String::as_str).collect(),
            None => DEFAULT_WORDS.to_vec(),
        };

        let text = match options.units {
            LoremUnits::Words => words(&vocabulary, options.count, rng),
            LoremUnits::Sentences => (0..options.count)
                .map(|_| sentence(&vocabulary, options, rng))
                .collect::<Vec<_>>()
                .join(" "),
            LoremUnits::Paragraphs => (0..options.count)
                .map(|_| paragraph(&vocabulary, options, rng))
                .collect::<Vec<_>>()
                .join(&options.suffix),
        };
        Ok(text)
    }
}

fn words(vocabulary: &[&str], count: u32, rng: &mut dyn RngCore) -> String {
    (0..count)
        .filter_map(|_| vocabulary.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence(vocabulary: &[&str], options: &LoremOptions, rng: &mut dyn RngCore) -> String {
    let length = rng.gen_range(options.sentence_lower_bound..=options.sentence_upper_bound);
    let mut text = capitalize(&words(vocabulary, length, rng));
    text.push('.');
    text
}

fn paragraph(vocabulary: &[&str], options: &LoremOptions, rng: &mut dyn RngCore) -> String {
    let length = rng.gen_range(options.paragraph_lower_bound..=options.paragraph_upper_bound);
    (0..length)
        .map(|_| sentence(vocabulary, options, rng))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
