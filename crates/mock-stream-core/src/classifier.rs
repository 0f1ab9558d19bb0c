// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Prompt classification and subject extraction
//!
//! Both functions are pure keyword heuristics. They exist to pick a plausible
//! template family, not to understand the prompt.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Subject used when the prompt is empty after cleaning
pub const SUBJECT_PLACEHOLDER: &str = "Lorem Ipsum";

/// Subjects longer than this are truncated
const SUBJECT_MAX_CHARS: usize = 60;

/// Characters kept before the ellipsis when truncating
const SUBJECT_KEEP_CHARS: usize = 57;

const PERSON_TERMS: &[&str] = &[
    "who",
    "person",
    "biography",
    "profile",
    "individual",
    "speaker",
    "author",
];

const COMPANY_TERMS: &[&str] = &[
    "company",
    "startup",
    "business",
    "organization",
    "corporation",
    "firm",
    "enterprise",
    "team",
];

/// Coarse intent of a prompt, selecting the template family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Person,
    Company,
    Generic,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Person, Category::Company, Category::Generic];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Person => "person",
            Category::Company => "company",
            Category::Generic => "generic",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a prompt. Person vocabulary wins over company vocabulary.
pub fn classify(prompt: &str) -> Category {
    let lowered = prompt.to_lowercase();
    if PERSON_TERMS.iter().any(|term| lowered.contains(term)) {
        Category::Person
    } else if COMPANY_TERMS.iter().any(|term| lowered.contains(term)) {
        Category::Company
    } else {
        Category::Generic
    }
}

/// Derive the display subject from a prompt
pub fn derive_subject(prompt: &str) -> String {
    static LEADING_PHRASE: OnceLock<Regex> = OnceLock::new();
    let leading = LEADING_PHRASE.get_or_init(|| {
        Regex::new(r"(?i)^(tell me about|who is|who was|what is|describe|give me|explain)\s+")
            .expect("leading phrase pattern is valid")
    });

    let stripped = leading.replace(prompt, "");
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.is_empty() {
        return SUBJECT_PLACEHOLDER.to_string();
    }

    if cleaned.chars().count() > SUBJECT_MAX_CHARS {
        let mut truncated: String = cleaned.chars().take(SUBJECT_KEEP_CHARS).collect();
        truncated.push('…');
        return truncated;
    }

    cleaned
}
