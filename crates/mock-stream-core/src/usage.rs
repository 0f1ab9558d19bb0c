// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Approximate token accounting
//!
//! This is the usual "four characters per token" heuristic, not a tokenizer.
//! Lengths are measured in UTF-16 code units so figures line up with what
//! JavaScript clients compute for the same strings.

use serde::{Deserialize, Serialize};

/// Token usage reported on the terminal `finish` event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Estimate usage for a prompt/response pair
pub fn estimate(prompt: &str, response: &str) -> Usage {
    let prompt_len = text_len(prompt);
    let response_len = text_len(response);

    let input_tokens = if prompt_len == 0 {
        0
    } else {
        tokens_for(prompt_len).max(1)
    };

    Usage {
        input_tokens,
        output_tokens: tokens_for(response_len).max(1),
        total_tokens: tokens_for(prompt_len + response_len).max(1),
    }
}

fn text_len(text: &str) -> u64 {
    text.encode_utf16().count() as u64
}

fn tokens_for(len: u64) -> u64 {
    len.div_ceil(4)
}
