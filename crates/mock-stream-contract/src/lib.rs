// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mock streaming API contract types and validation
//!
//! This crate defines the request bodies accepted by the mock streaming
//! server, the rules they are validated against and the Problem+JSON shape
//! used for every error response. The server and its tests share these types.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::{RequestBody, field_errors, parse_request};
