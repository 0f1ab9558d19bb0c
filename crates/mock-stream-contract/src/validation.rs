// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Body parsing and validation helpers for API contract types

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{ApiContractError, BODY_FIELD};

/// A request body that can be parsed and validated in one step
pub trait RequestBody: DeserializeOwned + Validate {
    /// Cross-field rules the derive cannot express
    fn validate_relations(&self, _errors: &mut ValidationErrors) {}
}

/// Parse and validate a raw JSON body.
///
/// Syntax errors become [`ApiContractError::Malformed`]; well-formed JSON of
/// the wrong shape becomes [`ApiContractError::Schema`]; rule violations are
/// collected into a single [`ApiContractError::Validation`].
pub fn parse_request<T: RequestBody>(body: &[u8]) -> Result<T, ApiContractError> {
    let request: T = serde_json::from_slice(body).map_err(|err| match err.classify() {
        Category::Data => ApiContractError::Schema(err),
        Category::Syntax | Category::Eof | Category::Io => ApiContractError::Malformed(err),
    })?;

    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
    request.validate_relations(&mut errors);

    if errors.errors().is_empty() {
        Ok(request)
    } else {
        Err(ApiContractError::Validation(errors))
    }
}

/// Flatten nested validation errors into `path -> messages`.
///
/// Nested structs are joined with `.` and list items with `[index]`, e.g.
/// `messages[0].content`. Struct-level errors are reported against the
/// enclosing path, or `body` at the top level.
pub fn field_errors(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut out = HashMap::new();
    collect(errors, None, &mut out);
    for messages in out.values_mut() {
        messages.sort();
    }
    out
}

fn collect(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut HashMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let field: &str = field;
        let path = match (field, prefix) {
            ("__all__", Some(prefix)) => prefix.to_string(),
            ("__all__", None) => BODY_FIELD.to_string(),
            (field, Some(prefix)) => format!("{prefix}.{}", camel_case(field)),
            (field, None) => camel_case(field),
        };

        match kind {
            ValidationErrorsKind::Field(list) => out
                .entry(path)
                .or_default()
                .extend(list.iter().map(describe)),
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("failed the '{}' rule", error.code),
    }
}

/// Field names are reported the way clients spell them
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatRequest, LoremRequest};
    use pretty_assertions::assert_eq;

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("sentence_lower_bound"), "sentenceLowerBound");
        assert_eq!(camel_case("count"), "count");
        assert_eq!(camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(camel_case("_leading"), "leading");
    }

    #[test]
    fn syntax_error_is_malformed() {
        let err = parse_request::<ChatRequest>(b"{not json").unwrap_err();
        assert!(matches!(err, ApiContractError::Malformed(_)));

        let err = parse_request::<ChatRequest>(b"").unwrap_err();
        assert!(matches!(err, ApiContractError::Malformed(_)));
    }

    #[test]
    fn wrong_shape_is_schema_error() {
        let err = parse_request::<ChatRequest>(br#"{"messages": "hello"}"#).unwrap_err();
        assert!(matches!(err, ApiContractError::Schema(_)));

        let err =
            parse_request::<ChatRequest>(br#"{"messages": [{"role": "wizard"}]}"#).unwrap_err();
        assert!(matches!(err, ApiContractError::Schema(_)));
    }

    #[test]
    fn missing_messages_fail_validation() {
        let err = parse_request::<ChatRequest>(b"{}").unwrap_err();
        let errors = err.field_errors();
        assert_eq!(
            errors.get("messages"),
            Some(&vec!["at least one message is required".to_string()])
        );
    }

    #[test]
    fn out_of_range_and_inverted_bounds_are_all_reported() {
        let body = br#"{
            "messages": [{"role": "user", "content": "x"}],
            "count": 0,
            "sentenceLowerBound": 10,
            "sentenceUpperBound": 4,
            "words": []
        }"#;
        let errors = parse_request::<LoremRequest>(body).unwrap_err().field_errors();

        assert_eq!(
            errors.get("count"),
            Some(&vec!["must be between 1 and 100".to_string()])
        );
        assert_eq!(
            errors.get("sentenceLowerBound"),
            Some(&vec!["must not exceed sentenceUpperBound".to_string()])
        );
        assert_eq!(
            errors.get("words"),
            Some(&vec!["must not be empty when provided".to_string()])
        );
        assert!(!errors.contains_key("paragraphLowerBound"));
    }

    #[test]
    fn valid_body_parses() {
        let request = parse_request::<LoremRequest>(
            br#"{"messages": [{"role": "user", "content": "x"}], "count": 3}"#,
        )
        .unwrap();
        assert_eq!(request.options.count, 3);
    }

    #[test]
    fn struct_level_and_snake_case_errors_are_mapped() {
        let mut errors = ValidationErrors::new();
        errors.add("__all__", ValidationError::new("shape"));
        errors.add("tool_call_id", ValidationError::new("length"));

        let flat = field_errors(&errors);
        assert_eq!(
            flat.get("toolCallId"),
            Some(&vec!["failed the 'length' rule".to_string()])
        );
        assert_eq!(
            flat.get("body"),
            Some(&vec!["failed the 'shape' rule".to_string()])
        );
    }
}
