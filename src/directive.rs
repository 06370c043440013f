//! Directive extraction from free-text tool input.
//!
//! Test cases steer this server by embedding bracketed directives anywhere
//! in the tool's `task_description` argument, e.g.
//!
//! ```text
//! Please fetch the widget. [test_case_id=case-7][mcp_responses_json=eyJmb28iOiAxfQ==]
//! ```
//!
//! The two directives are matched by independent patterns so they may appear
//! in any order; the surrounding prose is ignored.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Matches `[test_case_id=<token>]` where the token is word characters,
/// dots, or hyphens.
static TEST_CASE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[test_case_id=([\w.-]+)\]").expect("valid pattern"));

/// Matches `[mcp_responses_json=<base64>]`.
static RESPONSES_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[mcp_responses_json=([\w=+/]+)\]").expect("valid pattern"));

/// Directive extraction failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The required test-case identifier directive was not found
    #[error("Directive [test_case_id=...] not found in task_description.")]
    MissingTestCaseId,
}

/// Parsed per-call directives.
///
/// Call-scoped: recomputed from the text argument on every call, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Opaque test-case identifier scoping one scripted response sequence
    pub test_case_id: String,
    /// Base64-encoded JSON array of responses, present only when the caller
    /// chose to include it
    pub responses_payload: Option<String>,
}

impl Directive {
    /// Extract directives from a free-text tool argument.
    ///
    /// The identifier directive is required; the payload directive is
    /// optional here (whether its absence is an error depends on registry
    /// state, not on the extractor).
    pub fn extract(text: &str) -> Result<Self, ExtractionError> {
        let test_case_id = TEST_CASE_ID
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(ExtractionError::MissingTestCaseId)?;

        let responses_payload = RESPONSES_JSON
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        Ok(Self {
            test_case_id,
            responses_payload,
        })
    }
}
