//! Response registry: per-test-case queues of scripted responses.
//!
//! Process-wide state shared by every transport binding. Each test-case
//! identifier owns one FIFO queue, decoded from its payload directive
//! exactly once and consumed one entry per call until exhausted. Queues are
//! never removed; restarting the server is the only reset mechanism.

use std::collections::{HashMap, VecDeque};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Per-call serve failures.
///
/// All four directive errors (this enum plus the extractor's missing-id
/// case) are terminal for the call and surface as structured error bodies
/// so test clients can assert on their content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServeError {
    /// The identifier is new but the call carried no payload directive
    #[error("Directive [mcp_responses_json=...] not found for new test case.")]
    NoPayloadForNewCase,

    /// The payload directive failed base64, UTF-8, or JSON decoding
    #[error("Failed to decode mcp_responses_json: {0}")]
    BadEncoding(String),

    /// The identifier is known but its queue is empty
    #[error("No more responses available for test case '{0}'.")]
    Exhausted(String),
}

/// Registry mapping test-case identifiers to their pending response queues.
///
/// Constructed once at server start and injected into every call handler.
/// The whole map sits behind a single coarse mutex: call volume in tests is
/// tiny and the compound lookup-or-create-then-pop sequence must be one
/// exclusive region anyway.
#[derive(Debug, Default)]
pub struct ResponseRegistry {
    /// Queues by test-case identifier
    queues: Mutex<HashMap<String, VecDeque<Value>>>,
}

impl ResponseRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the queue for `id` and pop its next scripted response.
    ///
    /// On first sight of `id` the payload directive is decoded and stored;
    /// for a known `id` any payload in `raw_payload` is silently ignored so
    /// that callers can resend the full directive text on every call. A
    /// decode failure leaves no trace: the identifier stays unknown and a
    /// later call with a valid payload starts fresh.
    ///
    /// The returned value is the pre-normalization queue entry; key-casing
    /// rewriting happens at serve time, outside the lock.
    pub fn resolve_and_pop(
        &self,
        id: &str,
        raw_payload: Option<&str>,
    ) -> Result<Value, ServeError> {
        let mut queues = self.queues.lock();

        if let Some(queue) = queues.get_mut(id) {
            return queue
                .pop_front()
                .ok_or_else(|| ServeError::Exhausted(id.to_string()));
        }

        let raw = raw_payload.ok_or(ServeError::NoPayloadForNewCase)?;
        let mut responses = decode_payload(raw)?;
        debug!(case_id = %id, scripted = responses.len(), "Decoded response queue");

        let popped = responses
            .pop_front()
            .ok_or_else(|| ServeError::Exhausted(id.to_string()));
        queues.insert(id.to_string(), responses);
        popped
    }

    /// Number of responses still pending for `id`, if the identifier is
    /// known.
    #[must_use]
    pub fn pending(&self, id: &str) -> Option<usize> {
        self.queues.lock().get(id).map(VecDeque::len)
    }
}

/// Decode a payload directive value into a response queue.
///
/// base64 -> UTF-8 -> JSON, and the top level must be an array. Any failure
/// is reported with the underlying decode error attached.
fn decode_payload(raw: &str) -> Result<VecDeque<Value>, ServeError> {
    let bytes = BASE64
        .decode(raw)
        .map_err(|e| ServeError::BadEncoding(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| ServeError::BadEncoding(e.to_string()))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| ServeError::BadEncoding(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items.into()),
        other => Err(ServeError::BadEncoding(format!(
            "expected a JSON array of responses, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Human-readable JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
