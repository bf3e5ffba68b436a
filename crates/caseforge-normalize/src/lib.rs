// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient normalization of generative-model text into structured values.
//!
//! Model output is supposed to be JSON but frequently arrives wrapped in
//! prose, fenced, or truncated. [`normalize_object`] and [`normalize_list`]
//! turn raw text into a typed value through a deterministic fallback chain,
//! stopping at the first success:
//!
//! 1. strict parse of the entire text, accepted when the shape category
//!    matches (list expectation coerces a lone value into a one-element
//!    array);
//! 2. strict parse of the first-brace .. last-brace substring;
//! 3. the caller-supplied default, flagged as a fallback.
//!
//! Total functions: no I/O, never panic, never error on malformed input.

use serde_json::Value;

/// Where a normalized value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The entire response parsed as the expected shape.
    StrictParsed,
    /// A structured blob embedded in surrounding prose was extracted
    /// and parsed.
    ExtractedFromText,
    /// Nothing parsable was present; the caller-supplied default was used.
    Fallback,
}

/// A best-effort structured value plus its provenance.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub value: Value,
    pub provenance: Provenance,
}

impl Normalized {
    /// True when the value is the caller-supplied default rather than
    /// anything the model produced.
    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// Normalize raw text into a JSON object.
///
/// `fallback` runs only when neither strict parsing nor blob extraction
/// yields an object.
pub fn normalize_object<F>(raw: &str, fallback: F) -> Normalized
where
    F: FnOnce() -> Value,
{
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        if value.is_object() {
            return Normalized {
                value,
                provenance: Provenance::StrictParsed,
            };
        }
    }

    if let Some(value) = extract_delimited(raw, '{', '}').filter(Value::is_object) {
        return Normalized {
            value,
            provenance: Provenance::ExtractedFromText,
        };
    }

    Normalized {
        value: fallback(),
        provenance: Provenance::Fallback,
    }
}

/// Normalize raw text into a JSON array.
///
/// A strict parse that yields a non-array value is coerced into a
/// single-element array, mirroring the "ensure it's a list" convention of
/// the call sites that consume suggestion lists.
pub fn normalize_list<F>(raw: &str, fallback: F) -> Normalized
where
    F: FnOnce() -> Value,
{
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        let value = match value {
            Value::Array(_) => value,
            other => Value::Array(vec![other]),
        };
        return Normalized {
            value,
            provenance: Provenance::StrictParsed,
        };
    }

    if let Some(value) = extract_delimited(raw, '[', ']').filter(Value::is_array) {
        return Normalized {
            value,
            provenance: Provenance::ExtractedFromText,
        };
    }

    Normalized {
        value: fallback(),
        provenance: Provenance::Fallback,
    }
}

/// Parse the substring from the first `open` through the last `close`.
///
/// Both delimiters are ASCII, so byte slicing is safe. Returns `None` when
/// the delimiters are absent, out of order, or the substring is not valid
/// JSON.
fn extract_delimited(raw: &str, open: char, close: char) -> Option<Value> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}
