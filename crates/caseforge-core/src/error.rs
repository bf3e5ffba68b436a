// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Caseforge investigation engine.

use thiserror::Error;

/// The primary error type used across all Caseforge collaborator traits and
/// core operations.
#[derive(Debug, Error)]
pub enum CaseforgeError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// An entity lookup failed: the id or reference does not resolve.
    ///
    /// Surfaced to the caller as-is; retrying the same call cannot succeed.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input failed shape validation (bad columns, bad enum label, bad range).
    #[error("validation error: {0}")]
    Validation(String),

    /// A unique-key collision (currently only the investigation reference
    /// number). Callers regenerate the key and retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Generative collaborator failure (API error, timeout, bad credentials).
    ///
    /// Distinct from a malformed-but-present response, which the normalizer
    /// degrades to a fallback value instead of erroring.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CaseforgeError {
    /// Shorthand for a [`CaseforgeError::NotFound`] with a displayable id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`CaseforgeError::Generation`] without a source.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            source: None,
        }
    }
}
