// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generative text provider trait.

use async_trait::async_trait;

use crate::error::CaseforgeError;

/// Adapter for the generative text collaborator.
///
/// The call is time-bounded and cancellable; a failure surfaces as
/// [`CaseforgeError::Generation`] and is never retried by core services
/// (the adapter itself may retry transient HTTP statuses). A malformed but
/// present response is NOT an error here — shaping it is the normalizer's
/// job.
#[async_trait]
pub trait GenerativeAdapter: Send + Sync + 'static {
    /// Sends a prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, CaseforgeError>;
}
