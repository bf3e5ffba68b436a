// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generative provider for deterministic testing.
//!
//! `MockProvider` implements `GenerativeAdapter` with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use caseforge_core::{CaseforgeError, GenerativeAdapter};

enum Scripted {
    Text(String),
    Failure(String),
}

/// A mock generative provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned. Failures can be scripted to
/// exercise generation-error paths.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given response texts.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(Scripted::Text).collect(),
            )),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Text(text.into()));
    }

    /// Add a failure to the end of the queue; the matching `complete` call
    /// returns a generation error with this message.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Failure(message.into()));
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeAdapter for MockProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, CaseforgeError> {
        match self.responses.lock().await.pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure(message)) => Err(CaseforgeError::generation(message)),
            None => Ok("mock response".to_string()),
        }
    }
}
