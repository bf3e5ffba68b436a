// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for the Caseforge investigation engine.
//!
//! Implements [`GenerativeAdapter`] on top of the chat-completions client,
//! carrying the fixed financial-message system prompt.

pub mod client;
pub mod types;

use async_trait::async_trait;

use caseforge_config::OpenAiConfig;
use caseforge_core::{CaseforgeError, GenerativeAdapter};

pub use client::OpenAiClient;
use types::ChatMessage;

/// System prompt sent with every completion request.
const SYSTEM_PROMPT: &str =
    "You are a financial message parsing assistant. Your task is to accurately convert MT \
     messages to MX (ISO 20022) format or extract useful attributes from MT messages. Always \
     return well-structured JSON responses when requested.";

/// OpenAI-backed generative text provider.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Build a provider from explicit configuration.
    pub fn new(config: &OpenAiConfig) -> Result<Self, CaseforgeError> {
        Ok(Self {
            client: OpenAiClient::new(config)?,
        })
    }

    /// Build a provider around an existing client (used by tests).
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerativeAdapter for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CaseforgeError> {
        let response = self
            .client
            .complete_chat(vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CaseforgeError::generation("API response contained no choices"))?;

        Ok(choice.message.content)
    }
}
