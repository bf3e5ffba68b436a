// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message classification pipeline for the Caseforge investigation engine.
//!
//! Orchestrates the generative collaborator: sends conversion / extraction /
//! classification prompts, normalizes each raw response, and merges
//! everything into a single [`ProcessedMessage`]. A provider failure
//! propagates untouched; only malformed-but-present responses degrade to
//! normalization fallbacks.

pub mod actions;
pub mod bulk;
pub mod classification;
pub mod prompts;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use caseforge_core::{
    CaseforgeError, GenerativeAdapter, NewMessage, ProcessingMode, StorageAdapter,
};
use caseforge_normalize::{normalize_list, normalize_object};

pub use actions::{parse_suggestions, SuggestedAction};
pub use bulk::{read_bulk_rows, BulkOutcome, BulkRow};
pub use classification::{CaseClassification, TimelineEntry};

/// Number of leading characters scanned for the MT199 sub-type marker.
const TYPE_MARKER_WINDOW: usize = 20;

/// Result of processing one message through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedMessage {
    pub message_id: String,
    pub mode: ProcessingMode,
    /// Conversion payload (convert mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<Value>,
    /// Extracted attributes, including merged classification fields for
    /// MT199 traffic.
    pub attributes: Map<String, Value>,
    /// Explanatory note set when a normalization fallback was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Full case classification (MT199 traffic only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<CaseClassification>,
    /// True when any stage degraded to a normalization fallback.
    pub fallback: bool,
    /// Processing duration in seconds.
    pub processing_time: f64,
    pub processed_at: DateTime<Utc>,
}

/// The message classification pipeline.
///
/// Holds the generative collaborator behind a trait object; everything else
/// is pure transformation over its responses.
pub struct MessagePipeline {
    provider: Arc<dyn GenerativeAdapter>,
}

impl MessagePipeline {
    pub fn new(provider: Arc<dyn GenerativeAdapter>) -> Self {
        Self { provider }
    }

    /// Handle to the generative collaborator, for callers that build their
    /// own prompts (e.g. customer notifications).
    pub fn provider(&self) -> Arc<dyn GenerativeAdapter> {
        self.provider.clone()
    }

    /// Process a single message in the given mode.
    ///
    /// Stamps the result with a message identifier (derived from the clock
    /// when absent), the processing duration, and a completion timestamp.
    /// When the leading segment of the content carries the "199" sub-type
    /// marker, a full case classification runs and its fields merge into
    /// the result's attributes.
    pub async fn process_single(
        &self,
        content: &str,
        mode: ProcessingMode,
        message_id: Option<String>,
    ) -> Result<ProcessedMessage, CaseforgeError> {
        let started = Instant::now();
        let message_id =
            message_id.unwrap_or_else(|| format!("MT-{}", Utc::now().timestamp()));

        let (converted, mut attributes, notes, mut fallback) = match mode {
            ProcessingMode::Convert => {
                let raw = self.provider.complete(&prompts::convert_prompt(content)).await?;
                let normalized = normalize_object(&raw, || {
                    json!({
                        "mx_message": raw.clone(),
                        "notes": "Could not extract structured data, returning raw conversion"
                    })
                });
                let notes = note_from(&normalized.value, normalized.is_fallback());
                let is_fallback = normalized.is_fallback();
                (Some(normalized.value), Map::new(), notes, is_fallback)
            }
            ProcessingMode::Extract => {
                let raw = self.provider.complete(&prompts::extract_prompt(content)).await?;
                let normalized = normalize_object(&raw, || {
                    json!({
                        "attributes": {"raw_extraction": raw.clone()},
                        "notes": "Could not extract structured data"
                    })
                });
                let attributes = normalized
                    .value
                    .get("attributes")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let notes = note_from(&normalized.value, normalized.is_fallback());
                let is_fallback = normalized.is_fallback();
                (None, attributes, notes, is_fallback)
            }
        };

        let classification = if has_mt199_marker(content) {
            let (classification, classification_fallback) =
                self.classify_internal(content).await?;
            attributes.append(&mut classification.to_attribute_map());
            fallback = fallback || classification_fallback;
            Some(classification)
        } else {
            None
        };

        let processing_time = started.elapsed().as_secs_f64();
        debug!(%message_id, %mode, processing_time, "message processed");

        Ok(ProcessedMessage {
            message_id,
            mode,
            converted,
            attributes,
            notes,
            classification,
            fallback,
            processing_time,
            processed_at: Utc::now(),
        })
    }

    /// Run full STP-failure classification for an MT199 message.
    ///
    /// A provider failure propagates; a malformed response degrades to the
    /// canned UNKNOWN payload, then policy fills the gaps.
    pub async fn classify_stp_failure(
        &self,
        content: &str,
    ) -> Result<CaseClassification, CaseforgeError> {
        Ok(self.classify_internal(content).await?.0)
    }

    async fn classify_internal(
        &self,
        content: &str,
    ) -> Result<(CaseClassification, bool), CaseforgeError> {
        let raw = self.provider.complete(&prompts::classify_prompt(content)).await?;
        let normalized = normalize_object(&raw, classification::fallback_classification);
        if normalized.is_fallback() {
            warn!("classification response was unparsable, using fallback");
        }
        Ok((
            CaseClassification::from_value(&normalized.value),
            normalized.is_fallback(),
        ))
    }

    /// Suggest remediation actions for a message and its attributes.
    ///
    /// Always yields at least one action; the canned information_request
    /// suggestion covers unparsable responses.
    pub async fn suggest_actions(
        &self,
        content: &str,
        attributes: &Map<String, Value>,
    ) -> Result<Vec<SuggestedAction>, CaseforgeError> {
        let attributes_json = serde_json::to_string_pretty(attributes)
            .unwrap_or_else(|_| "{}".to_string());
        let raw = self
            .provider
            .complete(&prompts::suggest_actions_prompt(content, &attributes_json))
            .await?;
        let normalized = normalize_list(&raw, actions::fallback_suggestions);
        if normalized.is_fallback() {
            warn!("action suggestion response was unparsable, using fallback");
        }
        Ok(parse_suggestions(&normalized.value))
    }

    /// Persist a processed message and its attributes.
    pub async fn persist_message(
        &self,
        storage: &dyn StorageAdapter,
        result: &ProcessedMessage,
        original_content: &str,
        is_bulk: bool,
    ) -> Result<i64, CaseforgeError> {
        let message_id = storage
            .insert_message(&NewMessage {
                message_id: result.message_id.clone(),
                message_type: "MT".to_string(),
                content: original_content.to_string(),
                converted_content: result.converted.as_ref().map(Value::to_string),
                created_at: Utc::now(),
                processed_at: Some(result.processed_at),
                processing_time: Some(result.processing_time),
                is_bulk,
            })
            .await?;

        let attributes: Vec<(String, String)> = result
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), attribute_text(value)))
            .collect();
        if !attributes.is_empty() {
            storage
                .insert_message_attributes(message_id, &attributes)
                .await?;
        }

        Ok(message_id)
    }
}

/// True when the leading segment of the content carries the "199"
/// message sub-type marker.
fn has_mt199_marker(content: &str) -> bool {
    let head: String = content.chars().take(TYPE_MARKER_WINDOW).collect();
    head.contains("199")
}

fn note_from(value: &Value, is_fallback: bool) -> Option<String> {
    if !is_fallback {
        return None;
    }
    value
        .get("notes")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Attribute values are stored as text; strings stay bare, everything else
/// keeps its JSON rendering.
fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::WorkcaseType;
    use caseforge_test_utils::MockProvider;

    const MT199_CONTENT: &str = "{2:I199BANKDEFFXXXX}\n:20:TRN-42\n:79:WHERE ARE MY FUNDS";
    const MT103_CONTENT: &str = "{2:I103BANKDEFFXXXX}\n:20:TRN-7\n:32A:260807USD1000,00";

    fn pipeline_with(responses: Vec<&str>) -> MessagePipeline {
        MessagePipeline::new(Arc::new(MockProvider::with_responses(
            responses.into_iter().map(String::from).collect(),
        )))
    }

    #[tokio::test]
    async fn convert_mode_keeps_strict_payload() {
        let pipeline = pipeline_with(vec![r#"{"camt110": "<Document>...</Document>"}"#]);
        let result = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Convert, Some("MT-1".into()))
            .await
            .unwrap();

        assert_eq!(result.message_id, "MT-1");
        assert!(!result.fallback);
        assert!(result.notes.is_none());
        assert_eq!(result.converted.unwrap()["camt110"], "<Document>...</Document>");
        assert!(result.classification.is_none());
    }

    #[tokio::test]
    async fn convert_mode_falls_back_to_raw_text() {
        let pipeline = pipeline_with(vec!["sorry, I can't produce XML today"]);
        let result = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Convert, Some("MT-2".into()))
            .await
            .unwrap();

        assert!(result.fallback);
        let converted = result.converted.unwrap();
        assert_eq!(converted["mx_message"], "sorry, I can't produce XML today");
        assert!(result.notes.unwrap().contains("raw conversion"));
    }

    #[tokio::test]
    async fn extract_mode_collects_attributes() {
        let pipeline =
            pipeline_with(vec![r#"{"attributes": {"sender": "BANKGB2L", "amount": "1000.00"}}"#]);
        let result = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Extract, Some("MT-3".into()))
            .await
            .unwrap();

        assert_eq!(result.attributes["sender"], "BANKGB2L");
        assert_eq!(result.attributes["amount"], "1000.00");
        assert!(result.converted.is_none());
    }

    #[tokio::test]
    async fn extract_mode_wraps_garbage_as_raw_extraction() {
        let pipeline = pipeline_with(vec!["plain prose, no JSON anywhere"]);
        let result = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Extract, Some("MT-4".into()))
            .await
            .unwrap();

        assert!(result.fallback);
        assert_eq!(
            result.attributes["raw_extraction"],
            "plain prose, no JSON anywhere"
        );
    }

    #[tokio::test]
    async fn mt199_marker_triggers_classification_merge() {
        let pipeline = pipeline_with(vec![
            r#"{"attributes": {"reference": "TRN-42"}}"#,
            r#"{"workcase_type": "NON_RECEIPT", "reasoning": "beneficiary claims non-receipt",
                "extracted_fields": {"reference": "TRN-42"},
                "next_steps": ["trace the payment"]}"#,
        ]);
        let result = pipeline
            .process_single(MT199_CONTENT, ProcessingMode::Extract, Some("MT-5".into()))
            .await
            .unwrap();

        let classification = result.classification.unwrap();
        assert_eq!(classification.workcase_type, WorkcaseType::NonReceipt);
        // Classification fields merged over the extraction attributes.
        assert_eq!(result.attributes["workcase_type"], "NON_RECEIPT");
        assert_eq!(result.attributes["reference"], "TRN-42");
        assert!(result.attributes.contains_key("sla"));
    }

    #[tokio::test]
    async fn non_mt199_skips_classification() {
        let pipeline = pipeline_with(vec![r#"{"attributes": {}}"#]);
        let result = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Extract, Some("MT-6".into()))
            .await
            .unwrap();
        assert!(result.classification.is_none());
        assert!(!result.attributes.contains_key("workcase_type"));
    }

    #[tokio::test]
    async fn message_id_is_stamped_when_absent() {
        let pipeline = pipeline_with(vec![r#"{"attributes": {}}"#]);
        let result = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Extract, None)
            .await
            .unwrap();
        assert!(result.message_id.starts_with("MT-"), "{}", result.message_id);
        assert!(result.processing_time >= 0.0);
    }

    #[tokio::test]
    async fn provider_failure_propagates_untouched() {
        let provider = MockProvider::new();
        provider.push_failure("model unavailable").await;
        let pipeline = MessagePipeline::new(Arc::new(provider));

        let err = pipeline
            .process_single(MT103_CONTENT, ProcessingMode::Extract, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaseforgeError::Generation { .. }));
    }

    #[tokio::test]
    async fn classify_fills_policy_for_sparse_output() {
        let pipeline = pipeline_with(vec![
            r#"{"workcase_type": "CANCELLATION", "reasoning": "explicit cancellation request"}"#,
        ]);
        let classification = pipeline.classify_stp_failure(MT199_CONTENT).await.unwrap();
        assert_eq!(classification.workcase_type, WorkcaseType::Cancellation);
        assert_eq!(classification.sla.acknowledgment, 4);
        assert_eq!(classification.regulations.len(), 2);
        assert!(classification.response_template.contains("Cancellation"));
    }

    #[tokio::test]
    async fn classify_garbage_degrades_to_unknown() {
        let pipeline = pipeline_with(vec!["I have no idea what this message means."]);
        let classification = pipeline.classify_stp_failure(MT199_CONTENT).await.unwrap();
        assert_eq!(classification.workcase_type, WorkcaseType::Unknown);
        assert_eq!(classification.next_steps.len(), 3);
        assert_eq!(classification.timeline[0].action, "Initial review");
    }

    #[tokio::test]
    async fn suggest_actions_parses_list_output() {
        let pipeline = pipeline_with(vec![
            r#"[{"type": "cancellation", "description": "halt the payment", "priority": "high", "suggested_days": 1}]"#,
        ]);
        let suggestions = pipeline
            .suggest_actions(MT199_CONTENT, &Map::new())
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action_type, "cancellation");
        assert_eq!(suggestions[0].suggested_days, 1);
    }

    #[tokio::test]
    async fn suggest_actions_coerces_lone_object() {
        let pipeline = pipeline_with(vec![
            r#"{"type": "other", "description": "review manually"}"#,
        ]);
        let suggestions = pipeline
            .suggest_actions(MT199_CONTENT, &Map::new())
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action_type, "other");
    }

    #[tokio::test]
    async fn suggest_actions_garbage_yields_canned_action() {
        let pipeline = pipeline_with(vec!["no structure at all"]);
        let suggestions = pipeline
            .suggest_actions(MT199_CONTENT, &Map::new())
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action_type, "information_request");
    }

    #[tokio::test]
    async fn bulk_isolates_per_row_failures() {
        let provider = MockProvider::new();
        provider.push_response(r#"{"attributes": {"row": "1"}}"#).await;
        provider.push_failure("provider exploded").await;
        provider.push_response(r#"{"attributes": {"row": "3"}}"#).await;
        let pipeline = MessagePipeline::new(Arc::new(provider));

        let rows = vec![
            BulkRow { message_id: "MT-B1".into(), message: MT103_CONTENT.into() },
            BulkRow { message_id: "MT-B2".into(), message: MT103_CONTENT.into() },
            BulkRow { message_id: "MT-B3".into(), message: MT103_CONTENT.into() },
        ];
        let outcomes = pipeline.process_bulk(&rows, ProcessingMode::Extract).await;

        assert_eq!(outcomes.len(), 3);
        assert!(!outcomes[0].is_error());
        assert!(outcomes[1].is_error());
        assert!(outcomes[1].error.as_deref().unwrap().contains("provider exploded"));
        assert!(!outcomes[2].is_error());
        assert_eq!(outcomes[2].message_id, "MT-B3");
    }
}
