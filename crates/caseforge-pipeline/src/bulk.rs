// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bulk CSV ingestion: the single-message path applied row by row.
//!
//! A failing row is captured as an inline error entry and never aborts the
//! remaining rows.

use caseforge_core::{CaseforgeError, ProcessingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{MessagePipeline, ProcessedMessage};

/// Columns every bulk file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &["messageId", "message"];

/// One row of tabular bulk input.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRow {
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub message: String,
}

/// Per-row outcome: either a processed message or an inline error entry.
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessedMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl BulkOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Parse bulk CSV input into rows, validating the required columns.
///
/// Fails with a validation error naming the required columns when a header
/// is missing, or when a row cannot be deserialized.
pub fn read_bulk_rows<R: std::io::Read>(reader: R) -> Result<Vec<BulkRow>, CaseforgeError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| CaseforgeError::Validation(format!("could not read CSV headers: {e}")))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .collect();
    if !missing.is_empty() {
        return Err(CaseforgeError::Validation(format!(
            "the file must contain columns: {}",
            REQUIRED_COLUMNS.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: BulkRow = record
            .map_err(|e| CaseforgeError::Validation(format!("malformed CSV row: {e}")))?;
        rows.push(row);
    }
    Ok(rows)
}

impl MessagePipeline {
    /// Process bulk rows sequentially with per-row failure isolation.
    ///
    /// The output always has one entry per input row, in input order.
    pub async fn process_bulk(
        &self,
        rows: &[BulkRow],
        mode: ProcessingMode,
    ) -> Vec<BulkOutcome> {
        let mut outcomes = Vec::with_capacity(rows.len());

        for row in rows {
            match self
                .process_single(&row.message, mode, Some(row.message_id.clone()))
                .await
            {
                Ok(result) => outcomes.push(BulkOutcome {
                    message_id: row.message_id.clone(),
                    result: Some(result),
                    error: None,
                    processed_at: Utc::now(),
                }),
                Err(err) => {
                    warn!(message_id = %row.message_id, error = %err, "bulk row failed");
                    outcomes.push(BulkOutcome {
                        message_id: row.message_id.clone(),
                        result: None,
                        error: Some(err.to_string()),
                        processed_at: Utc::now(),
                    });
                }
            }
        }

        outcomes
    }
}
