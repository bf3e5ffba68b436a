// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed STP-failure case classification built from normalized generative
//! output.
//!
//! The model's JSON is duck-typed: every field is pulled leniently, and the
//! policy tables fill whatever the model omitted. Nothing here errors on a
//! malformed value -- the worst input degrades to an `UNKNOWN`
//! classification with usable defaults.

use caseforge_core::WorkcaseType;
use caseforge_policy::{regulations_for, render_response, sla_for, Regulation, SlaSchedule};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One step in the suggested resolution timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: String,
    pub action: String,
    pub status: String,
}

/// Full classification of a failed-STP case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseClassification {
    pub workcase_type: WorkcaseType,
    pub reasoning: String,
    pub extracted_fields: Map<String, Value>,
    pub next_steps: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub regulations: Vec<Regulation>,
    pub sla: SlaSchedule,
    pub response_template: String,
}

impl CaseClassification {
    /// Build a classification from a normalized JSON object.
    ///
    /// `regulations`, `sla`, and `response_template` come from the policy
    /// tables whenever the model's output lacks them or they fail to parse.
    pub fn from_value(value: &Value) -> Self {
        let workcase_type = value
            .get("workcase_type")
            .and_then(Value::as_str)
            .map(WorkcaseType::parse_lenient)
            .unwrap_or_default();

        let reasoning = value
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let extracted_fields = value
            .get("extracted_fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let next_steps = value
            .get("next_steps")
            .and_then(Value::as_array)
            .map(|steps| {
                steps
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let timeline = value
            .get("timeline")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let regulations = value
            .get("regulations")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_else(|| regulations_for(workcase_type));

        let sla = value
            .get("sla")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_else(|| sla_for(workcase_type));

        let response_template = value
            .get("response_template")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| render_response(workcase_type, &extracted_fields));

        Self {
            workcase_type,
            reasoning,
            extracted_fields,
            next_steps,
            timeline,
            regulations,
            sla,
            response_template,
        }
    }

    /// Flatten the classification into message attributes for merging into
    /// a pipeline result.
    pub fn to_attribute_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Default classification payload used when the model's response is beyond
/// recovery.
pub fn fallback_classification() -> Value {
    json!({
        "workcase_type": "UNKNOWN",
        "reasoning": "Could not determine workcase type from message analysis",
        "extracted_fields": {},
        "next_steps": [
            "Review the message manually",
            "Consult with an investigation specialist",
            "Contact the sender for clarification"
        ],
        "timeline": [
            {
                "date": Utc::now().format("%Y-%m-%d").to_string(),
                "action": "Initial review",
                "status": "open"
            }
        ]
    })
}
