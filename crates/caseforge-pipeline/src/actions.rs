// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggested investigation actions parsed from normalized generative
//! output.

use caseforge_core::Priority;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One action the classifier proposes for a freshly opened case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Category label (information_request, amendment_request,
    /// customer_notification, cancellation, other).
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
    #[serde(default)]
    pub suggested_response: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Days until the action's deadline.
    #[serde(default = "default_suggested_days")]
    pub suggested_days: i64,
}

fn default_suggested_days() -> i64 {
    3
}

/// Parse suggestions out of a normalized JSON array.
///
/// Entries missing the required `type`/`description` fields are dropped;
/// if nothing survives, the canned fallback suggestion is used so a new
/// case always starts with at least one action.
pub fn parse_suggestions(value: &Value) -> Vec<SuggestedAction> {
    let parsed: Vec<SuggestedAction> = value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    if parsed.is_empty() {
        parse_fallback()
    } else {
        parsed
    }
}

/// Default suggestion payload used when the model's response is beyond
/// recovery.
pub fn fallback_suggestions() -> Value {
    json!([
        {
            "type": "information_request",
            "description": "Analyze the message and determine next steps",
            "suggested_response": "Based on our initial analysis, we need to investigate further.",
            "priority": "medium",
            "suggested_days": 3
        }
    ])
}

fn parse_fallback() -> Vec<SuggestedAction> {
    serde_json::from_value(fallback_suggestions())
        .expect("fallback suggestion payload is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_suggestions_parse_in_order() {
        let value = json!([
            {
                "type": "cancellation",
                "description": "halt the payment",
                "priority": "critical",
                "suggested_days": 1
            },
            {
                "type": "customer_notification",
                "description": "inform the ordering customer",
                "suggested_response": "We are processing your cancellation."
            }
        ]);
        let suggestions = parse_suggestions(&value);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].action_type, "cancellation");
        assert_eq!(suggestions[0].priority, Priority::Critical);
        assert_eq!(suggestions[0].suggested_days, 1);
        // Omitted fields take defaults.
        assert_eq!(suggestions[1].priority, Priority::Medium);
        assert_eq!(suggestions[1].suggested_days, 3);
    }

    #[test]
    fn entries_without_required_fields_are_dropped() {
        let value = json!([
            {"priority": "high"},
            {"type": "other", "description": "review manually"}
        ]);
        let suggestions = parse_suggestions(&value);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action_type, "other");
    }

    #[test]
    fn nothing_parsable_yields_the_canned_action() {
        let suggestions = parse_suggestions(&json!([{"bogus": true}]));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action_type, "information_request");
        assert_eq!(suggestions[0].suggested_days, 3);
    }

    #[test]
    fn non_array_value_yields_the_canned_action() {
        let suggestions = parse_suggestions(&json!("not an array"));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action_type, "information_request");
    }

    #[test]
    fn bad_priority_label_drops_the_entry() {
        let value = json!([
            {"type": "other", "description": "x", "priority": "urgent"}
        ]);
        // "urgent" is not a Priority; strict enum parsing rejects the entry
        // and the fallback takes over.
        let suggestions = parse_suggestions(&value);
        assert_eq!(suggestions[0].action_type, "information_request");
    }
}
