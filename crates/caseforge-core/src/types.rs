// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Caseforge workspace.
//!
//! Status, priority, and workcase-type values are closed enums with
//! exhaustive matching at every transition site; the string forms only
//! appear at the serialization boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Lifecycle status of an investigation.
///
/// `open -> in_progress` on the first action, `-> resolved` on full action
/// completion or an explicit resolve, `-> closed` terminally. `closed` has
/// no outgoing transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// Lifecycle status of a single remediation action.
///
/// `completed` and `cancelled` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Priority level shared by investigations and actions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Classification label describing the nature of the failure under
/// investigation.
///
/// `Unknown` is the safe default for unrecognized or absent labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkcaseType {
    NonReceipt,
    Cancellation,
    ReturnFunds,
    WrongAmount,
    DuplicatePayment,
    WrongBeneficiary,
    RegulatoryCompliance,
    TechnicalIssue,
    Query,
    Unknown,
}

impl WorkcaseType {
    /// Parse a label from generative output, degrading to [`Self::Unknown`]
    /// rather than erroring on anything unrecognized.
    pub fn parse_lenient(label: &str) -> Self {
        label.trim().parse().unwrap_or(Self::Unknown)
    }
}

impl Default for WorkcaseType {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Processing mode for the message pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Convert the message to the ISO 20022 target format.
    Convert,
    /// Extract a key/value attribute map from the message.
    Extract,
}

// --- Persisted entities ---

/// A stored financial message. Read-only input to the core once an
/// investigation references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    /// External message label (e.g. "MT-1712000000").
    pub message_id: String,
    /// Wire family of the source message ("MT" or "MX").
    pub message_type: String,
    pub content: String,
    pub converted_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    /// Pipeline processing duration in seconds.
    pub processing_time: Option<f64>,
    pub is_bulk: bool,
}

/// Insert payload for a message row.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub message_id: String,
    pub message_type: String,
    pub content: String,
    pub converted_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processing_time: Option<f64>,
    pub is_bulk: bool,
}

/// A key/value attribute extracted from a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAttribute {
    pub id: i64,
    pub message_id: i64,
    pub key: String,
    pub value: String,
}

/// An investigation case opened against a source message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigation {
    pub id: i64,
    /// Unique `INV-YYYYMMDD-XXXX` reference, assigned exactly once at
    /// creation and never regenerated.
    pub reference_number: String,
    pub message_id: i64,
    pub status: CaseStatus,
    pub priority: Priority,
    /// Arbitrary structured customer information.
    pub customer_info: Option<Value>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set on the first transition to `resolved`; never overwritten.
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Insert payload for an investigation row.
#[derive(Debug, Clone)]
pub struct NewInvestigation {
    pub reference_number: String,
    pub message_id: i64,
    pub status: CaseStatus,
    pub priority: Priority,
    pub customer_info: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A discrete remediation step tracked to completion within an
/// investigation. Always belongs to exactly one investigation; deleting the
/// investigation deletes its actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationAction {
    pub id: i64,
    pub investigation_id: i64,
    /// Free-form category label (information_request, amendment_request,
    /// customer_notification, cancellation, other, ...).
    pub action_type: String,
    pub description: String,
    pub suggested_response: Option<String>,
    pub status: ActionStatus,
    pub priority: Priority,
    pub notes: Option<String>,
    /// Absolute deadline timestamp, not a duration.
    pub deadline: DateTime<Utc>,
    /// Set exactly when status transitions to `completed`; never cleared.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for an action row.
#[derive(Debug, Clone)]
pub struct NewAction {
    pub investigation_id: i64,
    pub action_type: String,
    pub description: String,
    pub suggested_response: Option<String>,
    pub status: ActionStatus,
    pub priority: Priority,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Query shapes ---

/// Filter and pagination for investigation listings.
#[derive(Debug, Clone, Default)]
pub struct InvestigationFilter {
    pub status: Option<CaseStatus>,
    pub priority: Option<Priority>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of investigations plus the pre-pagination total.
#[derive(Debug, Clone)]
pub struct InvestigationPage {
    pub total: i64,
    pub items: Vec<Investigation>,
}

/// Per-investigation action status summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionCounts {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn case_status_round_trips_snake_case() {
        for status in [
            CaseStatus::Open,
            CaseStatus::InProgress,
            CaseStatus::Resolved,
            CaseStatus::Closed,
        ] {
            let s = status.to_string();
            assert_eq!(CaseStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(CaseStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn workcase_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&WorkcaseType::ReturnFunds).unwrap();
        assert_eq!(json, "\"RETURN_FUNDS\"");
        let parsed: WorkcaseType = serde_json::from_str("\"NON_RECEIPT\"").unwrap();
        assert_eq!(parsed, WorkcaseType::NonReceipt);
    }

    #[test]
    fn workcase_type_lenient_parse_defaults_to_unknown() {
        assert_eq!(
            WorkcaseType::parse_lenient("CANCELLATION"),
            WorkcaseType::Cancellation
        );
        assert_eq!(
            WorkcaseType::parse_lenient("  REGULATORY_COMPLIANCE "),
            WorkcaseType::RegulatoryCompliance
        );
        assert_eq!(
            WorkcaseType::parse_lenient("something else"),
            WorkcaseType::Unknown
        );
        assert_eq!(WorkcaseType::parse_lenient(""), WorkcaseType::Unknown);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn action_status_parses_from_cli_labels() {
        assert_eq!(
            ActionStatus::from_str("completed").unwrap(),
            ActionStatus::Completed
        );
        assert!(ActionStatus::from_str("done").is_err());
    }
}
