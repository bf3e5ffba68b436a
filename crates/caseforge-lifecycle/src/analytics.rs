// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate reporting over the case book.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use caseforge_core::{CaseforgeError, CaseStatus, Priority};

use crate::InvestigationService;

/// Snapshot of case-book health.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    /// Case counts per status; every status is present, zero-filled.
    pub status_counts: BTreeMap<String, i64>,
    /// Case counts per priority; every priority is present, zero-filled.
    pub priority_counts: BTreeMap<String, i64>,
    /// Average hours from creation to resolution over resolved/closed cases
    /// with a resolution timestamp; 0.0 when there are none.
    pub avg_resolution_hours: f64,
    pub total_investigations: i64,
    /// Action counts grouped by type label.
    pub action_type_counts: BTreeMap<String, i64>,
    pub updated_at: DateTime<Utc>,
}

const ALL_STATUSES: [CaseStatus; 4] = [
    CaseStatus::Open,
    CaseStatus::InProgress,
    CaseStatus::Resolved,
    CaseStatus::Closed,
];

const ALL_PRIORITIES: [Priority; 4] = [
    Priority::Low,
    Priority::Medium,
    Priority::High,
    Priority::Critical,
];

impl InvestigationService {
    /// Compute the analytics snapshot.
    pub async fn get_analytics(&self) -> Result<AnalyticsReport, CaseforgeError> {
        let mut status_counts: BTreeMap<String, i64> = ALL_STATUSES
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for (label, count) in self.storage().count_investigations_by_status().await? {
            status_counts.insert(label, count);
        }

        let mut priority_counts: BTreeMap<String, i64> = ALL_PRIORITIES
            .iter()
            .map(|priority| (priority.to_string(), 0))
            .collect();
        for (label, count) in self.storage().count_investigations_by_priority().await? {
            priority_counts.insert(label, count);
        }

        let action_type_counts = self
            .storage()
            .count_actions_by_type()
            .await?
            .into_iter()
            .collect();

        let total_investigations = status_counts.values().sum();

        Ok(AnalyticsReport {
            status_counts,
            priority_counts,
            avg_resolution_hours: self.storage().avg_resolution_hours().await?,
            total_investigations,
            action_type_counts,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{harness, seed_message, SUGGESTION_JSON};
    use caseforge_core::{ActionStatus, Priority, StorageAdapter};

    const MT199: &str = "{2:I199BANKDEFFXXXX}\n:20:TRN-1";

    #[tokio::test]
    async fn empty_book_reports_zeroes() {
        let h = harness().await;
        let report = h.service.get_analytics().await.unwrap();
        assert_eq!(report.total_investigations, 0);
        assert_eq!(report.status_counts["open"], 0);
        assert_eq!(report.status_counts.len(), 4);
        assert_eq!(report.priority_counts.len(), 4);
        assert!((report.avg_resolution_hours - 0.0).abs() < f64::EPSILON);
        assert!(report.action_type_counts.is_empty());
    }

    #[tokio::test]
    async fn counts_follow_the_lifecycle() {
        let h = harness().await;
        let message_id = seed_message(&h.storage, MT199).await;

        h.provider.push_response(SUGGESTION_JSON).await;
        let resolved_case = h
            .service
            .create_investigation(message_id, Priority::High, None)
            .await
            .unwrap();
        h.provider.push_response(SUGGESTION_JSON).await;
        h.service
            .create_investigation(message_id, Priority::Medium, None)
            .await
            .unwrap();

        let actions = h
            .storage
            .actions_for_investigation(resolved_case.id)
            .await
            .unwrap();
        h.service
            .update_action_status(actions[0].id, ActionStatus::Completed, None)
            .await
            .unwrap();

        let report = h.service.get_analytics().await.unwrap();
        assert_eq!(report.total_investigations, 2);
        assert_eq!(report.status_counts["resolved"], 1);
        assert_eq!(report.status_counts["open"], 1);
        assert_eq!(report.priority_counts["high"], 1);
        assert_eq!(report.priority_counts["medium"], 1);
        assert_eq!(report.action_type_counts["information_request"], 2);
        assert!(report.avg_resolution_hours >= 0.0);
    }
}
