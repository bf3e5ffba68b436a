// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginated investigation listings with per-case action summaries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use caseforge_core::{
    ActionCounts, CaseforgeError, CaseStatus, InvestigationFilter, Priority,
};

use crate::InvestigationService;

/// One row of a case listing.
#[derive(Debug, Clone, Serialize)]
pub struct InvestigationSummary {
    pub id: i64,
    pub reference_number: String,
    pub status: CaseStatus,
    pub priority: Priority,
    /// External label of the source message, when it still resolves.
    pub message_id: Option<String>,
    /// Customer name from the stored customer info; "N/A" when absent.
    pub customer_name: String,
    pub action_counts: ActionCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whole days since the case was opened.
    pub days_open: i64,
}

/// One page of summaries plus the pre-pagination total.
#[derive(Debug, Clone, Serialize)]
pub struct InvestigationListPage {
    pub total: i64,
    pub investigations: Vec<InvestigationSummary>,
    pub limit: i64,
    pub offset: i64,
}

impl InvestigationService {
    /// List investigations sorted by `updated_at` descending.
    pub async fn list_investigations(
        &self,
        status: Option<CaseStatus>,
        priority: Option<Priority>,
        limit: i64,
        offset: i64,
    ) -> Result<InvestigationListPage, CaseforgeError> {
        let page = self
            .storage()
            .list_investigations(&InvestigationFilter {
                status,
                priority,
                limit,
                offset,
            })
            .await?;

        let now = Utc::now();
        let mut investigations = Vec::with_capacity(page.items.len());
        for investigation in page.items {
            let message_id = self
                .storage()
                .find_message(investigation.message_id)
                .await?
                .map(|message| message.message_id);
            let action_counts = self.storage().action_counts(investigation.id).await?;
            let customer_name = investigation
                .customer_info
                .as_ref()
                .and_then(|info| info.get("name"))
                .and_then(|name| name.as_str())
                .unwrap_or("N/A")
                .to_string();

            investigations.push(InvestigationSummary {
                id: investigation.id,
                reference_number: investigation.reference_number,
                status: investigation.status,
                priority: investigation.priority,
                message_id,
                customer_name,
                action_counts,
                created_at: investigation.created_at,
                updated_at: investigation.updated_at,
                days_open: (now - investigation.created_at).num_days(),
            });
        }

        Ok(InvestigationListPage {
            total: page.total,
            investigations,
            limit,
            offset,
        })
    }
}
