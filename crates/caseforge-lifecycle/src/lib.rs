// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Investigation case lifecycle service.
//!
//! Owns the case/action state machines: a case opens against a stored
//! message, collects remediation actions, and derives its status from
//! action completion. Status only moves forward -- `resolved` never demotes
//! and `closed` is terminal.
//!
//! Classification runs BEFORE anything is persisted, so a generative
//! failure during case creation leaves no partial state behind.

pub mod analytics;
pub mod detail;
pub mod listing;
pub mod notification;
pub mod refnum;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use caseforge_config::InvestigationConfig;
use caseforge_core::{
    ActionStatus, CaseforgeError, CaseStatus, Investigation, InvestigationAction, NewAction,
    NewInvestigation, Priority, StorageAdapter,
};
use caseforge_pipeline::MessagePipeline;

pub use analytics::AnalyticsReport;
pub use detail::{InvestigationDetail, MessageDetail};
pub use listing::{InvestigationListPage, InvestigationSummary};
pub use notification::CustomerNotification;

/// The case lifecycle service.
pub struct InvestigationService {
    storage: Arc<dyn StorageAdapter>,
    pipeline: MessagePipeline,
    defaults: InvestigationConfig,
}

impl InvestigationService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        pipeline: MessagePipeline,
        defaults: InvestigationConfig,
    ) -> Self {
        Self {
            storage,
            pipeline,
            defaults,
        }
    }

    pub(crate) fn storage(&self) -> &dyn StorageAdapter {
        self.storage.as_ref()
    }

    pub(crate) fn pipeline(&self) -> &MessagePipeline {
        &self.pipeline
    }

    /// Open a new investigation for a stored message.
    ///
    /// The classifier runs first: its suggested actions become the case's
    /// initial pending actions, and its failure aborts the call before any
    /// row is written. The reference number is regenerated on a storage
    /// collision, bounded by the configured retry limit.
    pub async fn create_investigation(
        &self,
        message_id: i64,
        priority: Priority,
        customer_info: Option<Value>,
    ) -> Result<Investigation, CaseforgeError> {
        let message = self
            .storage
            .find_message(message_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("message", message_id))?;

        let attributes: Map<String, Value> = self
            .storage
            .message_attributes(message_id)
            .await?
            .into_iter()
            .map(|attr| (attr.key, Value::String(attr.value)))
            .collect();

        // Suspending external call; nothing is persisted if it fails.
        let suggestions = self
            .pipeline
            .suggest_actions(&message.content, &attributes)
            .await?;

        let now = Utc::now();
        let mut investigation_id = None;
        for attempt in 0..self.defaults.reference_retry_limit {
            let reference_number = refnum::generate_reference_number(now);
            match self
                .storage
                .insert_investigation(&NewInvestigation {
                    reference_number: reference_number.clone(),
                    message_id,
                    status: CaseStatus::Open,
                    priority,
                    customer_info: customer_info.clone(),
                    created_at: now,
                    updated_at: now,
                })
                .await
            {
                Ok(id) => {
                    info!(%reference_number, investigation_id = id, "investigation created");
                    investigation_id = Some(id);
                    break;
                }
                Err(CaseforgeError::Conflict(_)) => {
                    warn!(%reference_number, attempt, "reference collision, regenerating");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
        let investigation_id = investigation_id.ok_or_else(|| {
            CaseforgeError::Conflict(format!(
                "could not allocate a unique reference number after {} attempts",
                self.defaults.reference_retry_limit
            ))
        })?;

        for suggestion in &suggestions {
            self.storage
                .insert_action(&NewAction {
                    investigation_id,
                    action_type: suggestion.action_type.clone(),
                    description: suggestion.description.clone(),
                    suggested_response: suggestion.suggested_response.clone(),
                    status: ActionStatus::Pending,
                    priority: suggestion.priority,
                    deadline: now + Duration::days(suggestion.suggested_days),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        debug!(investigation_id, actions = suggestions.len(), "initial actions created");

        self.storage
            .find_investigation(investigation_id)
            .await?
            .ok_or_else(|| CaseforgeError::Internal("investigation missing after insert".into()))
    }

    /// Add a remediation action to an existing investigation.
    ///
    /// The first action always advances an `open` case to `in_progress`.
    /// A `resolved` case may still receive actions; its status is never
    /// demoted.
    pub async fn add_action(
        &self,
        investigation_id: i64,
        action_type: &str,
        description: &str,
        suggested_response: Option<String>,
        priority: Priority,
        deadline_days: Option<i64>,
    ) -> Result<InvestigationAction, CaseforgeError> {
        let mut investigation = self
            .storage
            .find_investigation(investigation_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("investigation", investigation_id))?;

        let now = Utc::now();
        let deadline_days = deadline_days.unwrap_or(self.defaults.default_deadline_days);
        let action_id = self
            .storage
            .insert_action(&NewAction {
                investigation_id,
                action_type: action_type.to_string(),
                description: description.to_string(),
                suggested_response,
                status: ActionStatus::Pending,
                priority,
                deadline: now + Duration::days(deadline_days),
                created_at: now,
                updated_at: now,
            })
            .await?;

        if investigation.status == CaseStatus::Open {
            investigation.status = CaseStatus::InProgress;
            investigation.updated_at = now;
            self.storage.update_investigation(&investigation).await?;
            debug!(investigation_id, "first action moved case to in_progress");
        }

        self.storage
            .find_action(action_id)
            .await?
            .ok_or_else(|| CaseforgeError::Internal("action missing after insert".into()))
    }

    /// Update an action's status and re-evaluate case completion.
    ///
    /// `completed_at` is stamped when the new status is `completed` and is
    /// never cleared. When every action of the owning case is completed
    /// (and there is at least one), the case transitions to `resolved`;
    /// `resolved_at` is set on the first transition only.
    pub async fn update_action_status(
        &self,
        action_id: i64,
        new_status: ActionStatus,
        notes: Option<String>,
    ) -> Result<InvestigationAction, CaseforgeError> {
        let mut action = self
            .storage
            .find_action(action_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("action", action_id))?;

        let now = Utc::now();
        action.status = new_status;
        action.notes = notes;
        action.updated_at = now;
        if new_status == ActionStatus::Completed {
            action.completed_at = Some(now);
        }
        self.storage.update_action(&action).await?;

        self.check_completion(action.investigation_id).await?;

        self.storage
            .find_action(action_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("action", action_id))
    }

    /// Derive case status from action completion.
    ///
    /// A case with at least one action, all completed, becomes `resolved`.
    /// `closed` stays closed and a case with zero actions never
    /// auto-resolves.
    async fn check_completion(&self, investigation_id: i64) -> Result<(), CaseforgeError> {
        let Some(mut investigation) =
            self.storage.find_investigation(investigation_id).await?
        else {
            return Ok(());
        };

        match investigation.status {
            CaseStatus::Closed => return Ok(()),
            CaseStatus::Open | CaseStatus::InProgress | CaseStatus::Resolved => {}
        }

        let actions = self
            .storage
            .actions_for_investigation(investigation_id)
            .await?;
        let all_completed = !actions.is_empty()
            && actions
                .iter()
                .all(|action| action.status == ActionStatus::Completed);
        if !all_completed {
            return Ok(());
        }

        let now = Utc::now();
        let newly_resolved = investigation.status != CaseStatus::Resolved;
        investigation.status = CaseStatus::Resolved;
        if investigation.resolved_at.is_none() {
            investigation.resolved_at = Some(now);
        }
        investigation.updated_at = now;
        self.storage.update_investigation(&investigation).await?;
        if newly_resolved {
            info!(investigation_id, "all actions completed, case resolved");
        }
        Ok(())
    }

    /// Explicitly resolve a case.
    ///
    /// `closed` is sticky: resolving a closed case leaves it closed. Notes
    /// are always overwritten; `resolved_at` is set only when previously
    /// unset.
    pub async fn resolve_investigation(
        &self,
        investigation_id: i64,
        resolution_notes: &str,
    ) -> Result<Investigation, CaseforgeError> {
        let mut investigation = self
            .storage
            .find_investigation(investigation_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("investigation", investigation_id))?;

        let now = Utc::now();
        if investigation.status != CaseStatus::Closed {
            investigation.status = CaseStatus::Resolved;
        }
        investigation.resolution_notes = Some(resolution_notes.to_string());
        if investigation.resolved_at.is_none() {
            investigation.resolved_at = Some(now);
        }
        investigation.updated_at = now;
        self.storage.update_investigation(&investigation).await?;
        Ok(investigation)
    }

    /// Close a case. Terminal: no transition leaves `closed`.
    pub async fn close_investigation(
        &self,
        investigation_id: i64,
    ) -> Result<Investigation, CaseforgeError> {
        let mut investigation = self
            .storage
            .find_investigation(investigation_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("investigation", investigation_id))?;

        investigation.status = CaseStatus::Closed;
        investigation.updated_at = Utc::now();
        self.storage.update_investigation(&investigation).await?;
        info!(investigation_id, "investigation closed");
        Ok(investigation)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use caseforge_config::{InvestigationConfig, StorageConfig};
    use caseforge_core::{NewMessage, StorageAdapter};
    use caseforge_pipeline::MessagePipeline;
    use caseforge_storage::SqliteStorage;
    use caseforge_test_utils::MockProvider;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::InvestigationService;

    pub(crate) const SUGGESTION_JSON: &str = r#"[
        {"type": "information_request", "description": "trace the payment",
         "suggested_response": "Please confirm credit of TRN-1.",
         "priority": "high", "suggested_days": 2}
    ]"#;

    pub(crate) struct Harness {
        pub service: InvestigationService,
        pub storage: Arc<SqliteStorage>,
        pub provider: Arc<MockProvider>,
        _dir: TempDir,
    }

    pub(crate) async fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: true,
        }));
        storage.initialize().await.unwrap();

        let provider = Arc::new(MockProvider::new());
        let pipeline = MessagePipeline::new(provider.clone());
        let service = InvestigationService::new(
            storage.clone(),
            pipeline,
            InvestigationConfig::default(),
        );
        Harness {
            service,
            storage,
            provider,
            _dir: dir,
        }
    }

    pub(crate) async fn seed_message(storage: &SqliteStorage, content: &str) -> i64 {
        storage
            .insert_message(&NewMessage {
                message_id: "MT-SEED".to_string(),
                message_type: "MT".to_string(),
                content: content.to_string(),
                converted_content: None,
                created_at: Utc::now(),
                processed_at: None,
                processing_time: None,
                is_bulk: false,
            })
            .await
            .unwrap()
    }
}
