// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends.

use async_trait::async_trait;

use crate::error::CaseforgeError;
use crate::types::{
    ActionCounts, Investigation, InvestigationAction, InvestigationFilter, InvestigationPage,
    MessageAttribute, NewAction, NewInvestigation, NewMessage, StoredMessage,
};

/// Adapter for the persistence backend.
///
/// Every call is atomic. Absent rows come back as `Ok(None)` so callers can
/// distinguish "does not exist" from a transport failure
/// ([`CaseforgeError::Storage`]). Inserting an investigation whose reference
/// number already exists fails with [`CaseforgeError::Conflict`], which
/// drives the caller's regenerate-and-retry loop.
#[async_trait]
pub trait StorageAdapter: Send + Sync + 'static {
    /// Initializes the backend (migrations, connection, pragmas).
    async fn initialize(&self) -> Result<(), CaseforgeError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), CaseforgeError>;

    // --- Message operations ---

    async fn insert_message(&self, message: &NewMessage) -> Result<i64, CaseforgeError>;

    async fn insert_message_attributes(
        &self,
        message_id: i64,
        attributes: &[(String, String)],
    ) -> Result<(), CaseforgeError>;

    async fn find_message(&self, id: i64) -> Result<Option<StoredMessage>, CaseforgeError>;

    async fn message_attributes(
        &self,
        message_id: i64,
    ) -> Result<Vec<MessageAttribute>, CaseforgeError>;

    // --- Investigation operations ---

    async fn insert_investigation(
        &self,
        investigation: &NewInvestigation,
    ) -> Result<i64, CaseforgeError>;

    async fn find_investigation(
        &self,
        id: i64,
    ) -> Result<Option<Investigation>, CaseforgeError>;

    async fn find_investigation_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<Option<Investigation>, CaseforgeError>;

    /// Full-row update keyed on `investigation.id`.
    async fn update_investigation(
        &self,
        investigation: &Investigation,
    ) -> Result<(), CaseforgeError>;

    /// Deletes an investigation; its actions go with it (FK cascade).
    async fn delete_investigation(&self, id: i64) -> Result<(), CaseforgeError>;

    /// Filtered listing sorted by `updated_at` descending, with the
    /// pre-pagination total.
    async fn list_investigations(
        &self,
        filter: &InvestigationFilter,
    ) -> Result<InvestigationPage, CaseforgeError>;

    async fn count_investigations_by_status(
        &self,
    ) -> Result<Vec<(String, i64)>, CaseforgeError>;

    async fn count_investigations_by_priority(
        &self,
    ) -> Result<Vec<(String, i64)>, CaseforgeError>;

    /// Average hours from `created_at` to `resolved_at` over resolved/closed
    /// investigations with a resolution timestamp; 0.0 when there are none.
    async fn avg_resolution_hours(&self) -> Result<f64, CaseforgeError>;

    // --- Action operations ---

    async fn insert_action(&self, action: &NewAction) -> Result<i64, CaseforgeError>;

    async fn find_action(
        &self,
        id: i64,
    ) -> Result<Option<InvestigationAction>, CaseforgeError>;

    /// Full-row update keyed on `action.id`.
    async fn update_action(&self, action: &InvestigationAction) -> Result<(), CaseforgeError>;

    /// Actions for an investigation, ordered by creation time ascending.
    async fn actions_for_investigation(
        &self,
        investigation_id: i64,
    ) -> Result<Vec<InvestigationAction>, CaseforgeError>;

    async fn action_counts(
        &self,
        investigation_id: i64,
    ) -> Result<ActionCounts, CaseforgeError>;

    async fn count_actions_by_type(&self) -> Result<Vec<(String, i64)>, CaseforgeError>;
}
