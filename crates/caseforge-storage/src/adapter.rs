// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use caseforge_config::StorageConfig;
use caseforge_core::{
    ActionCounts, CaseforgeError, Investigation, InvestigationAction, InvestigationFilter,
    InvestigationPage, MessageAttribute, NewAction, NewInvestigation, NewMessage, StorageAdapter,
    StoredMessage,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, CaseforgeError> {
        self.db.get().ok_or_else(|| CaseforgeError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), CaseforgeError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| CaseforgeError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CaseforgeError> {
        self.db()?.close().await
    }

    // --- Message operations ---

    async fn insert_message(&self, message: &NewMessage) -> Result<i64, CaseforgeError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn insert_message_attributes(
        &self,
        message_id: i64,
        attributes: &[(String, String)],
    ) -> Result<(), CaseforgeError> {
        queries::messages::insert_attributes(self.db()?, message_id, attributes).await
    }

    async fn find_message(&self, id: i64) -> Result<Option<StoredMessage>, CaseforgeError> {
        queries::messages::find_message(self.db()?, id).await
    }

    async fn message_attributes(
        &self,
        message_id: i64,
    ) -> Result<Vec<MessageAttribute>, CaseforgeError> {
        queries::messages::attributes_for_message(self.db()?, message_id).await
    }

    // --- Investigation operations ---

    async fn insert_investigation(
        &self,
        investigation: &NewInvestigation,
    ) -> Result<i64, CaseforgeError> {
        queries::investigations::insert_investigation(self.db()?, investigation).await
    }

    async fn find_investigation(
        &self,
        id: i64,
    ) -> Result<Option<Investigation>, CaseforgeError> {
        queries::investigations::find_investigation(self.db()?, id).await
    }

    async fn find_investigation_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<Option<Investigation>, CaseforgeError> {
        queries::investigations::find_by_reference(self.db()?, reference_number).await
    }

    async fn update_investigation(
        &self,
        investigation: &Investigation,
    ) -> Result<(), CaseforgeError> {
        queries::investigations::update_investigation(self.db()?, investigation).await
    }

    async fn delete_investigation(&self, id: i64) -> Result<(), CaseforgeError> {
        queries::investigations::delete_investigation(self.db()?, id).await
    }

    async fn list_investigations(
        &self,
        filter: &InvestigationFilter,
    ) -> Result<InvestigationPage, CaseforgeError> {
        queries::investigations::list_investigations(self.db()?, filter).await
    }

    async fn count_investigations_by_status(
        &self,
    ) -> Result<Vec<(String, i64)>, CaseforgeError> {
        queries::investigations::count_by_status(self.db()?).await
    }

    async fn count_investigations_by_priority(
        &self,
    ) -> Result<Vec<(String, i64)>, CaseforgeError> {
        queries::investigations::count_by_priority(self.db()?).await
    }

    async fn avg_resolution_hours(&self) -> Result<f64, CaseforgeError> {
        queries::investigations::avg_resolution_hours(self.db()?).await
    }

    // --- Action operations ---

    async fn insert_action(&self, action: &NewAction) -> Result<i64, CaseforgeError> {
        queries::actions::insert_action(self.db()?, action).await
    }

    async fn find_action(
        &self,
        id: i64,
    ) -> Result<Option<InvestigationAction>, CaseforgeError> {
        queries::actions::find_action(self.db()?, id).await
    }

    async fn update_action(&self, action: &InvestigationAction) -> Result<(), CaseforgeError> {
        queries::actions::update_action(self.db()?, action).await
    }

    async fn actions_for_investigation(
        &self,
        investigation_id: i64,
    ) -> Result<Vec<InvestigationAction>, CaseforgeError> {
        queries::actions::actions_for_investigation(self.db()?, investigation_id).await
    }

    async fn action_counts(
        &self,
        investigation_id: i64,
    ) -> Result<ActionCounts, CaseforgeError> {
        queries::actions::action_counts(self.db()?, investigation_id).await
    }

    async fn count_actions_by_type(&self) -> Result<Vec<(String, i64)>, CaseforgeError> {
        queries::actions::count_by_type(self.db()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::{ActionStatus, CaseStatus, Priority};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn make_message(label: &str) -> NewMessage {
        NewMessage {
            message_id: label.to_string(),
            message_type: "MT".to_string(),
            content: ":20:TRN-1\n:79:PLEASE CANCEL".to_string(),
            converted_content: None,
            created_at: Utc::now(),
            processed_at: None,
            processing_time: None,
            is_bulk: false,
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.find_message(1).await.is_err());
    }

    #[tokio::test]
    async fn full_case_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let message_id = storage.insert_message(&make_message("MT-E2E")).await.unwrap();
        storage
            .insert_message_attributes(
                message_id,
                &[("reference".to_string(), "TRN-1".to_string())],
            )
            .await
            .unwrap();

        let now = Utc::now();
        let inv_id = storage
            .insert_investigation(&NewInvestigation {
                reference_number: "INV-20260807-E2E1".to_string(),
                message_id,
                status: CaseStatus::Open,
                priority: Priority::High,
                customer_info: Some(serde_json::json!({"name": "ACME Corp"})),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let action_id = storage
            .insert_action(&NewAction {
                investigation_id: inv_id,
                action_type: "cancellation".to_string(),
                description: "request cancellation at correspondent".to_string(),
                suggested_response: Some("Please cancel TRN-1".to_string()),
                status: ActionStatus::Pending,
                priority: Priority::High,
                deadline: now + Duration::days(1),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let inv = storage.find_investigation(inv_id).await.unwrap().unwrap();
        assert_eq!(inv.customer_info.unwrap()["name"], "ACME Corp");

        let actions = storage.actions_for_investigation(inv_id).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, action_id);

        let counts = storage.action_counts(inv_id).await.unwrap();
        assert_eq!(counts.total, 1);
        assert_eq!(counts.pending, 1);

        storage.close().await.unwrap();
    }
}
