// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Investigation action CRUD and summary queries.

use caseforge_core::{
    ActionCounts, ActionStatus, CaseforgeError, InvestigationAction, NewAction, Priority,
};
use rusqlite::{params, OptionalExtension, Row};

use crate::database::{
    map_tr_err, parse_timestamp, parse_timestamp_opt, to_timestamp, to_timestamp_opt, Database,
};

const ACTION_COLUMNS: &str =
    "id, investigation_id, action_type, description, suggested_response, status, priority, \
     notes, deadline, completed_at, created_at, updated_at";

fn conversion_err(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn action_from_row(row: &Row<'_>) -> rusqlite::Result<InvestigationAction> {
    let status: ActionStatus = row
        .get::<_, String>(5)?
        .parse()
        .map_err(|e| conversion_err(5, e))?;
    let priority: Priority = row
        .get::<_, String>(6)?
        .parse()
        .map_err(|e| conversion_err(6, e))?;

    Ok(InvestigationAction {
        id: row.get(0)?,
        investigation_id: row.get(1)?,
        action_type: row.get(2)?,
        description: row.get(3)?,
        suggested_response: row.get(4)?,
        status,
        priority,
        notes: row.get(7)?,
        deadline: parse_timestamp(&row.get::<_, String>(8)?)?,
        completed_at: parse_timestamp_opt(row.get(9)?)?,
        created_at: parse_timestamp(&row.get::<_, String>(10)?)?,
        updated_at: parse_timestamp(&row.get::<_, String>(11)?)?,
    })
}

/// Insert an action row and return its rowid.
pub async fn insert_action(db: &Database, action: &NewAction) -> Result<i64, CaseforgeError> {
    let action = action.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO investigation_actions
                     (investigation_id, action_type, description, suggested_response,
                      status, priority, deadline, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    action.investigation_id,
                    action.action_type,
                    action.description,
                    action.suggested_response,
                    action.status.to_string(),
                    action.priority.to_string(),
                    to_timestamp(&action.deadline),
                    to_timestamp(&action.created_at),
                    to_timestamp(&action.updated_at),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an action by rowid.
pub async fn find_action(
    db: &Database,
    id: i64,
) -> Result<Option<InvestigationAction>, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACTION_COLUMNS} FROM investigation_actions WHERE id = ?1"
            ))?;
            Ok(stmt.query_row(params![id], action_from_row).optional()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Full-row update of the mutable columns, keyed on id.
pub async fn update_action(
    db: &Database,
    action: &InvestigationAction,
) -> Result<(), CaseforgeError> {
    let action = action.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE investigation_actions
                 SET action_type = ?1, description = ?2, suggested_response = ?3, status = ?4,
                     priority = ?5, notes = ?6, deadline = ?7, completed_at = ?8, updated_at = ?9
                 WHERE id = ?10",
                params![
                    action.action_type,
                    action.description,
                    action.suggested_response,
                    action.status.to_string(),
                    action.priority.to_string(),
                    action.notes,
                    to_timestamp(&action.deadline),
                    to_timestamp_opt(&action.completed_at),
                    to_timestamp(&action.updated_at),
                    action.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Actions for an investigation, ordered by creation time ascending.
pub async fn actions_for_investigation(
    db: &Database,
    investigation_id: i64,
) -> Result<Vec<InvestigationAction>, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACTION_COLUMNS} FROM investigation_actions
                 WHERE investigation_id = ?1 ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![investigation_id], action_from_row)?;
            let mut actions = Vec::new();
            for row in rows {
                actions.push(row?);
            }
            Ok(actions)
        })
        .await
        .map_err(map_tr_err)
}

/// Total / pending / completed counts for one investigation.
pub async fn action_counts(
    db: &Database,
    investigation_id: i64,
) -> Result<ActionCounts, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let counts = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(status = 'pending'), 0),
                        COALESCE(SUM(status = 'completed'), 0)
                 FROM investigation_actions WHERE investigation_id = ?1",
                params![investigation_id],
                |row| {
                    Ok(ActionCounts {
                        total: row.get(0)?,
                        pending: row.get(1)?,
                        completed: row.get(2)?,
                    })
                },
            )?;
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}

/// Action counts grouped by type label, across all investigations.
pub async fn count_by_type(db: &Database) -> Result<Vec<(String, i64)>, CaseforgeError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT action_type, COUNT(*) FROM investigation_actions GROUP BY action_type",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut counts = Vec::new();
            for row in rows {
                counts.push(row?);
            }
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}
