// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Investigation CRUD, filtered listing, and aggregate queries.

use caseforge_core::{
    CaseforgeError, CaseStatus, Investigation, InvestigationFilter, InvestigationPage,
    NewInvestigation, Priority,
};
use rusqlite::{params, OptionalExtension, Row, ToSql};

use crate::database::{
    map_tr_err, parse_timestamp, parse_timestamp_opt, to_timestamp, to_timestamp_opt, Database,
};

const INVESTIGATION_COLUMNS: &str =
    "id, reference_number, message_id, status, priority, customer_info, resolution_notes, \
     created_at, updated_at, resolved_at";

fn conversion_err(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn investigation_from_row(row: &Row<'_>) -> rusqlite::Result<Investigation> {
    let status: CaseStatus = row
        .get::<_, String>(3)?
        .parse()
        .map_err(|e| conversion_err(3, e))?;
    let priority: Priority = row
        .get::<_, String>(4)?
        .parse()
        .map_err(|e| conversion_err(4, e))?;
    let customer_info = row
        .get::<_, Option<String>>(5)?
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| conversion_err(5, e))?;

    Ok(Investigation {
        id: row.get(0)?,
        reference_number: row.get(1)?,
        message_id: row.get(2)?,
        status,
        priority,
        customer_info,
        resolution_notes: row.get(6)?,
        created_at: parse_timestamp(&row.get::<_, String>(7)?)?,
        updated_at: parse_timestamp(&row.get::<_, String>(8)?)?,
        resolved_at: parse_timestamp_opt(row.get(9)?)?,
    })
}

/// Insert an investigation row and return its rowid.
///
/// A UNIQUE violation on `reference_number` maps to
/// [`CaseforgeError::Conflict`] so the caller can regenerate and retry.
pub async fn insert_investigation(
    db: &Database,
    investigation: &NewInvestigation,
) -> Result<i64, CaseforgeError> {
    let reference = investigation.reference_number.clone();
    let investigation = investigation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO investigations (reference_number, message_id, status, priority,
                                             customer_info, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    investigation.reference_number,
                    investigation.message_id,
                    investigation.status.to_string(),
                    investigation.priority.to_string(),
                    investigation
                        .customer_info
                        .as_ref()
                        .map(|v| v.to_string()),
                    to_timestamp(&investigation.created_at),
                    to_timestamp(&investigation.updated_at),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(|err| map_unique_violation(err, &reference))
}

fn map_unique_violation(err: tokio_rusqlite::Error, reference: &str) -> CaseforgeError {
    if let tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(e, _)) = &err {
        if e.code == rusqlite::ErrorCode::ConstraintViolation {
            return CaseforgeError::Conflict(format!(
                "reference number already exists: {reference}"
            ));
        }
    }
    map_tr_err(err)
}

/// Get an investigation by rowid.
pub async fn find_investigation(
    db: &Database,
    id: i64,
) -> Result<Option<Investigation>, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INVESTIGATION_COLUMNS} FROM investigations WHERE id = ?1"
            ))?;
            Ok(stmt
                .query_row(params![id], investigation_from_row)
                .optional()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Get an investigation by its unique reference number.
pub async fn find_by_reference(
    db: &Database,
    reference_number: &str,
) -> Result<Option<Investigation>, CaseforgeError> {
    let reference_number = reference_number.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INVESTIGATION_COLUMNS} FROM investigations WHERE reference_number = ?1"
            ))?;
            Ok(stmt
                .query_row(params![reference_number], investigation_from_row)
                .optional()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Full-row update of the mutable columns, keyed on id.
pub async fn update_investigation(
    db: &Database,
    investigation: &Investigation,
) -> Result<(), CaseforgeError> {
    let investigation = investigation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE investigations
                 SET status = ?1, priority = ?2, customer_info = ?3, resolution_notes = ?4,
                     updated_at = ?5, resolved_at = ?6
                 WHERE id = ?7",
                params![
                    investigation.status.to_string(),
                    investigation.priority.to_string(),
                    investigation
                        .customer_info
                        .as_ref()
                        .map(|v| v.to_string()),
                    investigation.resolution_notes,
                    to_timestamp(&investigation.updated_at),
                    to_timestamp_opt(&investigation.resolved_at),
                    investigation.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an investigation. Its actions go with it via FK cascade.
pub async fn delete_investigation(db: &Database, id: i64) -> Result<(), CaseforgeError> {
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM investigations WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Filtered listing sorted by `updated_at` descending, plus the
/// pre-pagination total for the same filter.
pub async fn list_investigations(
    db: &Database,
    filter: &InvestigationFilter,
) -> Result<InvestigationPage, CaseforgeError> {
    let status = filter.status.map(|s| s.to_string());
    let priority = filter.priority.map(|p| p.to_string());
    let limit = filter.limit;
    let offset = filter.offset;

    db.connection()
        .call(move |conn| {
            let mut clauses: Vec<&str> = Vec::new();
            let mut owned: Vec<String> = Vec::new();
            if let Some(s) = status {
                clauses.push("status = ?");
                owned.push(s);
            }
            if let Some(p) = priority {
                clauses.push("priority = ?");
                owned.push(p);
            }
            let where_sql = if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            };

            let mut filter_params: Vec<&dyn ToSql> =
                owned.iter().map(|s| s as &dyn ToSql).collect();

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM investigations{where_sql}"),
                filter_params.as_slice(),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {INVESTIGATION_COLUMNS} FROM investigations{where_sql}
                 ORDER BY updated_at DESC LIMIT ? OFFSET ?"
            ))?;
            filter_params.push(&limit);
            filter_params.push(&offset);
            let rows = stmt.query_map(filter_params.as_slice(), investigation_from_row)?;

            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(InvestigationPage { total, items })
        })
        .await
        .map_err(map_tr_err)
}

/// Investigation counts grouped by status label.
pub async fn count_by_status(db: &Database) -> Result<Vec<(String, i64)>, CaseforgeError> {
    group_count(db, "SELECT status, COUNT(*) FROM investigations GROUP BY status").await
}

/// Investigation counts grouped by priority label.
pub async fn count_by_priority(db: &Database) -> Result<Vec<(String, i64)>, CaseforgeError> {
    group_count(
        db,
        "SELECT priority, COUNT(*) FROM investigations GROUP BY priority",
    )
    .await
}

async fn group_count(
    db: &Database,
    sql: &'static str,
) -> Result<Vec<(String, i64)>, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(sql)?;
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

/// Average hours from creation to resolution over resolved/closed cases
/// with a resolution timestamp. 0.0 when no such case exists.
pub async fn avg_resolution_hours(db: &Database) -> Result<f64, CaseforgeError> {
    db.connection()
        .call(|conn| {
            let avg: f64 = conn.query_row(
                "SELECT COALESCE(
                     AVG((julianday(resolved_at) - julianday(created_at)) * 24.0), 0.0)
                 FROM investigations
                 WHERE status IN ('resolved', 'closed') AND resolved_at IS NOT NULL",
                [],
                |row| row.get(0),
            )?;
            Ok(avg)
        })
        .await
        .map_err(map_tr_err)
}
