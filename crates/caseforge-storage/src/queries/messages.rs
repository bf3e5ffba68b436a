// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message and attribute CRUD operations.

use caseforge_core::{CaseforgeError, MessageAttribute, NewMessage, StoredMessage};
use rusqlite::{params, OptionalExtension, Row};

use crate::database::{
    map_tr_err, parse_timestamp, parse_timestamp_opt, to_timestamp, to_timestamp_opt, Database,
};

const MESSAGE_COLUMNS: &str = "id, message_id, message_type, content, converted_content, \
                               created_at, processed_at, processing_time, is_bulk";

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        message_id: row.get(1)?,
        message_type: row.get(2)?,
        content: row.get(3)?,
        converted_content: row.get(4)?,
        created_at: parse_timestamp(&row.get::<_, String>(5)?)?,
        processed_at: parse_timestamp_opt(row.get(6)?)?,
        processing_time: row.get(7)?,
        is_bulk: row.get(8)?,
    })
}

/// Insert a message row and return its rowid.
pub async fn insert_message(db: &Database, message: &NewMessage) -> Result<i64, CaseforgeError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (message_id, message_type, content, converted_content,
                                       created_at, processed_at, processing_time, is_bulk)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    message.message_id,
                    message.message_type,
                    message.content,
                    message.converted_content,
                    to_timestamp(&message.created_at),
                    to_timestamp_opt(&message.processed_at),
                    message.processing_time,
                    message.is_bulk,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert attribute rows for a message.
pub async fn insert_attributes(
    db: &Database,
    message_id: i64,
    attributes: &[(String, String)],
) -> Result<(), CaseforgeError> {
    let attributes = attributes.to_vec();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO message_attributes (message_id, key, value) VALUES (?1, ?2, ?3)",
            )?;
            for (key, value) in &attributes {
                stmt.execute(params![message_id, key, value])?;
            }
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a message by rowid.
pub async fn find_message(
    db: &Database,
    id: i64,
) -> Result<Option<StoredMessage>, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"
            ))?;
            Ok(stmt.query_row(params![id], message_from_row).optional()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Attributes for a message, in insertion order.
pub async fn attributes_for_message(
    db: &Database,
    message_id: i64,
) -> Result<Vec<MessageAttribute>, CaseforgeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, message_id, key, value FROM message_attributes
                 WHERE message_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![message_id], |row| {
                Ok(MessageAttribute {
                    id: row.get(0)?,
                    message_id: row.get(1)?,
                    key: row.get(2)?,
                    value: row.get(3)?,
                })
            })?;
            let mut attributes = Vec::new();
            for row in rows {
                attributes.push(row?);
            }
            Ok(attributes)
        })
        .await
        .map_err(map_tr_err)
}
