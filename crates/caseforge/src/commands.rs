// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handlers: wire config, storage, provider, pipeline, and the
//! lifecycle service together and print JSON results.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::info;

use caseforge_config::CaseforgeConfig;
use caseforge_core::{
    ActionStatus, CaseforgeError, CaseStatus, Priority, ProcessingMode, StorageAdapter,
};
use caseforge_lifecycle::InvestigationService;
use caseforge_openai::OpenAiProvider;
use caseforge_pipeline::{read_bulk_rows, BulkOutcome, MessagePipeline};
use caseforge_storage::SqliteStorage;

use crate::CaseCommands;

struct Stack {
    storage: Arc<SqliteStorage>,
    pipeline: MessagePipeline,
    service: InvestigationService,
}

async fn build_stack(config: &CaseforgeConfig) -> Result<Stack, CaseforgeError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let provider = Arc::new(OpenAiProvider::new(&config.openai)?);
    let pipeline = MessagePipeline::new(provider.clone());
    let service = InvestigationService::new(
        storage.clone(),
        MessagePipeline::new(provider),
        config.investigation.clone(),
    );

    Ok(Stack {
        storage,
        pipeline,
        service,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CaseforgeError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CaseforgeError::Internal(format!("could not render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn parse_mode(mode: &str) -> Result<ProcessingMode, CaseforgeError> {
    mode.parse().map_err(|_| {
        CaseforgeError::Validation(format!("unknown mode `{mode}` (convert or extract)"))
    })
}

fn parse_priority(priority: &str) -> Result<Priority, CaseforgeError> {
    priority.parse().map_err(|_| {
        CaseforgeError::Validation(format!(
            "unknown priority `{priority}` (low, medium, high, critical)"
        ))
    })
}

fn parse_case_status(status: &str) -> Result<CaseStatus, CaseforgeError> {
    status.parse().map_err(|_| {
        CaseforgeError::Validation(format!(
            "unknown status `{status}` (open, in_progress, resolved, closed)"
        ))
    })
}

fn parse_action_status(status: &str) -> Result<ActionStatus, CaseforgeError> {
    status.parse().map_err(|_| {
        CaseforgeError::Validation(format!(
            "unknown status `{status}` (pending, in_progress, completed, cancelled)"
        ))
    })
}

fn read_content(file: Option<&Path>) -> Result<String, CaseforgeError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            CaseforgeError::Validation(format!("could not read {}: {e}", path.display()))
        }),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| CaseforgeError::Validation(format!("could not read stdin: {e}")))?;
            Ok(content)
        }
    }
}

/// Process one message and print the result.
pub async fn process(
    config: &CaseforgeConfig,
    file: Option<&Path>,
    mode: &str,
    message_id: Option<String>,
    save: bool,
) -> Result<(), CaseforgeError> {
    let mode = parse_mode(mode)?;
    let content = read_content(file)?;
    let stack = build_stack(config).await?;

    let result = stack.pipeline.process_single(&content, mode, message_id).await?;
    if save {
        let row_id = stack
            .pipeline
            .persist_message(stack.storage.as_ref(), &result, &content, false)
            .await?;
        info!(row_id, "message persisted");
    }
    print_json(&result)?;

    stack.storage.close().await
}

/// Process a CSV of messages row by row with a progress bar.
pub async fn bulk(
    config: &CaseforgeConfig,
    file: &Path,
    mode: &str,
    save: bool,
) -> Result<(), CaseforgeError> {
    let mode = parse_mode(mode)?;
    let reader = std::fs::File::open(file).map_err(|e| {
        CaseforgeError::Validation(format!("could not open {}: {e}", file.display()))
    })?;
    let rows = read_bulk_rows(reader)?;
    let stack = build_stack(config).await?;

    let bar = ProgressBar::new(rows.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("progress template is valid"),
    );

    let mut outcomes: Vec<BulkOutcome> = Vec::with_capacity(rows.len());
    for row in &rows {
        bar.set_message(row.message_id.clone());
        let batch = stack
            .pipeline
            .process_bulk(std::slice::from_ref(row), mode)
            .await;
        for outcome in batch {
            if save {
                if let Some(result) = &outcome.result {
                    stack
                        .pipeline
                        .persist_message(stack.storage.as_ref(), result, &row.message, true)
                        .await?;
                }
            }
            outcomes.push(outcome);
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let failures = outcomes.iter().filter(|o| o.is_error()).count();
    info!(total = outcomes.len(), failures, "bulk processing finished");
    print_json(&outcomes)?;

    stack.storage.close().await
}

/// Dispatch a case-management subcommand.
pub async fn case(
    config: &CaseforgeConfig,
    command: CaseCommands,
) -> Result<(), CaseforgeError> {
    let stack = build_stack(config).await?;
    let service = &stack.service;

    match command {
        CaseCommands::Open {
            message_id,
            priority,
            customer_info,
        } => {
            let customer_info = customer_info
                .map(|raw| {
                    serde_json::from_str::<Value>(&raw).map_err(|e| {
                        CaseforgeError::Validation(format!("customer_info is not valid JSON: {e}"))
                    })
                })
                .transpose()?;
            let investigation = service
                .create_investigation(message_id, parse_priority(&priority)?, customer_info)
                .await?;
            print_json(&investigation)?;
        }
        CaseCommands::AddAction {
            investigation_id,
            action_type,
            description,
            suggested_response,
            priority,
            deadline_days,
        } => {
            let action = service
                .add_action(
                    investigation_id,
                    &action_type,
                    &description,
                    suggested_response,
                    parse_priority(&priority)?,
                    deadline_days,
                )
                .await?;
            print_json(&action)?;
        }
        CaseCommands::UpdateAction {
            action_id,
            status,
            notes,
        } => {
            let action = service
                .update_action_status(action_id, parse_action_status(&status)?, notes)
                .await?;
            print_json(&action)?;
        }
        CaseCommands::Resolve {
            investigation_id,
            notes,
        } => {
            let investigation = service.resolve_investigation(investigation_id, &notes).await?;
            print_json(&investigation)?;
        }
        CaseCommands::Close { investigation_id } => {
            let investigation = service.close_investigation(investigation_id).await?;
            print_json(&investigation)?;
        }
        CaseCommands::Show { id, reference } => {
            let detail = if reference {
                service.get_investigation_by_reference(&id).await?
            } else {
                let id: i64 = id.parse().map_err(|_| {
                    CaseforgeError::Validation(format!("`{id}` is not a case id"))
                })?;
                service.get_investigation(id).await?
            };
            print_json(&detail)?;
        }
        CaseCommands::List {
            status,
            priority,
            limit,
            offset,
        } => {
            let status = status.as_deref().map(parse_case_status).transpose()?;
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            let page = service
                .list_investigations(status, priority, limit, offset)
                .await?;
            print_json(&page)?;
        }
        CaseCommands::Analytics => {
            let report = service.get_analytics().await?;
            print_json(&report)?;
        }
        CaseCommands::Notify {
            investigation_id,
            notification_type,
        } => {
            let notification = service
                .generate_customer_notification(investigation_id, &notification_type)
                .await?;
            print_json(&notification)?;
        }
    }

    stack.storage.close().await
}

/// Print the effective configuration (API key redacted).
pub fn show_config(config: &CaseforgeConfig) -> Result<(), CaseforgeError> {
    let mut redacted = config.clone();
    if !redacted.openai.api_key.is_empty() {
        redacted.openai.api_key = "<set>".to_string();
    }
    print_json(&redacted)
}
