// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caseforge - financial-message investigation case manager.
//!
//! Binary entry point: loads and validates configuration, initializes
//! tracing, and dispatches to the command handlers.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Caseforge - financial-message investigation case manager.
#[derive(Parser, Debug)]
#[command(name = "caseforge", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (otherwise the XDG hierarchy is used).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a single message (from a file, or stdin when omitted).
    Process {
        /// File containing the raw message text.
        file: Option<PathBuf>,
        /// Processing mode: convert or extract.
        #[arg(long, default_value = "extract")]
        mode: String,
        /// External message identifier; derived from the clock when absent.
        #[arg(long)]
        message_id: Option<String>,
        /// Persist the processed message and its attributes.
        #[arg(long)]
        save: bool,
    },
    /// Process a CSV of messages (columns: messageId, message).
    Bulk {
        file: PathBuf,
        /// Processing mode: convert or extract.
        #[arg(long, default_value = "extract")]
        mode: String,
        /// Persist each successfully processed row.
        #[arg(long)]
        save: bool,
    },
    /// Manage investigation cases.
    #[command(subcommand)]
    Case(CaseCommands),
    /// Load the configuration, validate it, and print the effective values.
    Config,
}

#[derive(Subcommand, Debug)]
enum CaseCommands {
    /// Open an investigation for a stored message.
    Open {
        /// Rowid of the stored message.
        message_id: i64,
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Customer info as inline JSON.
        #[arg(long)]
        customer_info: Option<String>,
    },
    /// Add a remediation action to a case.
    AddAction {
        investigation_id: i64,
        #[arg(long)]
        action_type: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        suggested_response: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        deadline_days: Option<i64>,
    },
    /// Update an action's status.
    UpdateAction {
        action_id: i64,
        /// New status: pending, in_progress, completed, cancelled.
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Resolve a case with notes.
    Resolve {
        investigation_id: i64,
        notes: String,
    },
    /// Close a case (terminal).
    Close { investigation_id: i64 },
    /// Show the full detail of one case.
    Show {
        /// Case id, or a reference number when --reference is set.
        id: String,
        #[arg(long)]
        reference: bool,
    },
    /// List cases with optional filters.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Print the analytics snapshot.
    Analytics,
    /// Draft a customer notification for a case.
    Notify {
        investigation_id: i64,
        #[arg(long, default_value = "status_update")]
        notification_type: String,
    },
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => caseforge_config::load_config_from_path(path)
            .map_err(|err| caseforge_config::diagnostic::figment_to_config_errors(err, &[]))
            .and_then(|config| {
                caseforge_config::validation::validate_config(&config)?;
                Ok(config)
            }),
        None => caseforge_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            caseforge_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Commands::Process {
            file,
            mode,
            message_id,
            save,
        } => commands::process(&config, file.as_deref(), &mode, message_id, save).await,
        Commands::Bulk { file, mode, save } => {
            commands::bulk(&config, &file, &mode, save).await
        }
        Commands::Case(case_command) => commands::case(&config, case_command).await,
        Commands::Config => commands::show_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
