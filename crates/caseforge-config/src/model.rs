// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Caseforge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaseforgeConfig {
    /// Application identity and logging settings.
    #[serde(default)]
    pub app: AppConfig,

    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Investigation lifecycle defaults.
    #[serde(default)]
    pub investigation: InvestigationConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs and generated correspondence.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// OpenAI chat-completions configuration.
///
/// Injected explicitly into the provider adapter at construction; there is
/// no ambient/global credential state anywhere in the core.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. Empty means the provider is unconfigured and any
    /// generative call fails with a configuration error.
    #[serde(default)]
    pub api_key: String,

    /// API origin; the chat-completions path is appended by the client.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Completion token cap per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

/// Investigation lifecycle defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InvestigationConfig {
    /// Action deadline offset in days when a suggestion carries none.
    #[serde(default = "default_deadline_days")]
    pub default_deadline_days: i64,

    /// Upper bound on reference-number regeneration attempts after a
    /// unique-key collision.
    #[serde(default = "default_reference_retry_limit")]
    pub reference_retry_limit: u32,
}

impl Default for InvestigationConfig {
    fn default() -> Self {
        Self {
            default_deadline_days: default_deadline_days(),
            reference_retry_limit: default_reference_retry_limit(),
        }
    }
}

fn default_app_name() -> String {
    "caseforge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.55
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_database_path() -> String {
    "caseforge.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_deadline_days() -> i64 {
    3
}

fn default_reference_retry_limit() -> u32 {
    5
}
