// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./caseforge.toml` > `~/.config/caseforge/caseforge.toml`
//! > `/etc/caseforge/caseforge.toml` with environment variable overrides via
//! `CASEFORGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CaseforgeConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/caseforge/caseforge.toml` (system-wide)
/// 3. `~/.config/caseforge/caseforge.toml` (user XDG config)
/// 4. `./caseforge.toml` (local directory)
/// 5. `CASEFORGE_*` environment variables
pub fn load_config() -> Result<CaseforgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CaseforgeConfig::default()))
        .merge(Toml::file("/etc/caseforge/caseforge.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("caseforge/caseforge.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("caseforge.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CaseforgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CaseforgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CaseforgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CaseforgeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CASEFORGE_OPENAI_API_KEY` must map to
/// `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CASEFORGE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("investigation_", "investigation.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_overrides_from_toml_string() {
        let config = load_config_from_str(
            r#"
[app]
log_level = "debug"

[investigation]
default_deadline_days = 5
"#,
        )
        .unwrap();
        assert_eq!(config.app.log_level, "debug");
        assert_eq!(config.investigation.default_deadline_days, 5);
        // Untouched sections keep compiled defaults.
        assert_eq!(config.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.app.name, "caseforge");
    }
}
