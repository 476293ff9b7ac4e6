//! `slashforge-config` - runtime configuration for the command pipeline.
//!
//! Provides:
//! - Typed config schema (logging, interaction budgets, lookup fixtures)
//! - YAML loading with a first-run default
//! - `SLASHFORGE_*` environment overrides
//! - Default value application
//! - Validation report

pub mod defaults;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{FixturesConfig, ForgeConfig, InteractionConfig, LoggingConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

pub const ENV_LOG_LEVEL: &str = "SLASHFORGE_LOG_LEVEL";
pub const ENV_SUGGESTION_CAP: &str = "SLASHFORGE_SUGGESTION_CAP";
pub const ENV_COMMAND_DEADLINE_MS: &str = "SLASHFORGE_COMMAND_DEADLINE_MS";

/// Overlay `SLASHFORGE_*` variables from the process environment.
pub fn apply_env_overrides(config: ForgeConfig) -> ForgeConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Overlay overrides from a provided map (useful for testing).
///
/// Values that don't parse are logged and skipped.
pub fn apply_env_overrides_with(
    mut config: ForgeConfig,
    env: &HashMap<String, String>,
) -> ForgeConfig {
    if let Some(level) = env.get(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
        let logging = config.logging.get_or_insert_with(Default::default);
        logging.level = Some(level.trim().to_string());
    }
    if let Some(raw) = env.get(ENV_SUGGESTION_CAP) {
        match raw.trim().parse::<usize>() {
            Ok(cap) => {
                let interactions = config.interactions.get_or_insert_with(Default::default);
                interactions.suggestion_cap = Some(cap);
            }
            Err(_) => {
                warn!(var = ENV_SUGGESTION_CAP, value = %raw, "Ignoring non-numeric override")
            }
        }
    }
    if let Some(raw) = env.get(ENV_COMMAND_DEADLINE_MS) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => {
                let interactions = config.interactions.get_or_insert_with(Default::default);
                interactions.command_deadline_ms = Some(ms);
            }
            Err(_) => {
                warn!(var = ENV_COMMAND_DEADLINE_MS, value = %raw, "Ignoring non-numeric override")
            }
        }
    }
    config
}

/// Load, apply env overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Warnings are
/// logged; any error aborts the load.
pub async fn load_and_prepare(path: &Path) -> Result<ForgeConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("invalid config at {}: {first}", path.display());
    }

    Ok(config)
}
