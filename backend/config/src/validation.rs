//! Config validation with dotted paths in every message.

use crate::defaults::DEFAULT_SUGGESTION_CAP;
use crate::schema::ForgeConfig;
use std::collections::HashSet;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &ForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_interactions(config, &mut report);
    validate_fixtures(config, &mut report);
    report
}

fn validate_logging(config: &ForgeConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        // Directive strings like "slashforge=debug,info" are left to EnvFilter.
        if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            report.warn("logging.level", format!("Unknown log level '{level}'"));
        }
    }
    if let Some(dir) = &logging.dir {
        if dir.trim().is_empty() {
            report.error("logging.dir", "Log directory cannot be empty");
        }
    }
}

fn validate_interactions(config: &ForgeConfig, report: &mut ValidationReport) {
    let Some(interactions) = &config.interactions else { return };
    match interactions.suggestion_cap {
        Some(0) => report.error("interactions.suggestionCap", "Suggestion cap must be at least 1"),
        Some(cap) if cap > DEFAULT_SUGGESTION_CAP => report.error(
            "interactions.suggestionCap",
            format!("Suggestion cap {cap} exceeds the platform maximum of 25"),
        ),
        _ => {}
    }
    if interactions.command_deadline_ms == Some(0) {
        report.error("interactions.commandDeadlineMs", "Deadline must be greater than 0");
    }
    if interactions.autocomplete_deadline_ms == Some(0) {
        report.error("interactions.autocompleteDeadlineMs", "Deadline must be greater than 0");
    }
    if let Some(ms) = interactions.command_deadline_ms {
        if ms > 3_000 {
            report.warn(
                "interactions.commandDeadlineMs",
                "Deadlines above 3000ms outlive the platform's initial response window",
            );
        }
    }
}

fn validate_fixtures(config: &ForgeConfig, report: &mut ValidationReport) {
    let Some(fixtures) = &config.fixtures else { return };
    let mut seen = HashSet::new();
    for (i, channel) in fixtures.channels.iter().enumerate() {
        let path = format!("fixtures.channels[{i}]");
        if !seen.insert(channel.id) {
            report.error(&path, format!("Duplicate channel id {}", channel.id));
        }
        if !channel.available_tags.is_empty() && !channel.kind.has_tags() {
            report.warn(&path, format!("Tags on a {} channel are never offered", channel.kind));
        }
    }
    for (i, emoji) in fixtures.emojis.iter().enumerate() {
        if !emoji.is_guild() {
            report.warn(
                format!("fixtures.emojis[{i}]"),
                "Unicode emojis need no fixture and are ignored",
            );
        }
    }
}
