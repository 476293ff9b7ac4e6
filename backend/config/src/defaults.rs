//! Config defaults: fills every unset value after loading.

use crate::schema::{FixturesConfig, ForgeConfig, InteractionConfig, LoggingConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Platform maximum for autocomplete choices.
pub const DEFAULT_SUGGESTION_CAP: usize = 25;

/// Budget for answering a command interaction.
pub const DEFAULT_COMMAND_DEADLINE_MS: u64 = 2_500;

/// Budget for answering an autocomplete interaction.
pub const DEFAULT_AUTOCOMPLETE_DEADLINE_MS: u64 = 2_500;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ForgeConfig) -> ForgeConfig {
    let config = apply_logging_defaults(config);
    let config = apply_interaction_defaults(config);
    apply_fixture_defaults(config)
}

fn apply_logging_defaults(mut config: ForgeConfig) -> ForgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

fn apply_interaction_defaults(mut config: ForgeConfig) -> ForgeConfig {
    let interactions = config.interactions.get_or_insert_with(InteractionConfig::default);
    interactions.suggestion_cap.get_or_insert(DEFAULT_SUGGESTION_CAP);
    interactions.command_deadline_ms.get_or_insert(DEFAULT_COMMAND_DEADLINE_MS);
    interactions.autocomplete_deadline_ms.get_or_insert(DEFAULT_AUTOCOMPLETE_DEADLINE_MS);
    config
}

fn apply_fixture_defaults(mut config: ForgeConfig) -> ForgeConfig {
    config.fixtures.get_or_insert_with(FixturesConfig::default);
    config
}
