//! SlashForge runtime configuration schema.
//!
//! Every section is optional in the file; `apply_all_defaults` fills the
//! gaps after loading.

use serde::{Deserialize, Serialize};
use slashforge_core::{Channel, Emoji, Snowflake};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeConfig {
    /// Log level, file output and format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Suggestion cap and response deadlines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<InteractionConfig>,

    /// Entities served by the in-memory lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<FixturesConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the daily rolling log file; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_cap: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_deadline_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete_deadline_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturesConfig {
    /// Guild the fixtures belong to; invocations default to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emojis: Vec<Emoji>,
}

impl ForgeConfig {
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    pub fn interactions(&self) -> InteractionConfig {
        self.interactions.clone().unwrap_or_default()
    }

    pub fn fixtures(&self) -> FixturesConfig {
        self.fixtures.clone().unwrap_or_default()
    }
}
