/// Inbound interaction payloads handed over by the gateway/dispatch layer.
///
/// Extra payload fields are ignored.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use slashforge_core::{Attachment, Snowflake};

use crate::value::RawInputs;

/// Where and by whom a command is being invoked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub user_id: Snowflake,
    #[serde(default)]
    pub locale: Option<String>,
    /// Files uploaded with the interaction, keyed by attachment id.
    #[serde(default)]
    pub attachments: HashMap<Snowflake, Attachment>,
}

/// A submitted command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInteraction {
    pub command_name: String,
    #[serde(default)]
    pub options: RawInputs,
    #[serde(default)]
    pub context: InvocationContext,
}

/// A keystroke-level autocomplete request for one focused option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteInteraction {
    pub command_name: String,
    pub focused_option: String,
    #[serde(default)]
    pub partial_input: String,
    /// Raw values of the other options typed so far.
    #[serde(default)]
    pub options: RawInputs,
    #[serde(default)]
    pub context: InvocationContext,
}
