use async_trait::async_trait;
use tracing::debug;

use super::parse_snowflake;
use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display, raw_text};

/// Resolves a channel mention (`<#id>`) or id through the platform lookup.
///
/// Channel-type restrictions are expressed as a `ChannelTypeIn` constraint
/// on the field, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelConverter {
    allow_other_guilds: bool,
}

impl ChannelConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept channels outside the guild the command was invoked in.
    pub fn allow_other_guilds(mut self) -> Self {
        self.allow_other_guilds = true;
        self
    }
}

#[async_trait]
impl Converter for ChannelConverter {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Channel
    }

    async fn convert(
        &self,
        raw: &RawValue,
        ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let text = raw_text(raw).unwrap_or_else(|| raw_display(raw));
        let id = parse_snowflake(&text, "<#")
            .ok_or_else(|| ConversionError::invalid("a channel mention or id", text.clone()))?;

        debug!(field = ctx.field, channel_id = id, "Looking up channel");
        let channel = ctx
            .lookup
            .fetch_channel(id)
            .await?
            .ok_or_else(|| ConversionError::NotFound(format!("channel `{text}`")))?;

        if !self.allow_other_guilds {
            if let Some(guild) = ctx.invocation.guild_id {
                if channel.guild_id != Some(guild) {
                    return Err(ConversionError::Rejected(
                        "that channel belongs to a different server".into(),
                    ));
                }
            }
        }

        Ok(ArgValue::Channel(channel))
    }
}
