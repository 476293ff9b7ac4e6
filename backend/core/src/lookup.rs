use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::entity::{Channel, Emoji, Snowflake};
use crate::error::ForgeError;

/// Entity lookups against the chat platform.
///
/// `Ok(None)` means the platform answered and the entity does not exist.
/// Implementations make a single attempt; retrying is their own business.
#[async_trait]
pub trait PlatformLookup: Send + Sync {
    async fn fetch_channel(&self, id: Snowflake) -> Result<Option<Channel>, ForgeError>;

    /// Fetch a custom emoji by id from any guild the bot can see.
    async fn fetch_emoji(&self, id: Snowflake) -> Result<Option<Emoji>, ForgeError>;

    /// Find a custom emoji by name, restricted to `guild_id` when given.
    async fn find_emoji(
        &self,
        guild_id: Option<Snowflake>,
        name: &str,
    ) -> Result<Option<Emoji>, ForgeError>;
}

/// In-memory platform used by the test bot and unit tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    channels: HashMap<Snowflake, Channel>,
    emojis: Vec<Emoji>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        channels: impl IntoIterator<Item = Channel>,
        emojis: impl IntoIterator<Item = Emoji>,
    ) -> Self {
        let channels: HashMap<_, _> = channels.into_iter().map(|c| (c.id, c)).collect();
        let emojis: Vec<_> = emojis.into_iter().filter(Emoji::is_guild).collect();
        debug!(channels = channels.len(), emojis = emojis.len(), "Static lookup seeded");
        Self { channels, emojis }
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.id, channel);
        self
    }

    pub fn with_emoji(mut self, emoji: Emoji) -> Self {
        if emoji.is_guild() {
            self.emojis.push(emoji);
        }
        self
    }
}

#[async_trait]
impl PlatformLookup for StaticLookup {
    async fn fetch_channel(&self, id: Snowflake) -> Result<Option<Channel>, ForgeError> {
        Ok(self.channels.get(&id).cloned())
    }

    async fn fetch_emoji(&self, id: Snowflake) -> Result<Option<Emoji>, ForgeError> {
        Ok(self
            .emojis
            .iter()
            .find(|e| matches!(e, Emoji::Guild { id: eid, .. } if *eid == id))
            .cloned())
    }

    async fn find_emoji(
        &self,
        guild_id: Option<Snowflake>,
        name: &str,
    ) -> Result<Option<Emoji>, ForgeError> {
        Ok(self
            .emojis
            .iter()
            .find(|e| match e {
                Emoji::Guild { guild_id: gid, name: n, .. } => {
                    n == name && guild_id.map_or(true, |g| g == *gid)
                }
                Emoji::Unicode { .. } => false,
            })
            .cloned())
    }
}
