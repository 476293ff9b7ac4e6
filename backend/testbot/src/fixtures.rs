//! In-memory platform for the test bot.

use slashforge_config::FixturesConfig;
use slashforge_core::{Channel, ChannelType, Emoji, ForumTag, Snowflake, StaticLookup};
use tracing::info;

/// Guild used by the demo fixtures.
pub const DEMO_GUILD: Snowflake = 1;

/// Seed a lookup from config, or from the demo guild when nothing is configured.
pub fn lookup_from(fixtures: &FixturesConfig) -> StaticLookup {
    if fixtures.channels.is_empty() && fixtures.emojis.is_empty() {
        info!(guild = DEMO_GUILD, "No fixtures configured; serving the demo guild");
        return demo();
    }
    StaticLookup::from_parts(fixtures.channels.iter().cloned(), fixtures.emojis.iter().cloned())
}

fn demo() -> StaticLookup {
    let tag = |id, name: &str| ForumTag {
        id,
        name: name.to_string(),
        moderated: false,
        emoji_name: None,
    };
    let channel = |id, name: &str, kind, available_tags| Channel {
        id,
        guild_id: Some(DEMO_GUILD),
        name: name.to_string(),
        kind,
        available_tags,
    };

    StaticLookup::from_parts(
        [
            channel(10, "general", ChannelType::GuildText, vec![]),
            channel(11, "voice", ChannelType::GuildVoice, vec![]),
            channel(
                30,
                "help",
                ChannelType::GuildForum,
                vec![tag(1001, "Bug"), tag(1002, "Question"), tag(1003, "Feature")],
            ),
        ],
        [Emoji::Guild {
            id: 500,
            guild_id: DEMO_GUILD,
            name: "blob".to_string(),
            animated: false,
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slashforge_core::PlatformLookup;

    #[tokio::test]
    async fn empty_config_serves_demo_guild() {
        let lookup = lookup_from(&FixturesConfig::default());
        let forum = lookup.fetch_channel(30).await.unwrap().unwrap();
        assert_eq!(forum.available_tags.len(), 3);
        assert!(lookup.find_emoji(Some(DEMO_GUILD), "blob").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn configured_fixtures_replace_demo() {
        let fixtures = FixturesConfig {
            guild_id: Some(7),
            channels: vec![Channel {
                id: 99,
                guild_id: Some(7),
                name: "lobby".into(),
                kind: ChannelType::GuildText,
                available_tags: vec![],
            }],
            emojis: vec![],
        };
        let lookup = lookup_from(&fixtures);
        assert!(lookup.fetch_channel(99).await.unwrap().is_some());
        assert!(lookup.fetch_channel(30).await.unwrap().is_none());
    }
}
