//! Platform entities that converters resolve raw identifiers into.
//!
//! These are plain data snapshots; nothing here talks to the platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform-wide numeric identifier.
pub type Snowflake = u64;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Channel kinds as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildDirectory,
    GuildForum,
    GuildMedia,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuildText => "guild_text",
            Self::Dm => "dm",
            Self::GuildVoice => "guild_voice",
            Self::GroupDm => "group_dm",
            Self::GuildCategory => "guild_category",
            Self::GuildAnnouncement => "guild_announcement",
            Self::AnnouncementThread => "announcement_thread",
            Self::PublicThread => "public_thread",
            Self::PrivateThread => "private_thread",
            Self::GuildStageVoice => "guild_stage_voice",
            Self::GuildDirectory => "guild_directory",
            Self::GuildForum => "guild_forum",
            Self::GuildMedia => "guild_media",
        }
    }

    /// Whether channels of this type carry forum tags.
    pub fn has_tags(&self) -> bool {
        matches!(self, Self::GuildForum | Self::GuildMedia)
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag that can be applied to posts in a forum or media channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumTag {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub moderated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    /// Only populated for forum and media channels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_tags: Vec<ForumTag>,
}

impl Channel {
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// A file uploaded alongside an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Emoji
// ---------------------------------------------------------------------------

/// Either a custom guild emoji or a plain Unicode emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Emoji {
    #[serde(rename_all = "camelCase")]
    Guild {
        id: Snowflake,
        guild_id: Snowflake,
        name: String,
        #[serde(default)]
        animated: bool,
    },
    Unicode { name: String },
}

impl Emoji {
    pub fn name(&self) -> &str {
        match self {
            Self::Guild { name, .. } | Self::Unicode { name } => name,
        }
    }

    /// Text that renders the emoji inline in a message.
    pub fn mention(&self) -> String {
        match self {
            Self::Guild { id, name, animated: true, .. } => format!("<a:{name}:{id}>"),
            Self::Guild { id, name, .. } => format!("<:{name}:{id}>"),
            Self::Unicode { name } => name.clone(),
        }
    }

    pub fn is_guild(&self) -> bool {
        matches!(self, Self::Guild { .. })
    }
}
