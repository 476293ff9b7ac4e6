use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use slashforge_core::Emoji;

use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display, raw_text};

/// `<:name:id>` or `<a:name:id>`.
static MENTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<a?:([A-Za-z0-9_]{2,32}):(\d+)>$").unwrap());

/// `:name:` shortcode for a custom emoji.
static SHORTCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([A-Za-z0-9_]{2,32}):$").unwrap());

/// Combining keycap, as in `1️⃣`.
const KEYCAP: char = '\u{20e3}';

/// Custom guild emoji (mention, id or `:name:`) or a Unicode emoji literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiConverter;

#[async_trait]
impl Converter for EmojiConverter {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Emoji
    }

    async fn convert(
        &self,
        raw: &RawValue,
        ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let text = raw_text(raw).unwrap_or_else(|| raw_display(raw));
        let text = text.trim();

        if let Some(caps) = MENTION_PATTERN.captures(text) {
            let id = caps[2]
                .parse()
                .map_err(|_| ConversionError::invalid("an emoji", text))?;
            return fetch_by_id(ctx, id, text).await;
        }

        if let Ok(id) = text.parse() {
            return fetch_by_id(ctx, id, text).await;
        }

        if let Some(caps) = SHORTCODE_PATTERN.captures(text) {
            return ctx
                .lookup
                .find_emoji(ctx.invocation.guild_id, &caps[1])
                .await?
                .map(ArgValue::Emoji)
                .ok_or_else(|| ConversionError::NotFound(format!("emoji `{text}`")));
        }

        if is_unicode_emoji(text) {
            return Ok(ArgValue::Emoji(Emoji::Unicode {
                name: text.to_string(),
            }));
        }

        Err(ConversionError::invalid("a custom or Unicode emoji", text))
    }
}

async fn fetch_by_id(
    ctx: &ConvertContext<'_>,
    id: u64,
    text: &str,
) -> Result<ArgValue, ConversionError> {
    ctx.lookup
        .fetch_emoji(id)
        .await?
        .map(ArgValue::Emoji)
        .ok_or_else(|| ConversionError::NotFound(format!("emoji `{text}`")))
}

/// Loose check: no letters, digits or whitespace outside of keycap sequences.
fn is_unicode_emoji(text: &str) -> bool {
    if text.is_empty() || text.chars().count() > 16 {
        return false;
    }
    if text.contains(KEYCAP) {
        return true;
    }
    text.chars()
        .all(|c| !c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}
