//! Built-in converter kinds.

mod attachment;
mod boolean;
mod channel;
mod choice;
mod emoji;
mod numeric;
mod tag;
mod text;

pub use attachment::AttachmentConverter;
pub use boolean::BooleanConverter;
pub use channel::ChannelConverter;
pub use choice::StringChoiceConverter;
pub use emoji::EmojiConverter;
pub use numeric::{IntegerConverter, NumberConverter};
pub use tag::{TagConverter, TagSuggestions};
pub use text::StringConverter;

use slashforge_core::Snowflake;

/// Parse a bare id or a `<prefix...id>` style mention.
pub(crate) fn parse_snowflake(text: &str, mention_prefix: &str) -> Option<Snowflake> {
    let text = text.trim();
    let inner = text
        .strip_prefix(mention_prefix)
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(text);
    inner.parse().ok()
}
