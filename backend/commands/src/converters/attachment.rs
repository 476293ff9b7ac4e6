use async_trait::async_trait;

use super::parse_snowflake;
use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display, raw_text};

/// Resolves an attachment id against the files uploaded with the interaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentConverter;

#[async_trait]
impl Converter for AttachmentConverter {
    fn name(&self) -> &'static str {
        "attachment"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Attachment
    }

    async fn convert(
        &self,
        raw: &RawValue,
        ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let text = raw_text(raw).unwrap_or_else(|| raw_display(raw));
        let id = parse_snowflake(&text, "")
            .ok_or_else(|| ConversionError::invalid("an attachment id", text.clone()))?;

        ctx.invocation
            .attachments
            .get(&id)
            .cloned()
            .map(ArgValue::Attachment)
            .ok_or_else(|| ConversionError::NotFound(format!("attachment `{id}`")))
    }
}
