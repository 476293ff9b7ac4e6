use async_trait::async_trait;

use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display, raw_text};

/// Plain text. Numbers and booleans are accepted in their text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

#[async_trait]
impl Converter for StringConverter {
    fn name(&self) -> &'static str {
        "string"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Text
    }

    async fn convert(
        &self,
        raw: &RawValue,
        _ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        raw_text(raw)
            .map(ArgValue::String)
            .ok_or_else(|| ConversionError::invalid("text", raw_display(raw)))
    }
}
