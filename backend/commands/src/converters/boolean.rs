use async_trait::async_trait;
use serde_json::Value;

use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display};

/// Booleans, including the usual yes/no spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

#[async_trait]
impl Converter for BooleanConverter {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Boolean
    }

    async fn convert(
        &self,
        raw: &RawValue,
        _ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let parsed = match raw {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            Value::Number(n) => match n.as_u64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed
            .map(ArgValue::Boolean)
            .ok_or_else(|| ConversionError::invalid("yes or no", raw_display(raw)))
    }
}
