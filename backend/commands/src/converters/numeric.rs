use async_trait::async_trait;
use serde_json::Value;

use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display};

/// Whole numbers (`i64`).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

/// Finite decimal numbers (`f64`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberConverter;

#[async_trait]
impl Converter for IntegerConverter {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    async fn convert(
        &self,
        raw: &RawValue,
        _ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let parsed = match raw {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed
            .map(ArgValue::Integer)
            .ok_or_else(|| ConversionError::invalid("a whole number", raw_display(raw)))
    }
}

#[async_trait]
impl Converter for NumberConverter {
    fn name(&self) -> &'static str {
        "number"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Number
    }

    async fn convert(
        &self,
        raw: &RawValue,
        _ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let parsed = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|n| n.is_finite())
            .map(ArgValue::Number)
            .ok_or_else(|| ConversionError::invalid("a number", raw_display(raw)))
    }
}
