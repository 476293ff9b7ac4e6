use async_trait::async_trait;

use crate::converter::{Choice, ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display, raw_text};

/// One of a fixed set of string choices.
///
/// The platform submits the choice value; typed text may also name a label.
#[derive(Debug, Clone)]
pub struct StringChoiceConverter {
    choices: Vec<Choice>,
}

impl StringChoiceConverter {
    pub fn new(choices: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }

    fn labels(&self) -> String {
        self.choices.iter().map(|c| c.label.as_str()).collect::<Vec<_>>().join(", ")
    }
}

#[async_trait]
impl Converter for StringChoiceConverter {
    fn name(&self) -> &'static str {
        "string choice"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Text
    }

    async fn convert(
        &self,
        raw: &RawValue,
        _ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let text = raw_text(raw)
            .ok_or_else(|| ConversionError::invalid("a choice", raw_display(raw)))?;

        let matched = self
            .choices
            .iter()
            .find(|c| c.value == text)
            .or_else(|| {
                let lowered = text.to_lowercase();
                self.choices.iter().find(|c| c.label.to_lowercase() == lowered)
            });

        match matched {
            Some(choice) => Ok(ArgValue::String(choice.value.clone())),
            None => Err(ConversionError::Rejected(format!(
                "`{text}` is not one of: {}",
                self.labels()
            ))),
        }
    }

    fn choices(&self) -> Option<&[Choice]> {
        Some(&self.choices)
    }
}
