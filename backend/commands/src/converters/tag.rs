use std::sync::Arc;

use async_trait::async_trait;
use slashforge_core::Channel;

use crate::autocomplete::{AutocompleteContext, AutocompleteProvider, Suggestion, matches_partial};
use crate::converter::{ConversionError, ConvertContext, Converter};
use crate::value::{ArgValue, RawValue, ValueKind, raw_display, raw_text};

/// A forum tag, scoped to the channel produced by the field's dependency.
///
/// With no channel in scope there is nothing to match against: conversion
/// fails with a readable reason and autocomplete offers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagConverter;

/// Lists the scoped channel's tags, filtered by what the user has typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSuggestions;

fn scoped_channel(dependency: Option<&ArgValue>) -> Result<&Channel, ConversionError> {
    let channel = dependency
        .and_then(ArgValue::as_channel)
        .ok_or_else(|| ConversionError::Rejected("no forum channel selected".into()))?;
    if !channel.kind.has_tags() {
        return Err(ConversionError::Rejected(format!(
            "{} is not a forum channel",
            channel.mention()
        )));
    }
    Ok(channel)
}

#[async_trait]
impl Converter for TagConverter {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Tag
    }

    async fn convert(
        &self,
        raw: &RawValue,
        ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError> {
        let channel = scoped_channel(ctx.dependency.as_ref())?;
        let text = raw_text(raw).unwrap_or_else(|| raw_display(raw));
        let wanted = text.trim();
        let id: Option<u64> = wanted.parse().ok();
        let lowered = wanted.to_lowercase();

        channel
            .available_tags
            .iter()
            .find(|t| Some(t.id) == id)
            .or_else(|| channel.available_tags.iter().find(|t| t.name.to_lowercase() == lowered))
            .cloned()
            .map(ArgValue::Tag)
            .ok_or_else(|| {
                ConversionError::NotFound(format!("tag `{wanted}` in {}", channel.mention()))
            })
    }

    fn requires_dependency(&self) -> bool {
        true
    }

    fn default_autocomplete(&self) -> Option<Arc<dyn AutocompleteProvider>> {
        Some(Arc::new(TagSuggestions))
    }
}

#[async_trait]
impl AutocompleteProvider for TagSuggestions {
    async fn suggest(&self, ctx: &AutocompleteContext<'_>) -> Vec<Suggestion> {
        let Ok(channel) = scoped_channel(ctx.dependency.as_ref()) else {
            return Vec::new();
        };
        channel
            .available_tags
            .iter()
            .filter(|t| matches_partial(&t.name, ctx.partial))
            .map(|t| Suggestion::new(&t.name, t.id.to_string()))
            .collect()
    }
}
