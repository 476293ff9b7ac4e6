//! Autocomplete: providers, the built-in filtering shapes and the resolver.
//!
//! The resolver holds no state between requests. Superseding stale requests
//! is the dispatcher's concern.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use slashforge_core::{CancelToken, PlatformLookup};
use tracing::{debug, warn};

use crate::arguments::ArgumentSet;
use crate::interaction::InvocationContext;
use crate::resolved::ResolvedValues;
use crate::value::ArgValue;

/// Platform limit on suggestions per response.
pub const MAX_SUGGESTIONS: usize = 25;

/// Platform limit on a suggestion's label and value length, in characters.
pub const MAX_SUGGESTION_LENGTH: usize = 100;

/// Default time budget for a provider to answer.
pub const DEFAULT_AUTOCOMPLETE_DEADLINE: Duration = Duration::from_millis(2_500);

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub value: String,
}

impl Suggestion {
    /// Build a suggestion, truncating both parts to the platform limit.
    pub fn new(label: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        Self {
            label: truncate(label.as_ref()),
            value: truncate(value.as_ref()),
        }
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_SUGGESTION_LENGTH).collect()
}

// ---------------------------------------------------------------------------
// Provider contract
// ---------------------------------------------------------------------------

/// What a provider gets to look at.
pub struct AutocompleteContext<'a> {
    pub field: &'a str,
    /// Text typed so far in the focused option.
    pub partial: &'a str,
    /// Fields before the focused one that parsed successfully.
    pub prior: &'a ResolvedValues,
    /// Output of the focused field's dependency accessor.
    pub dependency: Option<ArgValue>,
    pub invocation: &'a InvocationContext,
    pub lookup: &'a dyn PlatformLookup,
}

#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
    async fn suggest(&self, ctx: &AutocompleteContext<'_>) -> Vec<Suggestion>;
}

/// Case-insensitive substring containment. Empty input matches everything.
pub fn matches_partial(candidate: &str, partial: &str) -> bool {
    partial.is_empty() || candidate.to_lowercase().contains(&partial.to_lowercase())
}

/// Filter plain strings by `partial`; each string is its own label and value.
pub fn suggest_strings<I, S>(items: I, partial: &str) -> Vec<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter(|item| matches_partial(item.as_ref(), partial))
        .map(|item| Suggestion::new(item.as_ref(), item.as_ref()))
        .collect()
}

// ---------------------------------------------------------------------------
// Built-in providers
// ---------------------------------------------------------------------------

/// Static collection filtered by substring.
#[derive(Debug, Clone)]
pub struct StringCollection {
    items: Vec<String>,
}

/// Keys shown as labels, filtered by substring on the key; the mapped value
/// is what gets submitted.
#[derive(Debug, Clone)]
pub struct StringMap {
    entries: Vec<(String, String)>,
}

/// Wraps a plain function over the autocomplete context.
pub struct FnProvider<F>(F);

pub fn suggest_string_collection<I, S>(items: I) -> StringCollection
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StringCollection {
        items: items.into_iter().map(Into::into).collect(),
    }
}

pub fn suggest_string_map<I, K, V>(entries: I) -> StringMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    StringMap {
        entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
}

pub fn suggest_with<F>(f: F) -> FnProvider<F>
where
    F: Fn(&AutocompleteContext<'_>) -> Vec<Suggestion> + Send + Sync,
{
    FnProvider(f)
}

#[async_trait]
impl AutocompleteProvider for StringCollection {
    async fn suggest(&self, ctx: &AutocompleteContext<'_>) -> Vec<Suggestion> {
        suggest_strings(&self.items, ctx.partial)
    }
}

#[async_trait]
impl AutocompleteProvider for StringMap {
    async fn suggest(&self, ctx: &AutocompleteContext<'_>) -> Vec<Suggestion> {
        self.entries
            .iter()
            .filter(|(key, _)| matches_partial(key, ctx.partial))
            .map(|(key, value)| Suggestion::new(key, value))
            .collect()
    }
}

#[async_trait]
impl<F> AutocompleteProvider for FnProvider<F>
where
    F: Fn(&AutocompleteContext<'_>) -> Vec<Suggestion> + Send + Sync,
{
    async fn suggest(&self, ctx: &AutocompleteContext<'_>) -> Vec<Suggestion> {
        (self.0)(ctx)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// One autocomplete request after prior fields have been parsed.
#[derive(Debug, Clone)]
pub struct AutocompleteRequest {
    pub focused_field: String,
    pub partial: String,
    pub prior: ResolvedValues,
}

/// Runs the focused field's provider under a deadline and applies the cap.
#[derive(Debug, Clone)]
pub struct AutocompleteResolver {
    cap: usize,
    deadline: Duration,
}

impl Default for AutocompleteResolver {
    fn default() -> Self {
        Self {
            cap: MAX_SUGGESTIONS,
            deadline: DEFAULT_AUTOCOMPLETE_DEADLINE,
        }
    }
}

impl AutocompleteResolver {
    /// `cap` is clamped to the platform maximum.
    pub fn new(cap: usize, deadline: Duration) -> Self {
        Self {
            cap: cap.min(MAX_SUGGESTIONS),
            deadline,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Never fails: unknown fields, fields without a provider, providers
    /// that miss the deadline and cancelled requests all yield an empty list.
    ///
    /// The provider races `cancel` as well as the resolver's own deadline, so
    /// an outer budget that expires first cuts it short.
    pub async fn resolve(
        &self,
        arguments: &ArgumentSet,
        request: &AutocompleteRequest,
        invocation: &InvocationContext,
        lookup: &dyn PlatformLookup,
        cancel: &CancelToken,
    ) -> Vec<Suggestion> {
        let Some(field) = arguments.field(&request.focused_field) else {
            debug!(field = %request.focused_field, "Autocomplete for unknown field");
            return Vec::new();
        };
        let Some(provider) = field.autocomplete() else {
            debug!(field = %field.name(), "Field has no autocomplete provider");
            return Vec::new();
        };

        let ctx = AutocompleteContext {
            field: field.name(),
            partial: &request.partial,
            prior: &request.prior,
            dependency: field.dependency().and_then(|d| d.resolve(&request.prior)),
            invocation,
            lookup,
        };

        let answer = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(field = %field.name(), "Autocomplete cancelled before the provider answered");
                return Vec::new();
            }
            answer = tokio::time::timeout(self.deadline, provider.suggest(&ctx)) => answer,
        };

        match answer {
            Ok(mut suggestions) => {
                if suggestions.len() > self.cap {
                    debug!(
                        field = %field.name(),
                        offered = suggestions.len(),
                        cap = self.cap,
                        "Truncating suggestions"
                    );
                    suggestions.truncate(self.cap);
                }
                suggestions
            }
            Err(_) => {
                warn!(
                    field = %field.name(),
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Autocomplete provider missed its deadline"
                );
                Vec::new()
            }
        }
    }
}
