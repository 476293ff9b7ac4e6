/// The converter capability: one raw option value in, one typed value out.
///
/// The parsing engine only ever talks to `dyn Converter`; new kinds are added
/// by implementing the trait.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use slashforge_core::{ForgeError, PlatformLookup};
use thiserror::Error;

use crate::autocomplete::AutocompleteProvider;
use crate::interaction::InvocationContext;
use crate::resolved::ResolvedValues;
use crate::value::{ArgValue, RawValue, ValueKind};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a converter may consult while converting one field.
pub struct ConvertContext<'a> {
    /// Name of the field being converted.
    pub field: &'a str,
    /// Snapshot of fields declared before this one.
    pub resolved: &'a ResolvedValues,
    /// Output of the field's dependency accessor, if it has one.
    pub dependency: Option<ArgValue>,
    pub invocation: &'a InvocationContext,
    pub lookup: &'a dyn PlatformLookup,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("expected {expected}, got `{raw}`")]
    InvalidFormat { expected: &'static str, raw: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Rejected(String),

    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl ConversionError {
    pub fn invalid(expected: &'static str, raw: impl Into<String>) -> Self {
        Self::InvalidFormat {
            expected,
            raw: raw.into(),
        }
    }
}

impl From<ForgeError> for ConversionError {
    fn from(err: ForgeError) -> Self {
        Self::Lookup(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

/// A fixed option: `label` is shown to the user, `value` is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Converter: Send + Sync + fmt::Debug {
    /// Short name used in definitions and messages, e.g. `"channel"`.
    fn name(&self) -> &'static str;

    /// Kind of value this converter produces.
    fn kind(&self) -> ValueKind;

    /// Convert one raw value. Lookups are attempted once; the caller
    /// drops the future on cancellation.
    async fn convert(
        &self,
        raw: &RawValue,
        ctx: &ConvertContext<'_>,
    ) -> Result<ArgValue, ConversionError>;

    /// Fixed choices offered to the platform, if any.
    fn choices(&self) -> Option<&[Choice]> {
        None
    }

    /// Whether the field must declare a dependency accessor.
    fn requires_dependency(&self) -> bool {
        false
    }

    /// Provider used when the field declares none of its own.
    fn default_autocomplete(&self) -> Option<Arc<dyn AutocompleteProvider>> {
        None
    }
}
