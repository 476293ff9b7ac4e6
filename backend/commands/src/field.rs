//! Field descriptors and the builder used to declare them.
//!
//! ```ignore
//! let name = FieldBuilder::string("name")
//!     .description("The user's name.")
//!     .min_length(3)
//!     .max_length(10);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use slashforge_core::ChannelType;

use crate::autocomplete::AutocompleteProvider;
use crate::constraint::Constraint;
use crate::converter::{Choice, Converter};
use crate::converters::{
    AttachmentConverter, BooleanConverter, ChannelConverter, EmojiConverter, IntegerConverter,
    NumberConverter, StringChoiceConverter, StringConverter, TagConverter,
};
use crate::resolved::ResolvedValues;
use crate::value::ArgValue;

/// Reads a value for this field out of the snapshot of earlier fields.
pub type DependencyAccessor = Arc<dyn Fn(&ResolvedValues) -> Option<ArgValue> + Send + Sync>;

// ---------------------------------------------------------------------------
// Dependency
// ---------------------------------------------------------------------------

/// A reference to an earlier sibling field.
#[derive(Clone)]
pub struct Dependency {
    field: String,
    accessor: DependencyAccessor,
}

impl Dependency {
    /// Name of the field this dependency reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// `None` when the referenced field was absent or failed to parse.
    pub fn resolve(&self, resolved: &ResolvedValues) -> Option<ArgValue> {
        (self.accessor)(resolved)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency").field("field", &self.field).finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Immutable description of one argument. Built through [`FieldBuilder`].
#[derive(Clone)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) required: bool,
    pub(crate) converter: Arc<dyn Converter>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) dependency: Option<Dependency>,
    pub(crate) autocomplete: Option<Arc<dyn AutocompleteProvider>>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn converter(&self) -> &dyn Converter {
        self.converter.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    /// The field's own provider, or its converter's default.
    pub fn autocomplete(&self) -> Option<&Arc<dyn AutocompleteProvider>> {
        self.autocomplete.as_ref()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("converter", &self.converter.name())
            .field("constraints", &self.constraints)
            .field("dependency", &self.dependency)
            .field("autocomplete", &self.autocomplete.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Declares one field. Fields are required unless [`FieldBuilder::optional`]
/// is called.
pub struct FieldBuilder {
    name: String,
    description: String,
    required: bool,
    converter: Arc<dyn Converter>,
    constraints: Vec<Constraint>,
    dependency: Option<Dependency>,
    autocomplete: Option<Arc<dyn AutocompleteProvider>>,
}

impl FieldBuilder {
    /// Start a field backed by any converter.
    pub fn new(name: impl Into<String>, converter: impl Converter + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: true,
            converter: Arc::new(converter),
            constraints: Vec::new(),
            dependency: None,
            autocomplete: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, StringConverter)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, IntegerConverter)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, NumberConverter)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, BooleanConverter)
    }

    /// A string limited to `(label, value)` choices.
    pub fn string_choice<I, L, V>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        let choices: Vec<Choice> = choices.into_iter().map(|(l, v)| Choice::new(l, v)).collect();
        let values = choices.iter().map(|c| c.value.clone()).collect();
        Self::new(name, StringChoiceConverter::new(choices))
            .constraint(Constraint::ChoiceIn(values))
    }

    pub fn channel(name: impl Into<String>) -> Self {
        Self::new(name, ChannelConverter::new())
    }

    pub fn attachment(name: impl Into<String>) -> Self {
        Self::new(name, AttachmentConverter)
    }

    pub fn emoji(name: impl Into<String>) -> Self {
        Self::new(name, EmojiConverter)
    }

    /// A forum tag. Needs a dependency on an earlier channel field.
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(name, TagConverter)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn min_length(self, min: usize) -> Self {
        self.constraint(Constraint::MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.constraint(Constraint::MaxLength(max))
    }

    pub fn min_value(self, min: f64) -> Self {
        self.constraint(Constraint::MinValue(min))
    }

    pub fn max_value(self, max: f64) -> Self {
        self.constraint(Constraint::MaxValue(max))
    }

    /// Restrict a channel field to the given type. Repeated calls widen the
    /// permitted set.
    pub fn require_channel_type(mut self, kind: ChannelType) -> Self {
        let existing = self.constraints.iter_mut().find_map(|c| match c {
            Constraint::ChannelTypeIn(types) => Some(types),
            _ => None,
        });
        if let Some(types) = existing {
            types.insert(kind);
        } else {
            self.constraints.push(Constraint::ChannelTypeIn(BTreeSet::from([kind])));
        }
        self
    }

    /// Depend on the value of an earlier field, as-is.
    pub fn depends_on(self, field: impl Into<String>) -> Self {
        let field = field.into();
        let key = field.clone();
        self.depends_on_with(field, move |resolved| resolved.get(&key).cloned())
    }

    /// Depend on an earlier field through a custom accessor.
    pub fn depends_on_with<F>(mut self, field: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&ResolvedValues) -> Option<ArgValue> + Send + Sync + 'static,
    {
        self.dependency = Some(Dependency {
            field: field.into(),
            accessor: Arc::new(accessor),
        });
        self
    }

    pub fn autocomplete(mut self, provider: impl AutocompleteProvider + 'static) -> Self {
        self.autocomplete = Some(Arc::new(provider));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn build(self) -> FieldDescriptor {
        let autocomplete = self.autocomplete.or_else(|| self.converter.default_autocomplete());
        FieldDescriptor {
            name: self.name,
            description: self.description,
            required: self.required,
            converter: self.converter,
            constraints: self.constraints,
            dependency: self.dependency,
            autocomplete,
        }
    }
}
