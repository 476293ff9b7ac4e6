/// Ordered argument sets and their definition-time checks.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::autocomplete::MAX_SUGGESTIONS;
use crate::field::{FieldBuilder, FieldDescriptor};

/// Platform limit on options per command.
pub const MAX_FIELDS: usize = 25;

/// Platform limit on description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Lowercase names of 1-32 characters.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_-]{1,32}$").unwrap());

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A command or argument declaration the platform would reject, or one the
/// parsing engine could not execute deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("invalid name `{name}`: must be 1-32 lowercase letters, digits, `-` or `_`")]
    InvalidName { name: String },

    #[error("`{name}`: description must be 1-100 characters")]
    InvalidDescription { name: String },

    #[error("duplicate field `{0}`")]
    DuplicateField(String),

    #[error("duplicate command `{0}`")]
    DuplicateCommand(String),

    #[error("field `{field}` depends on unknown field `{dependency}`")]
    UnknownDependency { field: String, dependency: String },

    #[error("field `{field}` depends on `{dependency}`, which is not declared before it")]
    ForwardDependency { field: String, dependency: String },

    #[error("field `{field}` ({converter}) needs a dependency on an earlier field")]
    MissingDependency { field: String, converter: String },

    #[error("field `{field}`: {constraint} cannot apply to {kind} values")]
    IncompatibleConstraint {
        field: String,
        constraint: String,
        kind: String,
    },

    #[error("required field `{0}` is declared after an optional field")]
    RequiredAfterOptional(String),

    #[error("field `{field}` declares {count} choices (max 25)")]
    TooManyChoices { field: String, count: usize },

    #[error("{0} fields declared (max 25)")]
    TooManyFields(usize),

    #[error("command `{0}` has no action")]
    MissingAction(String),
}

pub(crate) fn check_name(name: &str) -> Result<(), DefinitionError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidName {
            name: name.to_string(),
        })
    }
}

pub(crate) fn check_description(name: &str, description: &str) -> Result<(), DefinitionError> {
    let len = description.chars().count();
    if (1..=MAX_DESCRIPTION_LENGTH).contains(&len) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidDescription {
            name: name.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Argument set
// ---------------------------------------------------------------------------

/// Fields in declaration order, which is both parse order and the order in
/// which values become visible to later fields.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSet {
    fields: Vec<FieldDescriptor>,
}

impl ArgumentSet {
    pub fn builder() -> ArgumentSetBuilder {
        ArgumentSetBuilder::default()
    }

    /// A set with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Default)]
pub struct ArgumentSetBuilder {
    fields: Vec<FieldBuilder>,
}

impl ArgumentSetBuilder {
    /// Append a field; declaration order is preserved.
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<ArgumentSet, DefinitionError> {
        if self.fields.len() > MAX_FIELDS {
            return Err(DefinitionError::TooManyFields(self.fields.len()));
        }

        let declared: Vec<String> = self.fields.iter().map(|f| f.name().to_string()).collect();
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(self.fields.len());
        let mut seen_optional = false;

        for builder in self.fields {
            let field = builder.build();
            let result = check_field(&field, &fields, &declared, seen_optional);
            if let Err(err) = result {
                warn!(field = %field.name(), error = %err, "Rejected argument definition");
                return Err(err);
            }
            seen_optional |= !field.required();
            fields.push(field);
        }

        Ok(ArgumentSet { fields })
    }
}

fn check_field(
    field: &FieldDescriptor,
    earlier: &[FieldDescriptor],
    declared: &[String],
    seen_optional: bool,
) -> Result<(), DefinitionError> {
    let name = field.name();
    check_name(name)?;
    check_description(name, field.description())?;
    if earlier.iter().any(|f| f.name() == name) {
        return Err(DefinitionError::DuplicateField(name.to_string()));
    }
    if field.required() && seen_optional {
        return Err(DefinitionError::RequiredAfterOptional(name.to_string()));
    }

    let converter = field.converter();
    let kind = converter.kind();
    if let Some(constraint) = field.constraints().iter().find(|c| !c.applies_to(kind)) {
        return Err(DefinitionError::IncompatibleConstraint {
            field: name.to_string(),
            constraint: constraint.to_string(),
            kind: kind.as_str().to_string(),
        });
    }

    if let Some(count) = converter.choices().map(<[_]>::len) {
        if count > MAX_SUGGESTIONS {
            return Err(DefinitionError::TooManyChoices {
                field: name.to_string(),
                count,
            });
        }
    }

    match field.dependency() {
        Some(dependency) => {
            let target = dependency.field();
            if !earlier.iter().any(|f| f.name() == target) {
                return Err(if declared.iter().any(|d| d == target) {
                    DefinitionError::ForwardDependency {
                        field: name.to_string(),
                        dependency: target.to_string(),
                    }
                } else {
                    DefinitionError::UnknownDependency {
                        field: name.to_string(),
                        dependency: target.to_string(),
                    }
                });
            }
        }
        None if converter.requires_dependency() => {
            return Err(DefinitionError::MissingDependency {
                field: name.to_string(),
                converter: converter.name().to_string(),
            });
        }
        None => {}
    }

    Ok(())
}
