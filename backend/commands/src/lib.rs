//! Slash-command argument pipeline: typed fields, converters, constraints,
//! ordered parsing with cancellation and dependency-aware autocomplete.

pub mod arguments;
pub mod autocomplete;
pub mod command;
pub mod constraint;
pub mod converter;
pub mod converters;
pub mod dispatch;
pub mod field;
pub mod interaction;
pub mod outcome;
pub mod parser;
pub mod registry;
pub mod resolved;
pub mod value;

pub use arguments::{ArgumentSet, ArgumentSetBuilder, DefinitionError, MAX_FIELDS};
pub use autocomplete::{
    AutocompleteContext, AutocompleteProvider, AutocompleteRequest, AutocompleteResolver,
    MAX_SUGGESTIONS, Suggestion, suggest_string_collection, suggest_string_map, suggest_strings,
    suggest_with,
};
pub use command::{
    ActionContext, CommandAction, CommandBuilder, CommandDefinition, CommandOutcome,
    CommandResponse, action_fn,
};
pub use constraint::{Constraint, ConstraintViolation};
pub use converter::{Choice, ConversionError, ConvertContext, Converter};
pub use dispatch::{CommandDispatcher, DispatchError, DispatchSettings};
pub use field::{FieldBuilder, FieldDescriptor};
pub use interaction::{AutocompleteInteraction, CommandInteraction, InvocationContext};
pub use outcome::ParseOutcome;
pub use parser::ParseEngine;
pub use registry::{CommandRegistry, CommandSummary};
pub use resolved::ResolvedValues;
pub use value::{ArgValue, RawInputs, ValueKind};
