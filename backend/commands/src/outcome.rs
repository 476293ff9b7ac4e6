/// Result of running an argument set against raw input.
use std::fmt;

use crate::constraint::ConstraintViolation;
use crate::converter::ConversionError;
use crate::resolved::ResolvedValues;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Success(ResolvedValues),
    MissingRequired(String),
    ConversionFailed {
        field: String,
        reason: ConversionError,
    },
    ConstraintViolated {
        field: String,
        violation: ConstraintViolation,
    },
    /// The outer context cancelled; `field` is the one in flight, if any.
    Cancelled { field: Option<String> },
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The field a failure refers to.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::MissingRequired(field)
            | Self::ConversionFailed { field, .. }
            | Self::ConstraintViolated { field, .. } => Some(field),
            Self::Cancelled { field } => field.as_deref(),
        }
    }

    /// User-facing explanation of a failure, naming the offending field.
    pub fn failure_message(&self) -> Option<String> {
        let message = match self {
            Self::Success(_) => return None,
            Self::MissingRequired(field) => format!("Missing required argument `{field}`."),
            Self::ConversionFailed { field, reason } => {
                format!("Invalid value for `{field}`: {reason}.")
            }
            Self::ConstraintViolated { field, violation } => {
                format!("Invalid value for `{field}`: {violation}.")
            }
            Self::Cancelled { .. } => {
                "This command took too long to process its arguments; please try again.".to_string()
            }
        };
        Some(message)
    }

    pub fn into_values(self) -> Option<ResolvedValues> {
        match self {
            Self::Success(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(values) => write!(f, "parsed {} argument(s)", values.len()),
            failure => f.write_str(&failure.failure_message().unwrap_or_default()),
        }
    }
}
