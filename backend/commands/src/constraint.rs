/// Post-conversion validation rules.
use std::collections::BTreeSet;
use std::fmt;

use slashforge_core::ChannelType;
use thiserror::Error;

use crate::value::{ArgValue, ValueKind};

/// A pure predicate over a converted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    MinValue(f64),
    MaxValue(f64),
    ChannelTypeIn(BTreeSet<ChannelType>),
    ChoiceIn(Vec<String>),
}

/// A value failed a constraint after converting cleanly.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct ConstraintViolation {
    pub constraint: Constraint,
    pub reason: String,
}

impl Constraint {
    /// Whether this constraint can meaningfully apply to values of `kind`.
    /// Checked once when the argument set is built.
    pub fn applies_to(&self, kind: ValueKind) -> bool {
        match self {
            Self::MinLength(_) | Self::MaxLength(_) | Self::ChoiceIn(_) => kind.is_textual(),
            Self::MinValue(_) | Self::MaxValue(_) => kind.is_numeric(),
            Self::ChannelTypeIn(_) => kind == ValueKind::Channel,
        }
    }

    /// Values of a kind the constraint does not apply to pass trivially.
    pub fn check(&self, value: &ArgValue) -> Result<(), ConstraintViolation> {
        let reason = match (self, value) {
            (Self::MinLength(min), ArgValue::String(s)) => {
                let len = s.chars().count();
                (len < *min).then(|| format!("must be at least {min} characters long (got {len})"))
            }
            (Self::MaxLength(max), ArgValue::String(s)) => {
                let len = s.chars().count();
                (len > *max).then(|| format!("must be at most {max} characters long (got {len})"))
            }
            (Self::MinValue(min), v) if v.kind().is_numeric() => v
                .as_f64()
                .filter(|n| n < min)
                .map(|n| format!("must be at least {min} (got {n})")),
            (Self::MaxValue(max), v) if v.kind().is_numeric() => v
                .as_f64()
                .filter(|n| n > max)
                .map(|n| format!("must be at most {max} (got {n})")),
            (Self::ChannelTypeIn(allowed), ArgValue::Channel(channel)) => {
                (!allowed.contains(&channel.kind)).then(|| {
                    format!(
                        "{} is a {} channel; expected {}",
                        channel.mention(),
                        channel.kind,
                        join(allowed.iter())
                    )
                })
            }
            (Self::ChoiceIn(choices), ArgValue::String(s)) => (!choices.contains(s))
                .then(|| format!("`{s}` is not one of: {}", choices.join(", "))),
            _ => None,
        };

        match reason {
            Some(reason) => Err(ConstraintViolation { constraint: self.clone(), reason }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinLength(n) => write!(f, "MinLength({n})"),
            Self::MaxLength(n) => write!(f, "MaxLength({n})"),
            Self::MinValue(n) => write!(f, "MinValue({n})"),
            Self::MaxValue(n) => write!(f, "MaxValue({n})"),
            Self::ChannelTypeIn(types) => write!(f, "ChannelTypeIn({})", join(types.iter())),
            Self::ChoiceIn(choices) => write!(f, "ChoiceIn({})", choices.join(", ")),
        }
    }
}

fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

/// Run every constraint in order, stopping at the first violation.
pub fn validate(value: &ArgValue, constraints: &[Constraint]) -> Result<(), ConstraintViolation> {
    constraints.iter().try_for_each(|c| c.check(value))
}
