/// Typed argument values and the raw payload shapes they are converted from.
use serde_json::Value;
use slashforge_core::{Attachment, Channel, Emoji, ForumTag};

/// Raw option value as delivered by the platform (string, number or bool).
pub type RawValue = Value;

/// Raw option values keyed by field name. Unknown keys are ignored.
pub type RawInputs = serde_json::Map<String, Value>;

/// The family a converted value belongs to.
///
/// Used at definition time to reject constraints that cannot apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Integer,
    Number,
    Boolean,
    Channel,
    Attachment,
    Emoji,
    Tag,
}

impl ValueKind {
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Channel => "channel",
            Self::Attachment => "attachment",
            Self::Emoji => "emoji",
            Self::Tag => "tag",
        }
    }
}

/// A converted, strongly-typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Channel(Channel),
    Attachment(Attachment),
    Emoji(Emoji),
    Tag(ForumTag),
}

impl ArgValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::Number(_) => ValueKind::Number,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Channel(_) => ValueKind::Channel,
            Self::Attachment(_) => ValueKind::Attachment,
            Self::Emoji(_) => ValueKind::Emoji,
            Self::Tag(_) => ValueKind::Tag,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of integer and number values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&Channel> {
        match self {
            Self::Channel(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_attachment(&self) -> Option<&Attachment> {
        match self {
            Self::Attachment(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_emoji(&self) -> Option<&Emoji> {
        match self {
            Self::Emoji(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&ForumTag> {
        match self {
            Self::Tag(t) => Some(t),
            _ => None,
        }
    }
}

/// Text view of a primitive raw value. Arrays, objects and null have none.
pub fn raw_text(raw: &RawValue) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short human-readable rendering of a raw value for error messages.
pub(crate) fn raw_display(raw: &RawValue) -> String {
    raw_text(raw).unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_text_stringifies_primitives_only() {
        assert_eq!(raw_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(raw_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(raw_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(raw_text(&json!([1, 2])), None);
        assert_eq!(raw_text(&Value::Null), None);
    }

    #[test]
    fn numeric_view_covers_both_number_kinds() {
        assert_eq!(ArgValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(ArgValue::Number(2.5).as_f64(), Some(2.5));
        assert_eq!(ArgValue::String("3".into()).as_f64(), None);
        assert!(ArgValue::Integer(3).kind().is_numeric());
    }
}
