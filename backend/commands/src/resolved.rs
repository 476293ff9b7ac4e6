/// Values resolved so far during one parse.
use slashforge_core::{Attachment, Channel, Emoji, ForumTag};

use crate::value::ArgValue;

/// Append-only map from field name to converted value, in resolution order.
///
/// The engine only appends between converter calls, so every converter and
/// provider sees an immutable snapshot of strictly earlier fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    entries: Vec<(String, ArgValue)>,
}

impl ResolvedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot by hand, e.g. for exercising a provider directly.
    /// Re-adding an existing name is ignored.
    pub fn with(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.insert(name.into(), value);
        self
    }

    pub(crate) fn insert(&mut self, name: String, value: ArgValue) {
        if self.contains(&name) {
            return;
        }
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in resolution order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_i64)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.get(name).and_then(ArgValue::as_channel)
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.get(name).and_then(ArgValue::as_attachment)
    }

    pub fn emoji(&self, name: &str) -> Option<&Emoji> {
        self.get(name).and_then(ArgValue::as_emoji)
    }

    pub fn tag(&self, name: &str) -> Option<&ForumTag> {
        self.get(name).and_then(ArgValue::as_tag)
    }
}
