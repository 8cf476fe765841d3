//! Structured validation output.

/// A mapping from field name to the violation messages discovered for it.
///
/// Insertion order is discovery order, both across fields and within a
/// field's message list, so callers can render a stable full picture of all
/// violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ErrorMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for a field, creating the field entry on first use.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.entries.push((field.to_string(), vec![message.into()])),
        }
    }

    /// Messages recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// True when no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.len()).sum()
    }

    /// Iterates fields in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(f, m)| (f.as_str(), m.as_slice()))
    }
}
