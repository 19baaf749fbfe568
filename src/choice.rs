//! The normalized unit consumed by every list-based query.

use std::fmt::Display;

/// One selectable item. The label defaults to the stringified value;
/// membership in a selection set is decided by value equality, so distinct
/// choices may legally share a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    pub label: String,
    /// Stringified value, kept for fuzzy matching against the raw value.
    pub(crate) value_text: String,
    pub hint: Option<String>,
    pub disabled: bool,
}

impl<T: Display> Choice<T> {
    pub fn new(value: T) -> Self {
        let text = value.to_string();
        Self {
            value,
            label: text.clone(),
            value_text: text,
            hint: None,
            disabled: false,
        }
    }
}

impl<T> Choice<T> {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Normalizes a plain list of displayable values into choices, the form
/// every list-based query consumes.
pub fn normalize<T: Display, I: IntoIterator<Item = T>>(raw: I) -> Vec<Choice<T>> {
    raw.into_iter().map(Choice::new).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn label_defaults_to_stringified_value() {
        let choice = Choice::new(42);
        assert_eq!(choice.label, "42");
        assert_eq!(choice.value, 42);
        assert!(!choice.disabled);
    }

    #[test]
    fn label_override_keeps_value_text() {
        let choice = Choice::new("us-east-1").with_label("US East");
        assert_eq!(choice.label, "US East");
        assert_eq!(choice.value_text, "us-east-1");
    }

    #[test]
    fn normalize_preserves_order() {
        let choices = normalize(["a", "b", "c"]);
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }
}
