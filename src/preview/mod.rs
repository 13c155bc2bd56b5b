//! Read-only form summary shown after Submit

use serde::Serialize;

use crate::models::{Field, FieldType};

/// Placeholder shown for a field with no value
pub const EMPTY_PLACEHOLDER: &str = "(empty)";

/// One line of the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: String,
}

impl PreviewEntry {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Value text, or the placeholder when empty
    pub fn display_value(&self) -> &str {
        if self.value.is_empty() {
            EMPTY_PLACEHOLDER
        } else {
            &self.value
        }
    }
}

impl std::fmt::Display for PreviewEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field_type, self.display_value())
    }
}

/// Build preview entries in form order
pub fn build(fields: &[Field]) -> Vec<PreviewEntry> {
    fields
        .iter()
        .map(|f| PreviewEntry {
            field_type: f.field_type(),
            value: f.value().to_string(),
        })
        .collect()
}

/// Render the preview as plain text lines
pub fn render_lines(fields: &[Field]) -> Vec<String> {
    build(fields).iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_use_placeholder_for_empty() {
        let mut text = Field::new(FieldType::Text);
        text.value = "hello".to_string();
        let number = Field::new(FieldType::Number);

        assert_eq!(render_lines(&[text, number]), vec!["text: hello", "number: (empty)"]);
    }

    #[test]
    fn test_json_shape() {
        let entries = build(&[Field::new(FieldType::Email)]);
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json, serde_json::json!([{ "type": "email", "value": "" }]));
    }
}
