//! Data models for formbuilder
//!
//! These represent the canonical JSON structure persisted in the key-value store

use serde::{Deserialize, Serialize};

/// The fixed set of input types a field can have
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
}

impl FieldType {
    /// All field types, in add-button order
    pub const ALL: [FieldType; 3] = [FieldType::Text, FieldType::Email, FieldType::Number];

    /// Human-readable label used on add controls
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Email => "Email",
            FieldType::Number => "Number",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Email => write!(f, "email"),
            FieldType::Number => write!(f, "number"),
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "email" => Ok(FieldType::Email),
            "number" => Ok(FieldType::Number),
            _ => Err(format!("Invalid field type: {}. Use: text, email, number", s)),
        }
    }
}

/// One user-configured input
///
/// `field_type` has no setter: a field keeps the type it was created with.
/// `value` and `error` are only ever replaced together, see
/// [`crate::store::FormStore::update_field`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    pub(crate) id: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    pub(crate) value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl Field {
    /// Create an empty field with a fresh id
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field_type,
            value: String::new(),
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// The ordered sequence of fields on the form
pub type Form = Vec<Field>;
