//! Form state store
//!
//! Owns the ordered list of fields. Every mutating call validates (where
//! relevant), applies the change, then commits the full form.

use tracing::debug;

use crate::models::{Field, FieldType, Form};
use crate::persistence::Persistence;
use crate::validation::{self, Validator};

pub struct FormStore<P: Persistence> {
    fields: Form,
    persistence: P,
    validator: Validator,
}

impl<P: Persistence> FormStore<P> {
    /// Create an empty store; call [`FormStore::load`] to rehydrate
    pub fn new(persistence: P) -> Self {
        Self::with_validator(persistence, validation::validate)
    }

    /// Create a store that validates with a custom function
    pub fn with_validator(persistence: P, validator: Validator) -> Self {
        Self {
            fields: Form::new(),
            persistence,
            validator,
        }
    }

    /// Replace the in-memory form with whatever was last persisted
    pub fn load(&mut self) {
        self.fields = self.persistence.restore();
        debug!(fields = self.fields.len(), "form loaded");
    }

    /// Append an empty field of the given type and return its id
    pub fn add_field(&mut self, field_type: FieldType) -> String {
        let mut field = Field::new(field_type);
        while self.get(&field.id).is_some() {
            field = Field::new(field_type);
        }
        let id = field.id.clone();
        self.fields.push(field);
        debug!(%id, %field_type, "field added");
        self.commit();
        id
    }

    /// Remove the field with `id`; returns false when no such field exists
    pub fn remove_field(&mut self, id: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        let removed = self.fields.len() != before;
        debug!(%id, removed, "remove field");
        self.commit();
        removed
    }

    /// Validate `raw` under the field's type, then store value and error together
    pub fn update_field(&mut self, id: &str, raw: &str) -> Option<&Field> {
        let validator = self.validator;
        let index = match self.fields.iter().position(|f| f.id == id) {
            Some(index) => index,
            None => {
                debug!(%id, "update for unknown field ignored");
                self.commit();
                return None;
            }
        };

        let field_type = self.fields[index].field_type();
        let result = validation::validate_guarded(validator, field_type, raw);
        let error = validation::error_message(&result);

        let field = &mut self.fields[index];
        (field.value, field.error) = (raw.to_string(), error);
        debug!(%id, valid = field.error.is_none(), "field updated");

        self.commit();
        self.fields.get(index)
    }

    /// Empty the form and wipe persisted state
    pub fn clear_form(&mut self) {
        self.fields.clear();
        self.persistence.erase();
        debug!("form cleared");
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn commit(&mut self) {
        self.persistence.commit(&self.fields);
    }
}
