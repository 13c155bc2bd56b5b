//! Form controller
//!
//! Turns user actions into store mutations and owns the preview flag.
//! Frontends (the TUI, tests) talk to the form only through [`Action`]s.

use tracing::info;

use crate::models::{Field, FieldType};
use crate::persistence::Persistence;
use crate::preview::{self, PreviewEntry};
use crate::store::FormStore;

/// Everything a user can do to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddField(FieldType),
    RemoveField(String),
    Edit { id: String, value: String },
    Submit,
    Clear,
}

pub struct FormController<P: Persistence> {
    store: FormStore<P>,
    preview_visible: bool,
}

impl<P: Persistence> FormController<P> {
    /// Build a controller and rehydrate the form from persistence
    pub fn new(persistence: P) -> Self {
        Self::from_store(FormStore::new(persistence))
    }

    /// Wrap an existing store, loading persisted state into it
    pub fn from_store(mut store: FormStore<P>) -> Self {
        store.load();
        Self {
            store,
            preview_visible: false,
        }
    }

    /// Apply one action; returns the id of a newly added field
    pub fn dispatch(&mut self, action: Action) -> Option<String> {
        match action {
            Action::AddField(field_type) => return Some(self.store.add_field(field_type)),
            Action::RemoveField(id) => {
                self.store.remove_field(&id);
            }
            Action::Edit { id, value } => {
                self.store.update_field(&id, &value);
            }
            Action::Submit => {
                self.preview_visible = true;
                info!(fields = self.store.len(), "form submitted");
            }
            Action::Clear => {
                self.store.clear_form();
                self.preview_visible = false;
                info!("form cleared");
            }
        }
        None
    }

    /// Append a character to a field's value
    pub fn type_char(&mut self, id: &str, c: char) {
        if let Some(field) = self.store.get(id) {
            let mut value = field.value().to_string();
            value.push(c);
            self.dispatch(Action::Edit {
                id: id.to_string(),
                value,
            });
        }
    }

    /// Delete the last character of a field's value
    pub fn backspace(&mut self, id: &str) {
        if let Some(field) = self.store.get(id) {
            let mut value = field.value().to_string();
            if value.pop().is_none() {
                return;
            }
            self.dispatch(Action::Edit {
                id: id.to_string(),
                value,
            });
        }
    }

    pub fn fields(&self) -> &[Field] {
        self.store.fields()
    }

    pub fn store(&self) -> &FormStore<P> {
        &self.store
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    /// Live preview entries, `None` while the preview is hidden
    pub fn preview(&self) -> Option<Vec<PreviewEntry>> {
        self.preview_visible.then(|| preview::build(self.store.fields()))
    }
}
