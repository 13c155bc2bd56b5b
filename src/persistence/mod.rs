//! Form persistence
//!
//! Mutations in the store end with a single commit through [`Persistence`].
//! [`SnapshotPersistence`] writes the whole form as one JSON array under a
//! fixed key. Failures never reach the caller: writes are best-effort and
//! reads fall back to an empty form.

use tracing::{debug, warn};

use crate::db::KeyValueStore;
use crate::models::{Field, Form};

/// Where a form is committed to and restored from
pub trait Persistence {
    /// Persist the complete current form
    fn commit(&mut self, fields: &[Field]);

    /// Read back the last committed form; empty when nothing usable is stored
    fn restore(&self) -> Form;

    /// Drop everything that was persisted
    fn erase(&mut self);
}

/// Full-snapshot JSON persistence over any key-value store
pub struct SnapshotPersistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotPersistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> Persistence for SnapshotPersistence<S> {
    fn commit(&mut self, fields: &[Field]) {
        let json = match serde_json::to_string(fields) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize form");
                return;
            }
        };
        match self.store.set(&self.key, &json) {
            Ok(()) => debug!(key = %self.key, fields = fields.len(), "form committed"),
            Err(e) => warn!(key = %self.key, error = %e, "failed to persist form"),
        }
    }

    fn restore(&self) -> Form {
        let saved = match self.store.get(&self.key) {
            Ok(Some(saved)) => saved,
            Ok(None) => return Form::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted form");
                return Form::new();
            }
        };

        match serde_json::from_str::<Form>(&saved) {
            Ok(mut fields) => {
                // Older snapshots store "" for a valid field
                for field in &mut fields {
                    if field.error.as_deref() == Some("") {
                        field.error = None;
                    }
                }
                dedup_ids(&mut fields);
                fields
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding malformed persisted form");
                Form::new()
            }
        }
    }

    fn erase(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to erase persisted form");
        }
    }
}

/// Keep the first field for any repeated id
fn dedup_ids(fields: &mut Form) {
    let mut seen = std::collections::HashSet::new();
    let before = fields.len();
    fields.retain(|f| seen.insert(f.id.clone()));
    if fields.len() != before {
        warn!(dropped = before - fields.len(), "dropped fields with duplicate ids");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::FieldType;

    fn persistence() -> SnapshotPersistence<Database> {
        SnapshotPersistence::new(Database::open_in_memory().unwrap(), "formFields")
    }

    #[test]
    fn test_restore_absent_is_empty() {
        assert!(persistence().restore().is_empty());
    }

    #[test]
    fn test_restore_malformed_is_empty() {
        let p = persistence();
        p.store().set("formFields", "{not json").unwrap();
        assert!(p.restore().is_empty());

        p.store().set("formFields", r#"[{"id":"a","type":"date","value":""}]"#).unwrap();
        assert!(p.restore().is_empty());
    }

    #[test]
    fn test_restore_normalizes_empty_error() {
        let p = persistence();
        p.store()
            .set(
                "formFields",
                r#"[{"id":"a","type":"text","value":"hi","error":""},{"id":"b","type":"number","value":""}]"#,
            )
            .unwrap();

        let fields = p.restore();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].error(), None);
        assert_eq!(fields[0].value(), "hi");
        assert_eq!(fields[1].field_type(), FieldType::Number);
    }

    #[test]
    fn test_restore_drops_duplicate_ids() {
        let p = persistence();
        p.store()
            .set(
                "formFields",
                r#"[{"id":"a","type":"text","value":"1"},{"id":"a","type":"email","value":"2"}]"#,
            )
            .unwrap();

        let fields = p.restore();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value(), "1");
    }

    #[test]
    fn test_commit_then_erase() {
        let mut p = persistence();
        let fields = vec![Field::new(FieldType::Text), Field::new(FieldType::Email)];

        p.commit(&fields);
        assert_eq!(p.restore(), fields);

        p.erase();
        assert_eq!(p.store().get("formFields").unwrap(), None);
        assert!(p.restore().is_empty());
    }
}
