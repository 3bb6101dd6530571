//! Authoritative entity storage for a portal.
//!
//! The flat entity list is the single source of truth; every view (grouped
//! projects, the table) is derived from it on read. Writes come in three
//! flavors: upload-time batch upsert by natural key, exclusive row editing
//! through a draft, and unconditional row deletion. After every mutation the
//! store emits a [`StoreEvent`] to its observers so presentation layers can
//! re-derive whatever they render.

use crate::errors::EditError;
use crate::model::{Entity, Filter};
use tracing::{debug, info};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreEvent {
    Inserted { id: String },
    Updated { id: String },
    Deleted { id: String },
    Merged { inserted: usize, updated: usize },
    ColumnAdded { name: String },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
}

pub struct Store<E: Entity> {
    entities: Vec<E>,
    /// Dynamic column registry, in first-seen order. Once a column exists it
    /// stays for the lifetime of the collection.
    columns: Vec<String>,
    /// Id of the row currently being edited, if any. Editing is exclusive
    /// across the whole table.
    editing: Option<String>,
    draft: Option<E>,
    next_local_id: usize,
    observers: Vec<Box<dyn Fn(&StoreEvent)>>,
}

impl<E: Entity> Default for Store<E> {
    fn default() -> Self {
        Store::new()
    }
}

#[allow(dead_code)]
impl<E: Entity> Store<E> {
    pub fn new() -> Store<E> {
        Store {
            entities: Vec::new(),
            columns: Vec::new(),
            editing: None,
            draft: None,
            next_local_id: 1,
            observers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn dynamic_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn subscribe(&mut self, observer: impl Fn(&StoreEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self, event: &StoreEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    /// Register every extension key of `entity` as a dynamic column.
    fn register_columns_of(&mut self, entity: &E) {
        let new: Vec<String> = entity
            .extensions()
            .keys()
            .filter(|k| !self.columns.contains(k))
            .cloned()
            .collect();
        self.columns.extend(new);
    }

    /// Back-fill every entity with an empty string for each registered column.
    fn backfill_columns(&mut self) {
        for entity in &mut self.entities {
            for column in &self.columns {
                entity
                    .extensions_mut()
                    .entry(column.clone())
                    .or_default();
            }
        }
    }

    /// Seed the store with already-complete entities (sample data).
    pub fn insert(&mut self, entity: E) {
        let id = entity.id().to_owned();
        self.register_columns_of(&entity);
        self.entities.push(entity);
        self.backfill_columns();
        self.notify(&StoreEvent::Inserted { id });
    }

    /// Merge an upload batch into the authoritative list. Entries matching an
    /// existing entity by natural key are shallow-merged over it (incoming
    /// wins field by field, id preserved); the rest are appended.
    pub fn upsert_batch(&mut self, entries: Vec<E>) -> MergeStats {
        let mut stats = MergeStats::default();
        for entry in entries {
            self.register_columns_of(&entry);
            let key = entry.natural_key();
            if let Some(pos) = self.entities.iter().position(|e| e.natural_key() == key) {
                self.entities[pos].merge_from(&entry);
                stats.updated += 1;
            } else {
                self.entities.push(entry);
                stats.inserted += 1;
            }
        }
        self.backfill_columns();
        info!(
            kind = E::KIND,
            inserted = stats.inserted,
            updated = stats.updated,
            "merged upload batch",
        );
        self.notify(&StoreEvent::Merged {
            inserted: stats.inserted,
            updated: stats.updated,
        });
        stats
    }

    /// Entities passing every populated filter dimension.
    pub fn apply_filter(&self, filter: &Filter) -> Vec<&E> {
        if filter.is_unconstrained() {
            return self.entities.iter().collect();
        }
        self.entities.iter().filter(|e| filter.matches(*e)).collect()
    }

    /// Register a dynamic column by hand and back-fill existing rows.
    pub fn add_dynamic_column(&mut self, name: &str) {
        if self.columns.iter().any(|c| c == name) {
            return;
        }
        self.columns.push(name.to_owned());
        self.backfill_columns();
        self.notify(&StoreEvent::ColumnAdded {
            name: name.to_owned(),
        });
    }

    /// Append a blank row and open it for editing. The row must be saved
    /// (validated) or cancelled (discarded) before any other edit can start.
    pub fn add_row(&mut self) -> Result<String, EditError> {
        if self.editing.is_some() {
            return Err(EditError::EditInProgress);
        }
        let mut entity = E::default();
        entity.set_id(format!("local-{}", self.next_local_id));
        self.next_local_id += 1;
        entity.flags_mut().is_new = true;
        entity.flags_mut().is_editing = true;
        let id = entity.id().to_owned();
        self.draft = Some(entity.clone());
        self.editing = Some(id.clone());
        self.entities.push(entity);
        self.notify(&StoreEvent::Inserted { id: id.clone() });
        Ok(id)
    }

    /// Open an existing row for editing. Rejected if another row is already
    /// being edited; re-opening the same row is a no-op.
    pub fn begin_edit(&mut self, id: &str) -> Result<(), EditError> {
        match &self.editing {
            Some(current) if current == id => return Ok(()),
            Some(_) => return Err(EditError::EditInProgress),
            None => {}
        }
        let Some(pos) = self.position(id) else {
            return Err(EditError::UnknownRow(id.to_owned()));
        };
        self.entities[pos].flags_mut().is_editing = true;
        self.draft = Some(self.entities[pos].clone());
        self.editing = Some(id.to_owned());
        Ok(())
    }

    /// The in-progress copy of the row being edited. Mutations land in the
    /// authoritative list only on [`Store::save_edit`].
    pub fn draft_mut(&mut self) -> Option<&mut E> {
        self.draft.as_mut()
    }

    /// Validate and commit the in-progress edit. On a validation failure the
    /// edit stays active so the caller can correct and retry.
    pub fn save_edit(&mut self) -> Result<(), EditError> {
        let Some(mut draft) = self.draft.take() else {
            return Err(EditError::NoActiveEdit);
        };
        let missing = draft.missing_required();
        if !missing.is_empty() {
            self.draft = Some(draft);
            return Err(EditError::MissingRequired(missing));
        }
        draft.flags_mut().is_editing = false;
        draft.flags_mut().is_new = false;
        let id = draft.id().to_owned();
        let Some(pos) = self.position(&id) else {
            return Err(EditError::UnknownRow(id));
        };
        self.register_columns_of(&draft);
        self.entities[pos] = draft;
        self.backfill_columns();
        self.editing = None;
        self.notify(&StoreEvent::Updated { id });
        Ok(())
    }

    /// Discard the in-progress edit. A never-saved new row is removed; an
    /// existing row is left exactly as it was.
    pub fn cancel_edit(&mut self) {
        let Some(id) = self.editing.take() else {
            return;
        };
        self.draft = None;
        let Some(pos) = self.position(&id) else {
            return;
        };
        if self.entities[pos].flags().is_new {
            self.entities.remove(pos);
            self.notify(&StoreEvent::Deleted { id });
        } else {
            self.entities[pos].flags_mut().is_editing = false;
        }
    }

    /// Remove a row unconditionally. Clears the edit state when the deleted
    /// row was the one being edited.
    pub fn delete_row(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
            self.draft = None;
        }
        self.entities.remove(pos);
        debug!(kind = E::KIND, id, "row deleted");
        self.notify(&StoreEvent::Deleted { id: id.to_owned() });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Internship;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn internship(roll: &str, program: &str) -> Internship {
        Internship {
            id: format!("i-{roll}"),
            roll_no: roll.to_owned(),
            name: format!("Student {roll}"),
            program: program.to_owned(),
            ..Internship::default()
        }
    }

    #[test]
    fn upsert_is_idempotent_on_natural_key() {
        let mut store = Store::new();
        let batch = vec![internship("21001", "BTech CSE"), internship("21002", "BTech CSE")];
        let first = store.upsert_batch(batch.clone());
        assert_eq!((first.inserted, first.updated), (2, 0));
        let second = store.upsert_batch(batch);
        assert_eq!((second.inserted, second.updated), (0, 2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn merge_preserves_existing_id() {
        let mut store = Store::new();
        store.upsert_batch(vec![internship("21001", "BTech CSE")]);
        let mut incoming = internship("21001", "BTech CSE");
        incoming.id = "upload-1-0".to_owned();
        incoming.organization = "Acme Labs".to_owned();
        store.upsert_batch(vec![incoming]);
        let merged = store.get("i-21001").unwrap();
        assert_eq!(merged.organization, "Acme Labs");
        assert!(store.get("upload-1-0").is_none());
    }

    #[test]
    fn unconstrained_filter_is_a_noop() {
        let mut store = Store::new();
        store.upsert_batch(vec![internship("21001", "BTech CSE"), internship("21002", "MCA")]);
        let all = store.apply_filter(&Filter::default());
        assert_eq!(all.len(), store.len());
        let sentinel = Filter {
            program: "all-programs".to_owned(),
            ..Filter::default()
        };
        assert_eq!(store.apply_filter(&sentinel).len(), store.len());
    }

    #[test]
    fn filter_dimensions_are_anded() {
        let mut store = Store::new();
        let mut a = internship("21001", "BTech CSE");
        a.year = "3".to_owned();
        let mut b = internship("21002", "BTech CSE");
        b.year = "4".to_owned();
        store.upsert_batch(vec![a, b]);
        let filter = Filter {
            program: "BTech CSE".to_owned(),
            year: "3".to_owned(),
            ..Filter::default()
        };
        let hits = store.apply_filter(&filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].roll_no, "21001");
    }

    #[test]
    fn editing_is_exclusive() {
        let mut store = Store::new();
        store.upsert_batch(vec![internship("21001", "BTech CSE"), internship("21002", "MCA")]);
        store.begin_edit("i-21001").unwrap();
        assert_eq!(store.begin_edit("i-21002"), Err(EditError::EditInProgress));
        // Neither row changed state.
        assert!(store.get("i-21001").unwrap().flags.is_editing);
        assert!(!store.get("i-21002").unwrap().flags.is_editing);
    }

    #[test]
    fn save_requires_roll_and_name() {
        let mut store: Store<Internship> = Store::new();
        let id = store.add_row().unwrap();
        assert_eq!(
            store.save_edit(),
            Err(EditError::MissingRequired(vec!["roll no", "name"]))
        );
        // The edit stays active; fill it in and retry.
        {
            let draft = store.draft_mut().unwrap();
            draft.roll_no = "21001".to_owned();
            draft.name = "Asha Verma".to_owned();
        }
        store.save_edit().unwrap();
        let saved = store.get(&id).unwrap();
        assert!(!saved.flags.is_new);
        assert!(!saved.flags.is_editing);
    }

    #[test]
    fn cancel_discards_draft_without_touching_the_row() {
        let mut store = Store::new();
        store.upsert_batch(vec![internship("21001", "BTech CSE")]);
        store.begin_edit("i-21001").unwrap();
        store.draft_mut().unwrap().organization = "Changed".to_owned();
        store.cancel_edit();
        assert_eq!(store.get("i-21001").unwrap().organization, "");
        assert!(!store.get("i-21001").unwrap().flags.is_editing);
    }

    #[test]
    fn cancelling_a_new_row_removes_it() {
        let mut store: Store<Internship> = Store::new();
        let id = store.add_row().unwrap();
        store.cancel_edit();
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn delete_clears_active_edit_state() {
        let mut store = Store::new();
        store.upsert_batch(vec![internship("21001", "BTech CSE")]);
        store.begin_edit("i-21001").unwrap();
        assert!(store.delete_row("i-21001"));
        assert!(store.is_empty());
        // A fresh edit can start immediately.
        store.upsert_batch(vec![internship("21002", "MCA")]);
        store.begin_edit("i-21002").unwrap();
    }

    #[test]
    fn dynamic_columns_backfill_existing_rows() {
        let mut store = Store::new();
        store.upsert_batch(vec![internship("21001", "BTech CSE")]);
        let mut with_attendance = internship("21002", "MCA");
        with_attendance
            .extensions
            .insert("Attendance June".to_owned(), "92%".to_owned());
        store.upsert_batch(vec![with_attendance]);
        assert_eq!(store.dynamic_columns(), vec!["Attendance June".to_owned()]);
        assert_eq!(
            store.get("i-21001").unwrap().extensions["Attendance June"],
            ""
        );
        store.add_dynamic_column("Attendance July");
        assert_eq!(
            store.get("i-21001").unwrap().extensions["Attendance July"],
            ""
        );
    }

    #[test]
    fn observers_see_each_mutation() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut store = Store::new();
        store.subscribe(move |event: &StoreEvent| sink.borrow_mut().push(event.clone()));
        store.upsert_batch(vec![internship("21001", "BTech CSE")]);
        store.delete_row("i-21001");
        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                StoreEvent::Merged { inserted: 1, updated: 0 },
                StoreEvent::Deleted { id: "i-21001".to_owned() },
            ]
        );
    }
}
