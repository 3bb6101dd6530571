pub use self::forms::{FormField, FormFieldKind, FormSettings};
pub use self::internship::Internship;
pub use self::project::Project;

use std::collections::BTreeMap;

mod forms;
mod internship;
mod project;

/// Editing-session state carried on an entity. Not persisted semantics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EditFlags {
    pub is_editing: bool,
    pub is_new: bool,
}

/// Caller-supplied context attached to every uploaded row.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    pub year: String,
    pub semester: String,
    pub program: String,
    pub session: Option<String>,
    pub faculty_coordinator: Option<String>,
}

/// The dimensions a portal filter can constrain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterField {
    Year,
    Semester,
    Session,
    Program,
    FacultyCoordinator,
}

/// Sparse selection over the filterable dimensions. An empty value or an
/// `all-*` sentinel means "no constraint"; anything else is an exact match.
/// Populated dimensions combine with AND.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    pub year: String,
    pub semester: String,
    pub session: String,
    pub program: String,
    pub faculty_coordinator: String,
}

impl Filter {
    const FIELDS: [FilterField; 5] = [
        FilterField::Year,
        FilterField::Semester,
        FilterField::Session,
        FilterField::Program,
        FilterField::FacultyCoordinator,
    ];

    fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Year => &self.year,
            FilterField::Semester => &self.semester,
            FilterField::Session => &self.session,
            FilterField::Program => &self.program,
            FilterField::FacultyCoordinator => &self.faculty_coordinator,
        }
    }

    pub fn constrains(value: &str) -> bool {
        !value.is_empty() && !value.starts_with("all-")
    }

    pub fn is_unconstrained(&self) -> bool {
        Self::FIELDS.iter().all(|&f| !Self::constrains(self.value(f)))
    }

    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        Self::FIELDS.iter().all(|&field| {
            let wanted = self.value(field);
            !Self::constrains(wanted) || wanted == entity.filter_value(field)
        })
    }
}

/// The seam between the store and the two portal entity types.
pub trait Entity: Clone + Default {
    /// Portal name used in logs.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// Key used for upload-time upsert.
    fn natural_key(&self) -> (String, String);
    /// Shallow-merge `incoming` over `self`, field by field; empty incoming
    /// fields leave the existing value alone and the id is never touched.
    fn merge_from(&mut self, incoming: &Self);
    fn flags(&self) -> EditFlags;
    fn flags_mut(&mut self) -> &mut EditFlags;
    /// Names of required fields that are still blank.
    fn missing_required(&self) -> Vec<&'static str>;
    fn filter_value(&self, field: FilterField) -> &str;
    fn extensions(&self) -> &BTreeMap<String, String>;
    fn extensions_mut(&mut self) -> &mut BTreeMap<String, String>;
}

/// Incoming-wins merge for one field.
pub(crate) fn overwrite(target: &mut String, incoming: &str) {
    if !incoming.is_empty() {
        incoming.clone_into(target);
    }
}

pub(crate) fn merge_extensions(
    target: &mut BTreeMap<String, String>,
    incoming: &BTreeMap<String, String>,
) {
    for (key, value) in incoming {
        if !value.is_empty() {
            target.insert(key.clone(), value.clone());
        } else {
            target.entry(key.clone()).or_default();
        }
    }
}
