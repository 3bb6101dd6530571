use super::{merge_extensions, overwrite, EditFlags, Entity, FilterField};
use crate::mapper::CanonicalRecord;
use std::collections::BTreeMap;

/// One internship record. The static columns are fixed; anything else the
/// portal learns about (attendance months, custom columns) lives in
/// `extensions` and is displayed as the union of keys across the collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Internship {
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub program: String,
    pub organization: String,
    pub dates: String,
    /// Document slots: empty, or an opaque filename/reference.
    pub noc: String,
    pub offer_letter: String,
    pub pop: String,
    pub year: String,
    pub semester: String,
    pub session: String,
    pub faculty_coordinator: String,
    pub extensions: BTreeMap<String, String>,
    pub flags: EditFlags,
}

impl From<CanonicalRecord> for Internship {
    fn from(record: CanonicalRecord) -> Internship {
        Internship {
            id: record.id,
            roll_no: record.roll_no,
            name: record.name,
            program: record.program,
            organization: record.organization,
            dates: record.dates,
            noc: record.noc,
            offer_letter: record.offer_letter,
            pop: record.pop,
            year: record.year,
            semester: record.semester,
            session: record.session,
            faculty_coordinator: record.faculty_coordinator,
            extensions: record.extensions,
            flags: EditFlags::default(),
        }
    }
}

impl Entity for Internship {
    const KIND: &'static str = "internship";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn natural_key(&self) -> (String, String) {
        (self.roll_no.clone(), self.program.clone())
    }

    fn merge_from(&mut self, incoming: &Self) {
        overwrite(&mut self.roll_no, &incoming.roll_no);
        overwrite(&mut self.name, &incoming.name);
        overwrite(&mut self.program, &incoming.program);
        overwrite(&mut self.organization, &incoming.organization);
        overwrite(&mut self.dates, &incoming.dates);
        overwrite(&mut self.noc, &incoming.noc);
        overwrite(&mut self.offer_letter, &incoming.offer_letter);
        overwrite(&mut self.pop, &incoming.pop);
        overwrite(&mut self.year, &incoming.year);
        overwrite(&mut self.semester, &incoming.semester);
        overwrite(&mut self.session, &incoming.session);
        overwrite(&mut self.faculty_coordinator, &incoming.faculty_coordinator);
        merge_extensions(&mut self.extensions, &incoming.extensions);
    }

    fn flags(&self) -> EditFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut EditFlags {
        &mut self.flags
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.roll_no.is_empty() {
            missing.push("roll no");
        }
        if self.name.is_empty() {
            missing.push("name");
        }
        missing
    }

    fn filter_value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Year => &self.year,
            FilterField::Semester => &self.semester,
            FilterField::Session => &self.session,
            FilterField::Program => &self.program,
            FilterField::FacultyCoordinator => &self.faculty_coordinator,
        }
    }

    fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.extensions
    }
}
