use super::{merge_extensions, overwrite, EditFlags, Entity, FilterField};
use crate::headers::clean;
use crate::mapper::CanonicalRecord;
use std::collections::BTreeMap;

/// One student's membership in a project group. Group-level fields (title,
/// domain, mentors, program, coordinator, session) are logically shared by
/// every member of a group; equality is not hard-enforced, the grouped view
/// reconciles disagreements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Project {
    pub id: String,
    pub group_no: String,
    pub roll_no: String,
    pub name: String,
    pub email: String,
    pub phone_no: String,
    pub title: String,
    pub domain: String,
    pub faculty_mentor: String,
    pub industry_mentor: String,
    pub program: String,
    pub faculty_coordinator: String,
    pub session: String,
    pub year: String,
    pub semester: String,
    /// Document slots: empty, or an opaque filename/reference.
    pub form: String,
    pub presentation: String,
    pub report: String,
    pub extensions: BTreeMap<String, String>,
    pub flags: EditFlags,
}

impl Project {
    /// Build a project membership from an upload record. The rule table only
    /// knows the internship columns, so group-level columns arrive as
    /// extensions; they are claimed here by a tolerant key match (same
    /// strip-and-lowercase normalization as header matching) and whatever is
    /// left stays a dynamic column.
    pub fn from_record(record: CanonicalRecord) -> Project {
        let mut project = Project {
            id: record.id,
            roll_no: record.roll_no,
            name: record.name,
            program: record.program,
            faculty_coordinator: record.faculty_coordinator,
            session: record.session,
            year: record.year,
            semester: record.semester,
            ..Project::default()
        };
        for (key, value) in record.extensions {
            let target = match clean(&key) {
                k if k.contains("group") => &mut project.group_no,
                k if k.contains("title") || k.contains("project") => &mut project.title,
                k if k.contains("domain") => &mut project.domain,
                k if k.contains("industry") && k.contains("mentor") => {
                    &mut project.industry_mentor
                }
                k if k.contains("mentor") || k.contains("guide") => &mut project.faculty_mentor,
                k if k.contains("email") || k.contains("mail") => &mut project.email,
                k if k.contains("phone") || k.contains("mobile") || k.contains("contact") => {
                    &mut project.phone_no
                }
                k if k.contains("form") => &mut project.form,
                k if k.contains("presentation") || k.contains("ppt") => &mut project.presentation,
                k if k.contains("report") => &mut project.report,
                _ => {
                    project.extensions.insert(key, value);
                    continue;
                }
            };
            if target.is_empty() {
                *target = value;
            }
        }
        project
    }
}

impl Entity for Project {
    const KIND: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn natural_key(&self) -> (String, String) {
        (self.roll_no.clone(), self.group_no.clone())
    }

    fn merge_from(&mut self, incoming: &Self) {
        overwrite(&mut self.group_no, &incoming.group_no);
        overwrite(&mut self.roll_no, &incoming.roll_no);
        overwrite(&mut self.name, &incoming.name);
        overwrite(&mut self.email, &incoming.email);
        overwrite(&mut self.phone_no, &incoming.phone_no);
        overwrite(&mut self.title, &incoming.title);
        overwrite(&mut self.domain, &incoming.domain);
        overwrite(&mut self.faculty_mentor, &incoming.faculty_mentor);
        overwrite(&mut self.industry_mentor, &incoming.industry_mentor);
        overwrite(&mut self.program, &incoming.program);
        overwrite(&mut self.faculty_coordinator, &incoming.faculty_coordinator);
        overwrite(&mut self.session, &incoming.session);
        overwrite(&mut self.year, &incoming.year);
        overwrite(&mut self.semester, &incoming.semester);
        overwrite(&mut self.form, &incoming.form);
        overwrite(&mut self.presentation, &incoming.presentation);
        overwrite(&mut self.report, &incoming.report);
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
        if self.group_no.is_empty() {
            missing.push("group no");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_group_columns_from_extensions() {
        let mut record = CanonicalRecord::default();
        record.id = "upload-0-0".to_owned();
        record.roll_no = "21001".to_owned();
        record.name = "Asha Verma".to_owned();
        for (key, value) in [
            ("Group No", "G1"),
            ("Project Title", "Crop Advisor"),
            ("Domain", "ML"),
            ("Industry Mentor", "R. Iyer"),
            ("Faculty Mentor", "Dr. Rao"),
            ("Stipend (INR)", "0"),
        ] {
            record.extensions.insert(key.to_owned(), value.to_owned());
        }
        let project = Project::from_record(record);
        assert_eq!(project.group_no, "G1");
        assert_eq!(project.title, "Crop Advisor");
        assert_eq!(project.domain, "ML");
        assert_eq!(project.industry_mentor, "R. Iyer");
        assert_eq!(project.faculty_mentor, "Dr. Rao");
        assert_eq!(project.extensions["Stipend (INR)"], "0");
    }

    #[test]
    fn merge_keeps_existing_id_and_nonempty_fields() {
        let mut existing = Project {
            id: "p-1".to_owned(),
            roll_no: "21001".to_owned(),
            group_no: "G1".to_owned(),
            title: "Crop Advisor".to_owned(),
            ..Project::default()
        };
        let incoming = Project {
            id: "upload-9-0".to_owned(),
            roll_no: "21001".to_owned(),
            group_no: "G1".to_owned(),
            domain: "ML".to_owned(),
            ..Project::default()
        };
        existing.merge_from(&incoming);
        assert_eq!(existing.id, "p-1");
        assert_eq!(existing.title, "Crop Advisor");
        assert_eq!(existing.domain, "ML");
    }
}
