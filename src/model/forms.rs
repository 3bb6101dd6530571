//! Shapes handed to the remote form-builder collaborator. The builder itself
//! (form creation, OAuth) lives outside this crate; these types only pin down
//! the request payload it consumes.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormFieldKind {
    Text,
    Email,
    Number,
    Dropdown,
    FileUpload,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub field_name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FormFieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    pub portal_type: String,
    pub title: String,
    pub session: String,
    pub year: String,
    pub semester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_students: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
    pub include_fields: Vec<String>,
    pub pdf_fields: Vec<String>,
    pub custom_fields: Vec<String>,
}

fn field(name: &str, label: &str, kind: FormFieldKind, required: bool) -> FormField {
    FormField {
        field_name: name.to_owned(),
        label: label.to_owned(),
        kind,
        required,
        choices: None,
    }
}

impl FormSettings {
    /// The field-list description sent to the form builder: identity fields,
    /// portal-specific fields (pruned to `include_fields` when that list is
    /// non-empty), then the wizard's custom fields as optional text.
    pub fn field_plan(&self) -> Vec<FormField> {
        let mut plan = vec![
            field("rollNo", "Roll Number", FormFieldKind::Text, true),
            field("name", "Full Name", FormFieldKind::Text, true),
            field("email", "Email", FormFieldKind::Email, true),
        ];
        let portal_fields = if self.portal_type == "project" {
            vec![
                field("groupNo", "Group Number", FormFieldKind::Text, true),
                field("title", "Project Title", FormFieldKind::Text, true),
                field("domain", "Domain", FormFieldKind::Text, false),
                field("facultyMentor", "Faculty Mentor", FormFieldKind::Text, false),
                field("industryMentor", "Industry Mentor", FormFieldKind::Text, false),
            ]
        } else {
            vec![
                field("organization", "Organization", FormFieldKind::Text, true),
                field("dates", "Internship Dates", FormFieldKind::Text, true),
                field("offerLetter", "Offer Letter", FormFieldKind::FileUpload, false),
                field("noc", "NOC", FormFieldKind::FileUpload, false),
                field("pop", "Proof of Completion", FormFieldKind::FileUpload, false),
            ]
        };
        plan.extend(portal_fields.into_iter().filter(|f| {
            f.required
                || self.include_fields.is_empty()
                || self.include_fields.contains(&f.field_name)
        }));
        plan.extend(
            self.custom_fields
                .iter()
                .map(|name| field(name, name, FormFieldKind::Text, false)),
        );
        plan
    }
}
