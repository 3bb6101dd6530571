//! Spreadsheet header recognition.
//!
//! Uploaded sheets come from many coordinators and no two of them label their
//! columns the same way. `normalize` maps a raw header string to the canonical
//! field it most plausibly denotes, using an ordered rule table where the first
//! matching rule wins. Matching is case-insensitive and ignores punctuation.

/// Canonical destination for a spreadsheet column.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Field {
    /// Serial-number-like columns. Recognized so they stay out of the
    /// dynamic-column set; the record keeps its own generated id.
    Id,
    RollNo,
    Name,
    Program,
    Organization,
    Dates,
    Noc,
    OfferLetter,
    Pop,
    /// Attendance column, optionally tied to a month ("Attendance June").
    Attendance(Option<String>),
    /// Unrecognized header, passed through as a dynamic column name.
    Custom(String),
}

impl Field {
    /// Display name used when the field lands in an entity's extension map.
    pub fn column_name(&self) -> Option<String> {
        match self {
            Field::Attendance(Some(month)) => Some(format!("Attendance {month}")),
            Field::Attendance(None) => Some("Attendance".to_owned()),
            Field::Custom(name) => Some(name.clone()),
            _ => None,
        }
    }
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Lowercase the header and drop everything that is not a letter or digit.
pub(crate) fn clean(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn contains_any(cleaned: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| cleaned.contains(p))
}

/// "column", "column1", "column12", ...
fn is_generic_column(cleaned: &str) -> bool {
    cleaned
        .strip_prefix("column")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

fn detect_month(cleaned: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|m| cleaned.contains(&m.to_ascii_lowercase()))
        .copied()
}

/// Map a raw header to its canonical field. Pure; rule order is significant
/// because the patterns overlap ("Student Roll No" must hit the roll rule
/// before the name rule).
pub fn normalize(header: &str) -> Field {
    let cleaned = clean(header);
    if cleaned.is_empty() || cleaned == "sno" || cleaned == "id" || cleaned.contains("serial")
        || is_generic_column(&cleaned)
    {
        Field::Id
    } else if contains_any(&cleaned, &["roll", "registration", "regno"]) {
        // "enrollment" contains "roll" and is covered by the first pattern.
        Field::RollNo
    } else if contains_any(&cleaned, &["name", "student"]) {
        Field::Name
    } else if contains_any(&cleaned, &["program", "course", "degree", "branch", "stream"]) {
        Field::Program
    } else if contains_any(&cleaned, &["organization", "organisation", "company", "place"]) {
        Field::Organization
    } else if contains_any(&cleaned, &["date", "duration", "period", "time"]) {
        Field::Dates
    } else if contains_any(&cleaned, &["noc", "objection", "certificate"]) {
        Field::Noc
    } else if contains_any(&cleaned, &["offer", "letter"]) {
        Field::OfferLetter
    } else if contains_any(&cleaned, &["pop", "proof", "completion"]) {
        Field::Pop
    } else if cleaned.contains("attendance") {
        Field::Attendance(detect_month(&cleaned).map(str::to_owned))
    } else {
        Field::Custom(header.trim().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_like_headers() {
        for h in ["S.No", "sno", "Serial Number", "ID", "", "  ", "Column1"] {
            assert_eq!(normalize(h), Field::Id, "header {h:?}");
        }
    }

    #[test]
    fn roll_patterns() {
        for h in ["Roll No", "Enrollment No.", "Registration Number", "REG NO"] {
            assert_eq!(normalize(h), Field::RollNo, "header {h:?}");
        }
    }

    #[test]
    fn rule_order_roll_beats_name() {
        assert_eq!(normalize("Student Roll No"), Field::RollNo);
        assert_eq!(normalize("Student Name"), Field::Name);
    }

    #[test]
    fn program_and_organization() {
        assert_eq!(normalize("Branch"), Field::Program);
        assert_eq!(normalize("Course / Degree"), Field::Program);
        assert_eq!(normalize("Company Name"), Field::Name); // name outranks company
        assert_eq!(normalize("Organisation"), Field::Organization);
        assert_eq!(normalize("Internship Place"), Field::Organization);
    }

    #[test]
    fn document_slots() {
        assert_eq!(normalize("NOC"), Field::Noc);
        assert_eq!(normalize("No Objection Cert."), Field::Noc);
        assert_eq!(normalize("Offer Letter"), Field::OfferLetter);
        assert_eq!(normalize("Proof of Participation"), Field::Pop);
        assert_eq!(normalize("Completion Certificate"), Field::Noc); // rule 7 precedes rule 9
    }

    #[test]
    fn attendance_with_month() {
        assert_eq!(
            normalize("Attendance - June 2024"),
            Field::Attendance(Some("June".to_owned()))
        );
        assert_eq!(
            normalize("attendance JANUARY"),
            Field::Attendance(Some("January".to_owned()))
        );
        assert_eq!(normalize("Attendance"), Field::Attendance(None));
        assert_eq!(
            normalize("Attendance - June 2024").column_name().unwrap(),
            "Attendance June"
        );
    }

    #[test]
    fn passthrough_is_verbatim() {
        assert_eq!(
            normalize("  Stipend (INR)  "),
            Field::Custom("Stipend (INR)".to_owned())
        );
    }

    #[test]
    fn deterministic() {
        let h = "Enrollment No.";
        assert_eq!(normalize(h), normalize(h));
    }
}
