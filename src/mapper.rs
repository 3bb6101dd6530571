//! Turns one raw spreadsheet row into a canonical record.
//!
//! The mapper is total: whatever the row looks like, the produced record has a
//! non-empty roll number and name. Missing values are inferred from fixed
//! candidate columns and, failing that, synthesized. Bulk import must stay
//! usable for sheets assembled by hand in wildly different layouts, so rows are
//! repaired rather than rejected; callers treat inferred values as
//! low-confidence.

use crate::headers::{normalize, Field};
use crate::model::Metadata;
use crate::sheet::Header;
use calamine::Data;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// Portal-agnostic record produced by the upload pipeline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CanonicalRecord {
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub program: String,
    pub organization: String,
    pub dates: String,
    pub noc: String,
    pub offer_letter: String,
    pub pop: String,
    pub year: String,
    pub semester: String,
    pub session: String,
    pub faculty_coordinator: String,
    /// Dynamic columns: attendance months and unrecognized headers.
    pub extensions: BTreeMap<String, String>,
}

/// Candidate columns scanned when no header mapped to a roll number.
const ROLL_FALLBACK_COLUMNS: [usize; 3] = [1, 2, 3];
/// Candidate columns scanned when no header mapped to a name.
const NAME_FALLBACK_COLUMNS: [usize; 3] = [2, 3, 4];

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Cell to trimmed text; empty and whitespace-only cells count as absent.
fn cell_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// "21001" or "BT21001" shaped values.
fn looks_like_roll(value: &str) -> bool {
    if is_digits(value) {
        return true;
    }
    let rest = value.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.len() < value.len() && is_digits(rest)
}

fn scan_columns(row: &[Data], columns: &[usize], accept: impl Fn(&str) -> bool) -> Option<String> {
    columns
        .iter()
        .filter_map(|&idx| cell_text(row.get(idx)))
        .find(|v| accept(v))
}

/// Map a raw row to a canonical record, addressing cells by the original
/// column index carried on each header.
pub fn map_row(
    headers: &[Header],
    row: &[Data],
    row_index: usize,
    metadata: &Metadata,
) -> CanonicalRecord {
    let mut record = CanonicalRecord {
        id: format!("upload-{}-{}", unix_millis(), row_index),
        year: metadata.year.clone(),
        semester: metadata.semester.clone(),
        program: metadata.program.clone(),
        session: metadata.session.clone().unwrap_or_default(),
        faculty_coordinator: metadata.faculty_coordinator.clone().unwrap_or_default(),
        ..CanonicalRecord::default()
    };
    for header in headers {
        let Some(value) = cell_text(row.get(header.index)) else {
            continue;
        };
        match normalize(&header.name) {
            // The sheet's serial number is recognized but not stored: the
            // generated upload id stays authoritative.
            Field::Id => {}
            Field::RollNo => record.roll_no = value,
            Field::Name => record.name = value,
            Field::Program => record.program = value,
            Field::Organization => record.organization = value,
            Field::Dates => record.dates = value,
            Field::Noc => record.noc = value,
            Field::OfferLetter => record.offer_letter = value,
            Field::Pop => record.pop = value,
            field @ (Field::Attendance(_) | Field::Custom(_)) => {
                if let Some(column) = field.column_name() {
                    record.extensions.insert(column, value);
                }
            }
        }
    }
    if record.roll_no.is_empty() {
        if let Some(roll) = scan_columns(row, &ROLL_FALLBACK_COLUMNS, looks_like_roll) {
            trace!(row = row_index, roll = %roll, "roll number inferred from candidate column");
            record.roll_no = roll;
        }
    }
    if record.name.is_empty() {
        if let Some(name) = scan_columns(row, &NAME_FALLBACK_COLUMNS, |v| !is_digits(v)) {
            trace!(row = row_index, name = %name, "name inferred from candidate column");
            record.name = name;
        }
    }
    if record.roll_no.is_empty() {
        record.roll_no = format!("R{}", 1000 + row_index);
    }
    if record.name.is_empty() {
        record.name = format!("Student {}", row_index + 1);
    }
    record
}
