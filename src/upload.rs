//! Bulk-import pipeline: decode, normalize, map, report.
//!
//! The pipeline never touches a store. It returns a batch of canonical
//! records plus warnings; committing the batch (upsert) is the caller's
//! explicit step, so closing an upload mid-way simply drops the output.

use crate::errors::{UploadError, UploadWarning, ValidationError};
use crate::headers::{normalize, Field};
use crate::mapper::{map_row, CanonicalRecord};
use crate::model::Metadata;
use crate::sheet::{self, Sheet};
use calamine::Data;
use std::path::Path;
use tracing::{info, warn};

/// How many data rows are rendered into the preview.
const PREVIEW_ROWS: usize = 5;

#[derive(Clone, Debug, Default)]
pub struct UploadOutcome {
    pub entries: Vec<CanonicalRecord>,
    /// Display strings for at most the first five data rows.
    pub preview: Vec<String>,
    pub warnings: Vec<UploadWarning>,
}

fn check_extension(file_name: &str) -> Result<(), ValidationError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xls" => Ok(()),
        other => Err(ValidationError::UnsupportedFile(format!(".{other}"))),
    }
}

fn check_metadata(metadata: &Metadata) -> Result<(), ValidationError> {
    if metadata.year.is_empty() {
        Err(ValidationError::MissingMetadata("year"))
    } else if metadata.semester.is_empty() {
        Err(ValidationError::MissingMetadata("semester"))
    } else if metadata.program.is_empty() {
        Err(ValidationError::MissingMetadata("program"))
    } else {
        Ok(())
    }
}

fn preview_row(row: &[Data]) -> String {
    row.iter()
        .map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Presence check on headers only: per-row fallback may still recover these
/// fields, which is exactly why a miss here is a warning and not an error.
fn required_headers_present(sheet: &Sheet) -> bool {
    let mut has_roll = false;
    let mut has_name = false;
    for header in &sheet.headers {
        match normalize(&header.name) {
            Field::RollNo => has_roll = true,
            Field::Name => has_name = true,
            _ => {}
        }
    }
    has_roll && has_name
}

/// Run the pipeline over an already-read payload.
pub fn process_bytes(
    file_name: &str,
    payload: &[u8],
    metadata: &Metadata,
) -> Result<UploadOutcome, UploadError> {
    check_extension(file_name)?;
    check_metadata(metadata)?;
    let sheet = sheet::parse(payload)?;
    let preview = sheet
        .rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| preview_row(row))
        .collect();
    let mut warnings = Vec::new();
    if !required_headers_present(&sheet) {
        warn!(file = file_name, "no roll-number or name header recognized");
        warnings.push(UploadWarning::FieldInference);
    }
    let entries = sheet
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| map_row(&sheet.headers, row, row_index, metadata))
        .collect::<Vec<_>>();
    info!(
        file = file_name,
        rows = entries.len(),
        warnings = warnings.len(),
        "upload mapped",
    );
    Ok(UploadOutcome {
        entries,
        preview,
        warnings,
    })
}

/// Read and process an uploaded spreadsheet. The file read is the single
/// awaited unit; everything after it runs to completion synchronously.
pub async fn process(path: &Path, metadata: &Metadata) -> Result<UploadOutcome, UploadError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_owned();
    check_extension(&file_name)?;
    let payload = tokio::fs::read(path).await?;
    process_bytes(&file_name, &payload, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::workbook_bytes;

    fn metadata() -> Metadata {
        Metadata {
            year: "3".to_owned(),
            semester: "5".to_owned(),
            program: "BTech CSE".to_owned(),
            session: Some("2024-2025".to_owned()),
            faculty_coordinator: Some("Dr. Rao".to_owned()),
        }
    }

    #[test]
    fn maps_a_well_formed_sheet() {
        let bytes = workbook_bytes(&[
            &["S.No", "Enrollment No", "Student Name", "Branch"],
            &["1", "21001", "Asha Verma", "BTech CSE"],
        ]);
        let outcome = process_bytes("students.xlsx", &bytes, &metadata()).unwrap();
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.entries.len(), 1);
        let record = &outcome.entries[0];
        assert_eq!(record.roll_no, "21001");
        assert_eq!(record.name, "Asha Verma");
        assert_eq!(record.program, "BTech CSE");
        assert_eq!(record.year, "3");
        assert_eq!(record.semester, "5");
        assert_eq!(record.session, "2024-2025");
        assert_eq!(outcome.preview, vec!["1 | 21001 | Asha Verma | BTech CSE"]);
    }

    #[test]
    fn rejects_non_spreadsheet_extensions_before_parsing() {
        let result = process_bytes("students.csv", b"roll,name", &metadata());
        assert!(matches!(
            result,
            Err(UploadError::Validation(ValidationError::UnsupportedFile(_)))
        ));
    }

    #[test]
    fn rejects_missing_metadata() {
        let bytes = workbook_bytes(&[&["Roll No"], &["21001"]]);
        let mut incomplete = metadata();
        incomplete.semester = String::new();
        let result = process_bytes("s.xlsx", &bytes, &incomplete);
        assert!(matches!(
            result,
            Err(UploadError::Validation(ValidationError::MissingMetadata(
                "semester"
            )))
        ));
    }

    #[test]
    fn warns_when_identity_headers_are_missing_but_still_maps() {
        let bytes = workbook_bytes(&[
            &["S.No", "Organization"],
            &["1", "Acme Labs"],
        ]);
        let outcome = process_bytes("s.xlsx", &bytes, &metadata()).unwrap();
        assert_eq!(outcome.warnings, vec![UploadWarning::FieldInference]);
        // Synthesis still produces a usable record.
        assert_eq!(outcome.entries[0].roll_no, "R1000");
        assert_eq!(outcome.entries[0].name, "Student 1");
        assert_eq!(outcome.entries[0].organization, "Acme Labs");
    }

    #[test]
    fn preview_covers_at_most_five_rows() {
        let rows: Vec<Vec<&str>> = (0..8)
            .map(|i| vec![if i == 0 { "Roll No" } else { "21001" }, "x"])
            .collect();
        let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
        let bytes = workbook_bytes(&rows);
        let outcome = process_bytes("s.xlsx", &bytes, &metadata()).unwrap();
        assert_eq!(outcome.preview.len(), 5);
        assert_eq!(outcome.entries.len(), 7);
    }

    #[tokio::test]
    async fn reads_and_processes_from_disk() {
        let bytes = workbook_bytes(&[
            &["Roll No", "Name"],
            &["21001", "Asha Verma"],
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.xlsx");
        std::fs::write(&path, bytes).unwrap();
        let outcome = process(&path, &metadata()).await.unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].name, "Asha Verma");
    }
}
