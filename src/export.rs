//! CSV report sink. Consumes already-filtered, already-grouped rows; the
//! fancier report formats live outside this crate behind the same shape.

use crate::grouping::ProjectGroup;
use crate::model::Internship;
use eyre::{Result, WrapErr};
use std::path::Path;

/// One row per group member, shared fields repeated per row.
pub fn export_projects(path: &Path, groups: &[ProjectGroup]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).wrap_err("cannot open project report for writing")?;
    writer.write_record([
        "Group No",
        "Roll No",
        "Name",
        "Title",
        "Domain",
        "Faculty Mentor",
        "Industry Mentor",
        "Program",
        "Session",
    ])?;
    for group in groups {
        for student in &group.students {
            writer.write_record([
                &group.group_no,
                &student.roll_no,
                &student.name,
                &group.title,
                &group.domain,
                &group.faculty_mentor,
                &group.industry_mentor,
                &group.program,
                &group.session,
            ])?;
        }
    }
    writer.flush().wrap_err("cannot flush project report")?;
    Ok(())
}

pub fn export_internships(path: &Path, rows: &[&Internship], columns: &[String]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).wrap_err("cannot open internship report for writing")?;
    let mut header = vec![
        "Roll No",
        "Name",
        "Program",
        "Organization",
        "Dates",
        "NOC",
        "Offer Letter",
        "PoP",
        "Year",
        "Semester",
        "Session",
    ];
    header.extend(columns.iter().map(String::as_str));
    writer.write_record(&header)?;
    for row in rows {
        let mut cells = vec![
            row.roll_no.as_str(),
            row.name.as_str(),
            row.program.as_str(),
            row.organization.as_str(),
            row.dates.as_str(),
            row.noc.as_str(),
            row.offer_letter.as_str(),
            row.pop.as_str(),
            row.year.as_str(),
            row.semester.as_str(),
            row.session.as_str(),
        ];
        cells.extend(
            columns
                .iter()
                .map(|c| row.extensions.get(c).map_or("", String::as_str)),
        );
        writer.write_record(&cells)?;
    }
    writer.flush().wrap_err("cannot flush internship report")?;
    Ok(())
}
