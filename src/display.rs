//! Stdout rendering of the two portal views.

use crate::grouping::ProjectGroup;
use crate::model::Internship;

pub fn display_projects(groups: &[ProjectGroup]) {
    for group in groups {
        if group.title.is_empty() {
            println!("{}:", group.group_no);
        } else {
            println!("{} ({}):", group.group_no, group.title);
        }
        for student in &group.students {
            println!("  - {} ({})", student.name, student.roll_no);
        }
        let documents = [
            ("form", &group.form),
            ("presentation", &group.presentation),
            ("report", &group.report),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(slot, _)| slot)
        .collect::<Vec<_>>();
        if !documents.is_empty() {
            println!("  documents: {}", documents.join(", "));
        }
        println!();
    }
}

pub fn display_internships(rows: &[&Internship], columns: &[String]) {
    let mut header = vec!["Roll No", "Name", "Program", "Organization", "Dates"];
    header.extend(columns.iter().map(String::as_str));
    println!("{}", header.join(" | "));
    for row in rows {
        let mut cells = vec![
            row.roll_no.as_str(),
            row.name.as_str(),
            row.program.as_str(),
            row.organization.as_str(),
            row.dates.as_str(),
        ];
        cells.extend(
            columns
                .iter()
                .map(|c| row.extensions.get(c).map_or("", String::as_str)),
        );
        println!("{}", cells.join(" | "));
    }
}
