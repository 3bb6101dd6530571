//! Derived grouped view of the project collection.
//!
//! The grouped view is recomputed from the flat list on every read and is
//! never written through; edits always go to the flat list first.

use crate::model::Project;
use tracing::warn;

/// Label of the bucket collecting projects with a blank group number.
pub const UNGROUPED: &str = "ungrouped";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GroupMember {
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub email: String,
    pub phone_no: String,
}

/// One project group: shared fields from the first member encountered, plus
/// the ordered member list. Document slots may be backfilled by any member.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProjectGroup {
    pub group_no: String,
    pub title: String,
    pub domain: String,
    pub faculty_mentor: String,
    pub industry_mentor: String,
    pub program: String,
    pub faculty_coordinator: String,
    pub session: String,
    pub form: String,
    pub presentation: String,
    pub report: String,
    pub students: Vec<GroupMember>,
}

fn member_of(project: &Project) -> GroupMember {
    GroupMember {
        id: project.id.clone(),
        roll_no: project.roll_no.clone(),
        name: project.name.clone(),
        email: project.email.clone(),
        phone_no: project.phone_no.clone(),
    }
}

fn seed_group(label: &str, project: &Project) -> ProjectGroup {
    ProjectGroup {
        group_no: label.to_owned(),
        title: project.title.clone(),
        domain: project.domain.clone(),
        faculty_mentor: project.faculty_mentor.clone(),
        industry_mentor: project.industry_mentor.clone(),
        program: project.program.clone(),
        faculty_coordinator: project.faculty_coordinator.clone(),
        session: project.session.clone(),
        form: project.form.clone(),
        presentation: project.presentation.clone(),
        report: project.report.clone(),
        students: Vec::new(),
    }
}

/// Fold the flat project list into groups keyed by group number, sorted
/// lexicographically with blank group numbers first. The first member of each
/// group seeds the shared fields and the group header; later members only
/// extend the member list and may fill a document slot that is still empty,
/// independently per slot.
pub fn group_projects(projects: &[Project]) -> Vec<ProjectGroup> {
    let mut sorted: Vec<&Project> = projects.iter().collect();
    sorted.sort_by(|a, b| a.group_no.cmp(&b.group_no));
    let mut groups: Vec<ProjectGroup> = Vec::new();
    for project in sorted {
        let label = if project.group_no.is_empty() {
            UNGROUPED
        } else {
            &project.group_no
        };
        if !groups.last().is_some_and(|g| g.group_no == label) {
            groups.push(seed_group(label, project));
        } else if let Some(group) = groups.last_mut() {
            for (slot, value) in [
                (&mut group.form, &project.form),
                (&mut group.presentation, &project.presentation),
                (&mut group.report, &project.report),
            ] {
                if slot.is_empty() && !value.is_empty() {
                    value.clone_into(slot);
                }
            }
        }
        if let Some(group) = groups.last_mut() {
            group.students.push(member_of(project));
        }
    }
    if let Some(bucket) = groups.iter().find(|g| g.group_no == UNGROUPED) {
        let programs = bucket
            .students
            .iter()
            .filter_map(|m| projects.iter().find(|p| p.id == m.id))
            .map(|p| p.program.as_str())
            .collect::<std::collections::BTreeSet<_>>();
        if programs.len() > 1 {
            warn!(
                members = bucket.students.len(),
                "ungrouped bucket mixes students from several programs",
            );
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(roll: &str, group: &str) -> Project {
        Project {
            id: format!("p-{roll}"),
            roll_no: roll.to_owned(),
            name: format!("Student {roll}"),
            group_no: group.to_owned(),
            ..Project::default()
        }
    }

    #[test]
    fn first_member_seeds_shared_fields() {
        let mut first = project("21001", "G1");
        first.title = "Crop Advisor".to_owned();
        first.domain = "ML".to_owned();
        let mut second = project("21002", "G1");
        second.title = "Something Else".to_owned();
        let groups = group_projects(&[first, second]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "Crop Advisor");
        assert_eq!(groups[0].students.len(), 2);
    }

    #[test]
    fn document_slots_backfill_independently() {
        let mut first = project("21001", "G1");
        first.form = "proposal.pdf".to_owned();
        let mut second = project("21002", "G1");
        second.report = "report.pdf".to_owned();
        let groups = group_projects(&[first, second]);
        assert_eq!(groups[0].form, "proposal.pdf");
        assert_eq!(groups[0].report, "report.pdf");
        assert_eq!(groups[0].presentation, "");
        assert_eq!(groups[0].students.len(), 2);
    }

    #[test]
    fn blank_groups_collapse_into_a_single_first_bucket() {
        let projects = [project("21003", "G2"), project("21001", ""), project("21002", "")];
        let groups = group_projects(&projects);
        assert_eq!(groups[0].group_no, UNGROUPED);
        assert_eq!(groups[0].students.len(), 2);
        assert_eq!(groups[1].group_no, "G2");
    }

    #[test]
    fn no_member_is_lost_or_duplicated() {
        let projects = [
            project("21001", "G1"),
            project("21002", "G1"),
            project("21003", "G2"),
            project("21004", ""),
        ];
        let groups = group_projects(&projects);
        let mut rolls: Vec<String> = groups
            .iter()
            .flat_map(|g| g.students.iter().map(|m| m.roll_no.clone()))
            .collect();
        rolls.sort();
        assert_eq!(rolls, ["21001", "21002", "21003", "21004"]);
    }

    #[test]
    fn groups_sort_lexicographically() {
        let projects = [project("1", "G10"), project("2", "G2"), project("3", "G1")];
        let labels: Vec<String> = group_projects(&projects)
            .into_iter()
            .map(|g| g.group_no)
            .collect();
        assert_eq!(labels, ["G1", "G10", "G2"]);
    }
}
