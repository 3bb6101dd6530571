//! Mock data shown when a portal loads before any real import.

use crate::model::{Internship, Project};
use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: [&str; 8] = [
    "Asha", "Rohan", "Priya", "Kabir", "Meera", "Arjun", "Divya", "Sameer",
];
const LAST_NAMES: [&str; 8] = [
    "Verma", "Iyer", "Sharma", "Khan", "Patel", "Reddy", "Das", "Kaur",
];
const TITLES: [&str; 5] = [
    "Crop Advisor",
    "Campus Navigator",
    "Exam Cell Automation",
    "Smart Attendance",
    "Placement Tracker",
];
const DOMAINS: [&str; 4] = ["Machine Learning", "Web Development", "IoT", "Data Engineering"];
const MENTORS: [&str; 4] = ["Dr. Rao", "Dr. Banerjee", "Prof. Nair", "Dr. Kulkarni"];
const ORGANIZATIONS: [&str; 5] = [
    "Acme Labs",
    "Nimbus Analytics",
    "Trident Softworks",
    "GreenGrid Energy",
    "Quanta Health",
];

fn pick<'a>(rng: &mut impl Rng, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn full_name(rng: &mut impl Rng) -> String {
    format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES))
}

/// Generate `groups` project groups of 2 to 4 members each.
pub fn projects(groups: usize, program: &str, session: &str) -> Vec<Project> {
    let mut rng = rand::rng();
    let mut out = Vec::new();
    let mut roll = 21001;
    for g in 1..=groups {
        let title = pick(&mut rng, &TITLES);
        let domain = pick(&mut rng, &DOMAINS);
        let mentor = pick(&mut rng, &MENTORS);
        let members = rng.random_range(2..=4);
        for _ in 0..members {
            out.push(Project {
                id: format!("sample-p-{roll}"),
                group_no: format!("G{g}"),
                roll_no: roll.to_string(),
                name: full_name(&mut rng),
                title: title.to_owned(),
                domain: domain.to_owned(),
                faculty_mentor: mentor.to_owned(),
                program: program.to_owned(),
                session: session.to_owned(),
                ..Project::default()
            });
            roll += 1;
        }
    }
    out
}

pub fn internships(count: usize, program: &str, session: &str) -> Vec<Internship> {
    let mut rng = rand::rng();
    (0..count)
        .map(|n| {
            let roll = 22001 + n;
            Internship {
                id: format!("sample-i-{roll}"),
                roll_no: roll.to_string(),
                name: full_name(&mut rng),
                program: program.to_owned(),
                organization: pick(&mut rng, &ORGANIZATIONS).to_owned(),
                dates: "May 2025 - July 2025".to_owned(),
                session: session.to_owned(),
                ..Internship::default()
            }
        })
        .collect()
}
