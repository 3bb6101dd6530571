use crate::config::Config;
use crate::model::{Filter, FormSettings, Internship, Metadata, Project};
use crate::store::Store;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::Level;

mod config;
mod display;
mod errors;
mod export;
mod grouping;
mod headers;
mod mapper;
mod model;
mod sample;
mod sheet;
mod store;
mod upload;

#[derive(Parser)]
#[command(about = "Track student project and internship submissions", version)]
struct Options {
    /// Use FILE instead of progress-port.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
    /// Set verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Portal {
    Project,
    Internship,
}

#[derive(Subcommand)]
enum Command {
    /// Import a spreadsheet into a portal and display the merged result
    Import {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Portal::Internship)]
        portal: Portal,
        #[arg(long)]
        year: String,
        #[arg(long)]
        semester: String,
        /// Defaults to the configured program
        #[arg(long)]
        program: Option<String>,
        #[arg(long)]
        coordinator: Option<String>,
        #[arg(long)]
        session: Option<String>,
        /// Write the merged rows to a CSV report
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
        /// Do not write the CSV report
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Seed both portals with sample data and display them
    Demo {
        /// Only show rows for this program
        #[arg(long)]
        program: Option<String>,
    },
    /// Plan the fields of a submission form before sending it to the builder
    Form {
        #[arg(long, value_enum, default_value_t = Portal::Project)]
        portal: Portal,
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        semester: String,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        program: Option<String>,
        /// Optional portal field to include (repeatable)
        #[arg(long = "include", value_name = "FIELD")]
        include_fields: Vec<String>,
        /// Extra custom field (repeatable)
        #[arg(long = "custom", value_name = "FIELD")]
        custom_fields: Vec<String>,
        #[arg(long)]
        min_students: Option<u32>,
        #[arg(long)]
        max_students: Option<u32>,
    },
}

fn verbosity_level(occurrences: u8) -> Level {
    match occurrences {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn report_upload(outcome: &upload::UploadOutcome) {
    if !outcome.preview.is_empty() {
        println!("Preview:");
        for line in &outcome.preview {
            println!("  {line}");
        }
    }
    for warning in &outcome.warnings {
        println!("Warning: {warning}");
    }
}

async fn import(
    config: &Config,
    file: &Path,
    portal: Portal,
    metadata: Metadata,
    export: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let outcome = upload::process(file, &metadata).await?;
    report_upload(&outcome);
    match portal {
        Portal::Project => {
            let mut store: Store<Project> = Store::new();
            for entity in sample::projects(
                config.sample.project_groups,
                &metadata.program,
                config.defaults.session.as_str(),
            ) {
                store.insert(entity);
            }
            let batch = outcome
                .entries
                .into_iter()
                .map(Project::from_record)
                .collect();
            let stats = store.upsert_batch(batch);
            println!("Imported {} new, updated {}.", stats.inserted, stats.updated);
            let groups = grouping::group_projects(store.entities());
            display::display_projects(&groups);
            if let Some(path) = export.filter(|_| !dry_run) {
                export::export_projects(path, &groups)?;
                println!("Report written to {}", path.display());
            }
        }
        Portal::Internship => {
            let mut store: Store<Internship> = Store::new();
            for entity in sample::internships(
                config.sample.internships,
                &metadata.program,
                config.defaults.session.as_str(),
            ) {
                store.insert(entity);
            }
            let batch = outcome.entries.into_iter().map(Internship::from).collect();
            let stats = store.upsert_batch(batch);
            println!("Imported {} new, updated {}.", stats.inserted, stats.updated);
            let rows = store.apply_filter(&Filter::default());
            display::display_internships(&rows, store.dynamic_columns());
            if let Some(path) = export.filter(|_| !dry_run) {
                export::export_internships(path, &rows, store.dynamic_columns())?;
                println!("Report written to {}", path.display());
            }
        }
    }
    Ok(())
}

fn demo(config: &Config, program: Option<String>) -> Result<()> {
    let filter = Filter {
        program: program.unwrap_or_default(),
        ..Filter::default()
    };
    let mut projects: Store<Project> = Store::new();
    for entity in sample::projects(
        config.sample.project_groups,
        &config.defaults.program,
        &config.defaults.session,
    ) {
        projects.insert(entity);
    }
    let visible: Vec<Project> = projects
        .apply_filter(&filter)
        .into_iter()
        .cloned()
        .collect();
    println!("Project portal:");
    display::display_projects(&grouping::group_projects(&visible));
    let mut internships: Store<Internship> = Store::new();
    for entity in sample::internships(
        config.sample.internships,
        &config.defaults.program,
        &config.defaults.session,
    ) {
        internships.insert(entity);
    }
    println!("Internship portal:");
    display::display_internships(
        &internships.apply_filter(&filter),
        internships.dynamic_columns(),
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let options = Options::parse();
    tracing_subscriber::fmt()
        .with_max_level(verbosity_level(options.verbose))
        .init();
    let config = Config::load_or_default(options.config.as_deref())?;
    match options.command {
        Command::Import {
            file,
            portal,
            year,
            semester,
            program,
            coordinator,
            session,
            export,
            dry_run,
        } => {
            let metadata = Metadata {
                year,
                semester,
                program: program.unwrap_or_else(|| config.defaults.program.clone()),
                session: session.or_else(|| Some(config.defaults.session.clone())),
                faculty_coordinator: coordinator.or_else(|| {
                    (!config.defaults.faculty_coordinator.is_empty())
                        .then(|| config.defaults.faculty_coordinator.clone())
                }),
            };
            import(&config, &file, portal, metadata, export.as_deref(), dry_run).await
        }
        Command::Demo { program } => demo(&config, program),
        Command::Form {
            portal,
            title,
            year,
            semester,
            session,
            program,
            include_fields,
            custom_fields,
            min_students,
            max_students,
        } => {
            let settings = FormSettings {
                portal_type: match portal {
                    Portal::Project => "project".to_owned(),
                    Portal::Internship => "internship".to_owned(),
                },
                title,
                session: session.unwrap_or_else(|| config.defaults.session.clone()),
                year,
                semester,
                program,
                min_students,
                max_students,
                include_fields,
                pdf_fields: Vec::new(),
                custom_fields,
            };
            println!(
                "Form plan for {} ({}, semester {}):",
                settings.title, settings.session, settings.semester
            );
            for field in settings.field_plan() {
                let required = if field.required { ", required" } else { "" };
                println!("  - {} [{:?}{}]", field.label, field.kind, required);
            }
            Ok(())
        }
    }
}
