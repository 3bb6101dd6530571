use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "progress-port.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: Defaults,
    pub sample: SampleSizes,
}

/// Values used when an import does not spell out its metadata.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub session: String,
    pub program: String,
    pub faculty_coordinator: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            session: "2024-2025".to_owned(),
            program: "BTech CSE".to_owned(),
            faculty_coordinator: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SampleSizes {
    pub project_groups: usize,
    pub internships: usize,
}

impl Default for SampleSizes {
    fn default() -> Self {
        SampleSizes {
            project_groups: 4,
            internships: 8,
        }
    }
}

impl Config {
    pub fn load(file_name: &str) -> Result<Config> {
        let text = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {file_name}"))?;
        toml::from_str(&text)
            .wrap_err_with(|| format!("cannot parse configuration file {file_name}"))
    }

    /// Load an explicitly named file (must exist), or the default file if it
    /// is present, or fall back to built-in defaults.
    pub fn load_or_default(file_name: Option<&str>) -> Result<Config> {
        match file_name {
            Some(name) => Config::load(name),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::load(DEFAULT_CONFIG_FILE),
            None => Ok(Config::default()),
        }
    }
}
