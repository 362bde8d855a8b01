//! Seed data loading from disk.
//!
//! The seed file is a JSON document named `conf.json`. Unless an explicit
//! path is given it is looked up in `../config/` and then `config/`,
//! relative to the working directory. Contacts are read from the
//! `data.contacts` array.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::models::Contact;

/// Seed file name.
pub const CONFIG_FILE_NAME: &str = "conf.json";

/// Directories searched for [`CONFIG_FILE_NAME`], in order.
pub const CONFIG_SEARCH_DIRS: [&str; 2] = ["../config", "config"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file conf.json not found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {} has no data.contacts array", .0.display())]
    MissingContacts(PathBuf),

    #[error("cannot populate contact records from config file: {0}")]
    Contacts(#[source] serde_json::Error),

    #[error("Validation failed: {}", display_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The parsed seed document.
#[derive(Debug, Clone)]
pub struct SeedData {
    /// File the data was read from.
    pub path: PathBuf,
    /// The whole document as read.
    pub raw: Value,
    /// Contacts from `data.contacts`.
    pub contacts: Vec<Contact>,
}

/// Locate the seed file in the default search directories.
pub fn find_config_file() -> Result<PathBuf, ConfigError> {
    let searched: Vec<PathBuf> = CONFIG_SEARCH_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(CONFIG_FILE_NAME))
        .collect();

    match searched.iter().find(|path| path.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(ConfigError::NotFound { searched }),
    }
}

/// Load seed data from `path`, or from the default search directories.
pub fn load_seed(path: Option<&Path>) -> Result<SeedData, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let seed = parse_seed(&path, &content)?;
    tracing::info!(path = %seed.path.display(), contacts = seed.contacts.len(), "Seed data loaded");
    Ok(seed)
}

/// Parse a seed document already read from `path`.
pub fn parse_seed(path: &Path, content: &str) -> Result<SeedData, ConfigError> {
    let raw: Value = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let contacts = raw
        .pointer("/data/contacts")
        .cloned()
        .ok_or_else(|| ConfigError::MissingContacts(path.to_path_buf()))?;
    let contacts: Vec<Contact> = serde_json::from_value(contacts).map_err(ConfigError::Contacts)?;

    Ok(SeedData {
        path: path.to_path_buf(),
        raw,
        contacts,
    })
}
