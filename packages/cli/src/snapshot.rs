//! Reference data snapshots and application requests read from disk.

use std::path::{Path, PathBuf};

use permit_compliance_models::{Business, NewApplicationRequest};
use permit_zoning_models::{BusinessCategory, HazardZone, Zone};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors reading input files.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected shape.
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The file is not valid TOML for the expected shape.
    #[error("Failed to parse {}: {source}", path.display())]
    Toml {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// A consistent read of everything the evaluator and analyzer need.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Zoning areas, in resolution order.
    pub zones: Vec<Zone>,
    /// Hazard areas.
    pub hazard_zones: Vec<HazardZone>,
    /// Business categories.
    pub categories: Vec<BusinessCategory>,
    /// Stored business applications of any status.
    pub businesses: Vec<Business>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let snapshot: Self = read_json(path)?;
        log::info!(
            "Loaded snapshot: {} zones, {} hazard zones, {} categories, {} businesses",
            snapshot.zones.len(),
            snapshot.hazard_zones.len(),
            snapshot.categories.len(),
            snapshot.businesses.len()
        );
        Ok(snapshot)
    }
}

/// Reads an application request from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_application(path: &Path) -> Result<NewApplicationRequest, InputError> {
    read_json(path)
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}
