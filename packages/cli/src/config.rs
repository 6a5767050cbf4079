//! TOML configuration for the spatial index, the evaluator, and the
//! clustering analyzer.
//!
//! Every key is optional:
//!
//! ```toml
//! [index]
//! zone_ordering = "input_order"   # "priority" | "smallest_area"
//!
//! [evaluator]
//! flag_proximity_violations = true
//!
//! [clustering]
//! radius_meters = 1000.0
//! min_points = 3
//! mode = "connected"              # "legacy"
//! ```

use std::path::Path;

use permit_analytics_models::ClusterParams;
use permit_compliance::EvaluatorConfig;
use permit_spatial::IndexConfig;
use serde::Deserialize;

use crate::snapshot::{InputError, read_to_string};

/// Top-level configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Spatial index settings.
    pub index: IndexConfig,
    /// Compliance evaluator settings.
    pub evaluator: EvaluatorConfig,
    /// Clustering defaults.
    pub clustering: ClusterParams,
}

impl AppConfig {
    /// Loads a config file, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, InputError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|source| InputError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
