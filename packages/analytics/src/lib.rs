#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Business density analytics.
//!
//! Groups approved businesses into spatial clusters for the dashboard
//! using the same haversine distance as the proximity rule. Runs as an
//! on-demand batch over a snapshot; nothing here touches storage.

pub mod clustering;

pub use clustering::{analyze_clusters, cluster_inputs};

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Clustering parameters are out of range.
    #[error("Invalid clustering parameters: {message}")]
    InvalidParams {
        /// Description of what went wrong.
        message: String,
    },
}
