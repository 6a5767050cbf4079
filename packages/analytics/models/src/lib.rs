#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Business density clustering parameters and result types.
//!
//! Defines the input rows, tuning parameters, and the dashboard-facing
//! cluster report produced by the clustering analyzer.

use permit_geometry_models::Point;
use serde::{Deserialize, Serialize};

/// Default neighbour radius in meters.
pub const DEFAULT_RADIUS_METERS: f64 = 1000.0;

/// Default minimum cluster size.
pub const DEFAULT_MIN_POINTS: usize = 3;

/// How points are grouped into clusters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterMode {
    /// Single-linkage connected components of the radius graph. Points are
    /// only consumed by clusters that reach the minimum size.
    #[default]
    Connected,
    /// Single pass in input order: each unvisited seed claims every later
    /// unvisited point within the radius of the seed. Claimed points stay
    /// claimed even when the candidate is too small to keep, so they can
    /// never join a later cluster. Kept to reproduce historical outputs.
    Legacy,
}

/// Clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Neighbour radius in meters.
    pub radius_meters: f64,
    /// Minimum number of businesses for a group to count as a cluster.
    pub min_points: usize,
    /// Grouping algorithm.
    pub mode: ClusterMode,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            min_points: DEFAULT_MIN_POINTS,
            mode: ClusterMode::default(),
        }
    }
}

/// An approved business as seen by the clustering analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBusiness {
    /// Storage identifier.
    pub id: String,
    /// Business name.
    pub business_name: String,
    /// Business category name.
    pub category: String,
    /// Administrative area (barangay), if known.
    pub barangay: Option<String>,
    /// Business location.
    pub location: Point,
}

/// One density cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// 1-based cluster number, in discovery order.
    pub id: usize,
    /// Number of member businesses.
    pub business_count: usize,
    /// Mean location of the members.
    pub center: Point,
    /// Member businesses, in input order.
    pub businesses: Vec<ClusterBusiness>,
    /// Distinct member categories, sorted.
    pub categories: Vec<String>,
    /// Distinct member barangays, sorted.
    pub barangays: Vec<String>,
}

/// Aggregate figures over a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatistics {
    /// Number of clusters found.
    pub total_clusters: usize,
    /// Number of businesses analyzed (valid locations only).
    pub total_businesses: usize,
    /// Number of businesses belonging to some cluster.
    pub clustered_businesses: usize,
    /// Mean cluster size, two decimals, 0 when there are no clusters.
    pub average_cluster_size: f64,
}

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Clusters in discovery order.
    pub clusters: Vec<Cluster>,
    /// Aggregate figures.
    pub statistics: ClusterStatistics,
}
