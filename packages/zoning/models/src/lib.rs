#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zoning and hazard reference data.
//!
//! These are the read-only inputs to the compliance evaluator: zone
//! classifications, zone boundaries, hazard areas, and the business
//! categories with their zoning and separation rules. Boundaries are kept
//! as raw `GeoJSON` values here, exactly as storage hands them over, and
//! are validated when a spatial index is built from them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A zoning classification such as Residential or Commercial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneType {
    /// Short unique code (e.g. `"RZ"`, `"CZ"`).
    pub code: String,
    /// Display name (e.g. "Residential Zone").
    pub name: String,
    /// Longer description of the classification.
    #[serde(default)]
    pub description: Option<String>,
    /// Map display color (e.g. `"#f5d76e"`).
    #[serde(default)]
    pub color: Option<String>,
}

/// A named zoning area with a boundary and a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Storage identifier.
    pub id: String,
    /// Human-readable zone name.
    pub name: String,
    /// `GeoJSON` polygon boundary. Zones without one are never matched.
    #[serde(default)]
    pub boundary: Option<serde_json::Value>,
    /// The zone's classification.
    pub zone_type: ZoneType,
    /// Resolution priority for overlapping zones, lower wins. Only used
    /// by the priority ordering policy.
    #[serde(default)]
    pub priority: Option<i32>,
}

/// Kind of natural hazard a hazard zone describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardType {
    /// Riverine or pluvial flooding
    Flood,
    /// Rain- or earthquake-induced landslide
    Landslide,
    /// Coastal storm surge
    StormSurge,
    /// Soil liquefaction
    Liquefaction,
    /// Earthquake ground shaking / fault proximity
    GroundShaking,
    /// Fire-prone area
    Fire,
    /// Any other mapped hazard, including types this crate does not know
    #[serde(other)]
    Other,
}

impl HazardType {
    /// Lower-case label for messages (e.g. "storm surge").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Landslide => "landslide",
            Self::StormSurge => "storm surge",
            Self::Liquefaction => "liquefaction",
            Self::GroundShaking => "ground shaking",
            Self::Fire => "fire",
            Self::Other => "other",
        }
    }
}

/// Severity ranking of a hazard zone or risk flag, lowest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardSeverity {
    /// Level 1
    Low = 1,
    /// Level 2
    Moderate = 2,
    /// Level 3
    High = 3,
    /// Level 4
    VeryHigh = 4,
}

impl HazardSeverity {
    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns all variants, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Moderate, Self::High, Self::VeryHigh]
    }
}

/// A mapped hazard area. Hazard zones may overlap freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardZone {
    /// Storage identifier.
    pub id: String,
    /// Human-readable name (e.g. "Tuganay River floodplain").
    pub name: String,
    /// Hazard kind.
    #[serde(rename = "type")]
    pub hazard_type: HazardType,
    /// Severity ranking.
    pub severity: HazardSeverity,
    /// `GeoJSON` polygon boundary. Hazards without one are skipped.
    #[serde(default)]
    pub boundary: Option<serde_json::Value>,
    /// Administrative area (barangay) the hazard is recorded under.
    #[serde(default)]
    pub barangay_id: Option<String>,
}

/// A business type with its zoning allowlist and separation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCategory {
    /// Storage identifier.
    pub id: String,
    /// Display name (e.g. "Restaurant").
    pub name: String,
    /// Zone type codes in which this category may operate.
    #[serde(default)]
    pub allowed_zones: Vec<String>,
    /// Minimum separation in meters from other approved businesses of the
    /// same category. Absent or zero disables the check.
    #[serde(default)]
    pub min_distance: Option<f64>,
}

impl BusinessCategory {
    /// Whether the category may operate in zones of type `code`.
    #[must_use]
    pub fn allows_zone(&self, code: &str) -> bool {
        self.allowed_zones.iter().any(|allowed| allowed == code)
    }

    /// The separation rule in meters, if one is in force.
    #[must_use]
    pub fn proximity_rule(&self) -> Option<f64> {
        self.min_distance.filter(|d| d.is_finite() && *d > 0.0)
    }
}
