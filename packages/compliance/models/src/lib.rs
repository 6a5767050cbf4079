#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Business application and compliance report types.
//!
//! The [`ComplianceChecks`] document is what storage persists alongside a
//! new application, so its JSON shape (`camelCase` fields,
//! `SCREAMING_SNAKE_CASE` enums) is part of the external contract.

use chrono::{DateTime, Utc};
use permit_geometry_models::Point;
use permit_zoning_models::{HazardSeverity, HazardType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle status of a business application.
///
/// The automated evaluator only ever produces [`Self::Pending`],
/// [`Self::UnderReview`], or [`Self::RequiresRevision`]. Approval and
/// rejection are reviewer decisions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Passed automated checks, awaiting human review.
    Pending,
    /// Needs a closer look (proximity rule violated).
    UnderReview,
    /// Applicant must change the application (zoning or hazard failure).
    RequiresRevision,
    /// Approved by a reviewer.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
}

/// A business application as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Storage identifier.
    pub id: String,
    /// Human-readable application number (e.g. "BP-2025-00042").
    #[serde(default)]
    pub application_number: String,
    /// Registered business name.
    pub business_name: String,
    /// Owner's full name.
    #[serde(default)]
    pub owner_name: String,
    /// Owner contact (phone or email).
    #[serde(default)]
    pub owner_contact: Option<String>,
    /// Business location.
    pub location: Point,
    /// The [`BusinessCategory`](permit_zoning_models::BusinessCategory) id.
    pub category_id: String,
    /// Matched zone id, `None` when outside every zone.
    #[serde(default)]
    pub zone_id: Option<String>,
    /// Administrative area (barangay) name.
    #[serde(default)]
    pub barangay: Option<String>,
    /// Current lifecycle status.
    pub status: ApplicationStatus,
    /// Compliance report produced at submission.
    #[serde(default)]
    pub compliance_checks: Option<ComplianceChecks>,
    /// Risk flags produced at submission.
    #[serde(default)]
    pub risk_flags: Vec<RiskFlag>,
    /// When the application was submitted.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// When a reviewer last acted on it.
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When it was approved.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// When it was rejected.
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl Business {
    /// Whether a reviewer has approved this business.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == ApplicationStatus::Approved
    }
}

/// The spatial part of an incoming application.
///
/// Everything else the applicant submits is ignored by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicationRequest {
    /// Proposed business location.
    pub location: Point,
    /// Chosen business category id.
    pub category_id: String,
    /// Administrative area id.
    #[serde(default)]
    pub barangay_id: Option<String>,
    /// Proposed business name, for logging.
    #[serde(default)]
    pub business_name: Option<String>,
}

/// Outcome of the zoning check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCheck {
    /// Whether the category may operate in the matched zone.
    pub passed: bool,
    /// Matched zone name. Serialized as `null` when no zone matched.
    pub zone: Option<String>,
    /// Matched zone type name. Serialized as `null` when no zone matched.
    pub zone_type: Option<String>,
    /// Explanation for the applicant.
    pub message: String,
}

/// An approved same-category business that is too close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityViolation {
    /// Storage id of the existing business.
    pub business_id: String,
    /// Name of the existing business.
    pub business_name: String,
    /// Actual distance in whole meters.
    pub distance: f64,
    /// Required minimum distance in meters.
    pub required: f64,
}

/// Outcome of the minimum-distance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityCheck {
    /// Whether no existing business is too close.
    pub passed: bool,
    /// Every violating business, in input order.
    pub violations: Vec<ProximityViolation>,
}

/// A hazard zone containing the application point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardHit {
    /// Hazard kind.
    #[serde(rename = "type")]
    pub hazard_type: HazardType,
    /// Hazard severity.
    pub severity: HazardSeverity,
    /// Hazard zone name.
    pub name: String,
}

/// Outcome of the hazard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardCheck {
    /// Whether the point is outside every hazard zone.
    pub passed: bool,
    /// Every hazard containing the point, in input order.
    pub hazards: Vec<HazardHit>,
}

/// The persisted compliance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceChecks {
    /// Zoning result.
    pub zone_check: ZoneCheck,
    /// Minimum-distance result.
    pub proximity_check: ProximityCheck,
    /// Hazard result.
    pub hazard_check: HazardCheck,
}

impl ComplianceChecks {
    /// Whether all three checks passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.zone_check.passed && self.proximity_check.passed && self.hazard_check.passed
    }
}

/// What raised a risk flag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlagType {
    /// The location lies inside a hazard zone.
    HazardZone,
    /// The location is too close to an approved same-category business.
    ProximityViolation,
}

/// An informational risk marker attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFlag {
    /// Flag source.
    #[serde(rename = "type")]
    pub flag_type: RiskFlagType,
    /// Severity of the underlying risk.
    pub severity: HazardSeverity,
    /// Explanation for reviewers.
    pub message: String,
    /// Hazard zone name, for hazard flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_name: Option<String>,
    /// Conflicting business name, for proximity flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

/// Everything the evaluator decides for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    /// Initial application status.
    pub status: ApplicationStatus,
    /// Resolved zone id to persist on the application.
    pub matched_zone_id: Option<String>,
    /// The three check outcomes.
    pub compliance_checks: ComplianceChecks,
    /// Informational risk flags.
    pub risk_flags: Vec<RiskFlag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliance_checks_use_wire_field_names() {
        let checks = ComplianceChecks {
            zone_check: ZoneCheck {
                passed: true,
                zone: Some("Poblacion Commercial".to_string()),
                zone_type: Some("Commercial Zone".to_string()),
                message: "ok".to_string(),
            },
            proximity_check: ProximityCheck {
                passed: false,
                violations: vec![ProximityViolation {
                    business_id: "b-1".to_string(),
                    business_name: "Kape Kubo".to_string(),
                    distance: 120.0,
                    required: 200.0,
                }],
            },
            hazard_check: HazardCheck {
                passed: false,
                hazards: vec![HazardHit {
                    hazard_type: HazardType::Flood,
                    severity: HazardSeverity::High,
                    name: "Tuganay floodplain".to_string(),
                }],
            },
        };

        let json = serde_json::to_value(&checks).unwrap();
        assert_eq!(json["zoneCheck"]["zoneType"], "Commercial Zone");
        assert_eq!(json["proximityCheck"]["violations"][0]["businessName"], "Kape Kubo");
        assert_eq!(json["proximityCheck"]["violations"][0]["required"], 200.0);
        assert_eq!(json["hazardCheck"]["hazards"][0]["type"], "FLOOD");
        assert_eq!(json["hazardCheck"]["hazards"][0]["severity"], "HIGH");
        assert!(!checks.all_passed());
    }

    #[test]
    fn unmatched_zone_check_serializes_nulls() {
        let check = ZoneCheck {
            passed: false,
            zone: None,
            zone_type: None,
            message: "Location is not in any defined zone.".to_string(),
        };

        let json = serde_json::to_value(&check).unwrap();
        assert!(json["zone"].is_null());
        assert!(json["zoneType"].is_null());
        assert!(json.get("zoneType").is_some());
    }

    #[test]
    fn risk_flag_omits_absent_names() {
        let flag = RiskFlag {
            flag_type: RiskFlagType::HazardZone,
            severity: HazardSeverity::VeryHigh,
            message: "Location is in a VERY_HIGH flood hazard zone".to_string(),
            hazard_name: Some("Tuganay floodplain".to_string()),
            business_name: None,
        };

        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["type"], "HAZARD_ZONE");
        assert_eq!(json["hazardName"], "Tuganay floodplain");
        assert!(json.get("businessName").is_none());
    }

    #[test]
    fn business_deserializes_with_optional_fields_missing() {
        let json = serde_json::json!({
            "id": "b-7",
            "businessName": "Sari-sari ni Aling Nena",
            "location": { "lat": 7.51, "lon": 125.63 },
            "categoryId": "cat-sari",
            "status": "APPROVED"
        });

        let business: Business = serde_json::from_value(json).unwrap();
        assert!(business.is_approved());
        assert!(business.risk_flags.is_empty());
        assert!(business.compliance_checks.is_none());
        assert_eq!(business.status.to_string(), "APPROVED");
    }
}
