//! Runs the zoning, hazard, and proximity checks and fuses the results.

use permit_compliance_models::{
    ApplicationStatus, Business, ComplianceChecks, ComplianceResult, HazardCheck, HazardHit,
    NewApplicationRequest, ProximityCheck, ProximityViolation, RiskFlag, RiskFlagType, ZoneCheck,
};
use permit_geometry_models::Point;
use permit_spatial::SpatialIndex;
use permit_zoning_models::{BusinessCategory, HazardSeverity, HazardZone, Zone};
use serde::{Deserialize, Serialize};

use crate::{ComplianceError, proximity::find_proximity_violations};

/// Tunables for [`ComplianceEvaluator`].
///
/// Zone overlap resolution belongs to the [`SpatialIndex`] and is set
/// when the index is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Emit a `PROXIMITY_VIOLATION` risk flag for every proximity
    /// violation, alongside the hazard flags.
    pub flag_proximity_violations: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            flag_proximity_violations: true,
        }
    }
}

/// Severity attached to proximity risk flags.
const PROXIMITY_FLAG_SEVERITY: HazardSeverity = HazardSeverity::Moderate;

/// Derives the initial status from the three check outcomes.
///
/// Zoning and hazard failures outrank proximity failures. All checks
/// passing yields `PENDING`, never `APPROVED`.
#[must_use]
pub const fn fuse_status(
    zone_passed: bool,
    hazard_passed: bool,
    proximity_passed: bool,
) -> ApplicationStatus {
    if !zone_passed || !hazard_passed {
        ApplicationStatus::RequiresRevision
    } else if !proximity_passed {
        ApplicationStatus::UnderReview
    } else {
        ApplicationStatus::Pending
    }
}

/// Evaluates new applications against a reference data snapshot.
///
/// Holds no state besides its configuration. Identical inputs always
/// produce an identical [`ComplianceResult`].
#[derive(Debug, Clone, Default)]
pub struct ComplianceEvaluator {
    config: EvaluatorConfig,
}

impl ComplianceEvaluator {
    /// Creates an evaluator with the given configuration.
    #[must_use]
    pub const fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// The evaluator's configuration.
    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates a raw request, looking its category up by id.
    ///
    /// # Errors
    ///
    /// * [`ComplianceError::InvalidLocation`] if the point is non-finite
    ///   or out of range
    /// * [`ComplianceError::UnknownCategory`] if no category matches
    pub fn evaluate_request(
        &self,
        request: &NewApplicationRequest,
        categories: &[BusinessCategory],
        index: &SpatialIndex,
        existing: &[Business],
    ) -> Result<ComplianceResult, ComplianceError> {
        if !request.location.is_valid() {
            return Err(ComplianceError::InvalidLocation {
                lat: request.location.lat,
                lon: request.location.lon,
            });
        }

        let category = categories
            .iter()
            .find(|c| c.id == request.category_id)
            .ok_or_else(|| ComplianceError::UnknownCategory {
                category_id: request.category_id.clone(),
            })?;

        Ok(self.evaluate(request.location, category, index, existing))
    }

    /// Evaluates an application at `point` for `category`.
    ///
    /// `existing` should hold the approved businesses of `category`.
    /// Anything else is dropped with a warning before the proximity
    /// check runs.
    #[must_use]
    pub fn evaluate(
        &self,
        point: Point,
        category: &BusinessCategory,
        index: &SpatialIndex,
        existing: &[Business],
    ) -> ComplianceResult {
        let matched_zone = index.resolve_zone(point);
        let zone_check = check_zone(matched_zone, category);

        let hazards = index.detect_hazards(point);
        let (hazard_check, mut risk_flags) = check_hazards(&hazards);

        let violations = category.proximity_rule().map_or_else(Vec::new, |min_distance| {
            find_proximity_violations(
                point,
                Some(min_distance),
                same_category_approved(category, existing),
            )
        });

        if self.config.flag_proximity_violations {
            risk_flags.extend(
                violations
                    .iter()
                    .map(|violation| proximity_flag(category, violation)),
            );
        }

        let proximity_check = ProximityCheck {
            passed: violations.is_empty(),
            violations,
        };

        let status = fuse_status(
            zone_check.passed,
            hazard_check.passed,
            proximity_check.passed,
        );

        log::debug!(
            "Evaluated {} at {point:?} ({:?} ordering): zone={} hazard={} proximity={} -> {status}",
            category.name,
            index.ordering(),
            zone_check.passed,
            hazard_check.passed,
            proximity_check.passed,
        );

        ComplianceResult {
            status,
            matched_zone_id: matched_zone.map(|zone| zone.id.clone()),
            compliance_checks: ComplianceChecks {
                zone_check,
                proximity_check,
                hazard_check,
            },
            risk_flags,
        }
    }
}

/// Restricts `existing` to approved businesses of `category`.
fn same_category_approved<'a>(
    category: &BusinessCategory,
    existing: &'a [Business],
) -> Vec<&'a Business> {
    let eligible: Vec<&Business> = existing
        .iter()
        .filter(|b| b.category_id == category.id && b.is_approved())
        .collect();

    let dropped = existing.len() - eligible.len();
    if dropped > 0 {
        log::warn!(
            "Ignoring {dropped} existing businesses that are not approved {} businesses",
            category.name
        );
    }

    eligible
}

fn check_zone(matched: Option<&Zone>, category: &BusinessCategory) -> ZoneCheck {
    let Some(zone) = matched else {
        return ZoneCheck {
            passed: false,
            zone: None,
            zone_type: None,
            message: "Location is not in any defined zone.".to_string(),
        };
    };

    let zone_type = &zone.zone_type;
    let passed = category.allows_zone(&zone_type.code);
    let message = if passed {
        format!(
            "Location is in {} ({}), which allows {}.",
            zone.name, zone_type.name, category.name
        )
    } else {
        format!(
            "{} is not allowed in {} ({}) zones.",
            category.name, zone_type.name, zone_type.code
        )
    };

    ZoneCheck {
        passed,
        zone: Some(zone.name.clone()),
        zone_type: Some(zone_type.name.clone()),
        message,
    }
}

fn check_hazards(hazards: &[&HazardZone]) -> (HazardCheck, Vec<RiskFlag>) {
    let hits = hazards
        .iter()
        .map(|hazard| HazardHit {
            hazard_type: hazard.hazard_type,
            severity: hazard.severity,
            name: hazard.name.clone(),
        })
        .collect();

    let flags = hazards
        .iter()
        .map(|hazard| RiskFlag {
            flag_type: RiskFlagType::HazardZone,
            severity: hazard.severity,
            message: format!(
                "Location is in a {} {} hazard zone: {}",
                hazard.severity,
                hazard.hazard_type.label(),
                hazard.name
            ),
            hazard_name: Some(hazard.name.clone()),
            business_name: None,
        })
        .collect();

    (
        HazardCheck {
            passed: hazards.is_empty(),
            hazards: hits,
        },
        flags,
    )
}

fn proximity_flag(category: &BusinessCategory, violation: &ProximityViolation) -> RiskFlag {
    RiskFlag {
        flag_type: RiskFlagType::ProximityViolation,
        severity: PROXIMITY_FLAG_SEVERITY,
        message: format!(
            "Location is {:.0} m from approved {} \"{}\" (minimum {:.0} m)",
            violation.distance, category.name, violation.business_name, violation.required
        ),
        hazard_name: None,
        business_name: Some(violation.business_name.clone()),
    }
}
