//! Minimum-distance rule between same-category businesses.

use permit_compliance_models::{Business, ProximityViolation};
use permit_geometry::distance_meters;
use permit_geometry_models::Point;

/// Finds every business closer to `point` than `min_distance` meters.
///
/// `existing` must already be restricted to approved businesses of the
/// applicant's category. A missing, non-finite, or non-positive
/// `min_distance` disables the rule and returns nothing without looking
/// at `existing`. Distances are rounded to whole meters; the comparison
/// uses the unrounded value.
#[must_use]
pub fn find_proximity_violations<'a>(
    point: Point,
    min_distance: Option<f64>,
    existing: impl IntoIterator<Item = &'a Business>,
) -> Vec<ProximityViolation> {
    let Some(required) = min_distance.filter(|d| d.is_finite() && *d > 0.0) else {
        return Vec::new();
    };

    existing
        .into_iter()
        .filter_map(|business| {
            let distance = distance_meters(point, business.location);
            (distance < required).then(|| ProximityViolation {
                business_id: business.id.clone(),
                business_name: business.business_name.clone(),
                distance: distance.round(),
                required,
            })
        })
        .collect()
}
