#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for zone resolution and hazard detection.
//!
//! Takes a snapshot of zone and hazard reference data, validates every
//! boundary once, builds R-tree indexes over the valid ones, and answers
//! point-in-polygon lookups. The caller builds one index per snapshot and
//! passes it explicitly; there is no shared cache.
//!
//! Malformed boundaries never fail the build. They are skipped, logged,
//! and recorded as [`GeometryIssue`]s so callers can tell "outside every
//! zone" apart from "the zone covering this point is unreadable".

use permit_geometry::PreparedPolygon;
use permit_geometry_models::{Geometry, Point};
use permit_zoning_models::{HazardZone, Zone};
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// How the resolver picks one zone when several contain the point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneOrdering {
    /// First containing zone in the order the zones were supplied.
    #[default]
    InputOrder,
    /// Lowest [`Zone::priority`] wins; zones without a priority rank
    /// last. Ties fall back to input order.
    Priority,
    /// Smallest boundary wins. Ties fall back to input order.
    SmallestArea,
}

/// Settings for building a [`SpatialIndex`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Overlap policy used by [`SpatialIndex::resolve_zone`].
    pub zone_ordering: ZoneOrdering,
}

/// Which reference collection a quarantined boundary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundaryKind {
    /// A zoning area.
    Zone,
    /// A hazard area.
    Hazard,
}

/// A boundary that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryIssue {
    /// Source collection.
    pub kind: BoundaryKind,
    /// Storage id of the zone or hazard.
    pub id: String,
    /// Name of the zone or hazard.
    pub name: String,
    /// Why the boundary was rejected.
    pub reason: String,
}

/// A boundary polygon stored in the R-tree, keyed by its input position.
struct BoundaryEntry {
    position: usize,
    area: f64,
    envelope: AABB<[f64; 2]>,
    polygon: PreparedPolygon,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial indexes for one zone/hazard snapshot.
///
/// Immutable after [`SpatialIndex::build`], so one index can serve
/// concurrent evaluations.
pub struct SpatialIndex {
    zones: Vec<Zone>,
    hazards: Vec<HazardZone>,
    zone_tree: RTree<BoundaryEntry>,
    hazard_tree: RTree<BoundaryEntry>,
    ordering: ZoneOrdering,
    issues: Vec<GeometryIssue>,
}

impl SpatialIndex {
    /// Validates all boundaries and builds the R-tree indexes.
    #[must_use]
    pub fn build(zones: Vec<Zone>, hazards: Vec<HazardZone>, ordering: ZoneOrdering) -> Self {
        let mut issues = Vec::new();

        let zone_tree = Self::load_boundaries(
            zones
                .iter()
                .map(|z| (z.id.as_str(), z.name.as_str(), z.boundary.as_ref())),
            BoundaryKind::Zone,
            &mut issues,
        );
        log::info!(
            "Loaded {} of {} zones into spatial index",
            zone_tree.size(),
            zones.len()
        );

        let hazard_tree = Self::load_boundaries(
            hazards
                .iter()
                .map(|h| (h.id.as_str(), h.name.as_str(), h.boundary.as_ref())),
            BoundaryKind::Hazard,
            &mut issues,
        );
        log::info!(
            "Loaded {} of {} hazard zones into spatial index",
            hazard_tree.size(),
            hazards.len()
        );

        if !issues.is_empty() {
            log::warn!("Quarantined {} malformed boundaries", issues.len());
        }

        Self {
            zones,
            hazards,
            zone_tree,
            hazard_tree,
            ordering,
            issues,
        }
    }

    /// Builds an index with the settings in `config`.
    #[must_use]
    pub fn with_config(zones: Vec<Zone>, hazards: Vec<HazardZone>, config: &IndexConfig) -> Self {
        Self::build(zones, hazards, config.zone_ordering)
    }

    fn load_boundaries<'a>(
        boundaries: impl Iterator<Item = (&'a str, &'a str, Option<&'a serde_json::Value>)>,
        kind: BoundaryKind,
        issues: &mut Vec<GeometryIssue>,
    ) -> RTree<BoundaryEntry> {
        let mut entries = Vec::new();

        for (position, (id, name, boundary)) in boundaries.enumerate() {
            let Some(boundary) = boundary.filter(|b| !b.is_null()) else {
                log::debug!("{kind} {id} has no boundary, skipping");
                continue;
            };

            let geometry = match Geometry::from_json_value(boundary) {
                Ok(geometry) => geometry,
                Err(e) => {
                    log::warn!("Failed to parse boundary for {kind} {id} ({name}): {e}");
                    issues.push(GeometryIssue {
                        kind,
                        id: id.to_string(),
                        name: name.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let polygon = PreparedPolygon::new(geometry.as_polygon());
            let (min, max) = polygon.envelope();

            entries.push(BoundaryEntry {
                position,
                area: polygon.planar_area(),
                envelope: AABB::from_corners(min, max),
                polygon,
            });
        }

        RTree::bulk_load(entries)
    }

    fn containing(tree: &RTree<BoundaryEntry>, point: Point) -> Vec<&BoundaryEntry> {
        let query_env = AABB::from_point([point.lon, point.lat]);

        tree.locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.contains(point))
            .collect()
    }

    /// Finds the zone containing `point`, if any.
    ///
    /// When zones overlap, the winner is chosen by the index's
    /// [`ZoneOrdering`]. The result never depends on R-tree traversal
    /// order.
    #[must_use]
    pub fn resolve_zone(&self, point: Point) -> Option<&Zone> {
        if !point.is_valid() {
            log::warn!("Cannot resolve zone for invalid point {point:?}");
            return None;
        }

        let candidates = Self::containing(&self.zone_tree, point);

        if candidates.len() > 1 {
            log::debug!(
                "{} overlapping zones contain {point:?}, resolving by {:?}",
                candidates.len(),
                self.ordering
            );
        }

        let winner = match self.ordering {
            ZoneOrdering::InputOrder => candidates.into_iter().min_by_key(|e| e.position),
            ZoneOrdering::Priority => candidates.into_iter().min_by_key(|e| {
                let priority = self.zones[e.position].priority;
                (priority.is_none(), priority.unwrap_or_default(), e.position)
            }),
            ZoneOrdering::SmallestArea => candidates.into_iter().min_by(|a, b| {
                a.area
                    .total_cmp(&b.area)
                    .then_with(|| a.position.cmp(&b.position))
            }),
        };

        winner.map(|e| &self.zones[e.position])
    }

    /// Finds every hazard zone containing `point`, in input order.
    #[must_use]
    pub fn detect_hazards(&self, point: Point) -> Vec<&HazardZone> {
        if !point.is_valid() {
            log::warn!("Cannot detect hazards for invalid point {point:?}");
            return Vec::new();
        }

        let mut positions: Vec<usize> = Self::containing(&self.hazard_tree, point)
            .into_iter()
            .map(|e| e.position)
            .collect();
        positions.sort_unstable();

        positions.into_iter().map(|i| &self.hazards[i]).collect()
    }

    /// Boundaries rejected while building the index.
    #[must_use]
    pub fn issues(&self) -> &[GeometryIssue] {
        &self.issues
    }

    /// The overlap policy used by [`Self::resolve_zone`].
    #[must_use]
    pub const fn ordering(&self) -> ZoneOrdering {
        self.ordering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_zoning_models::{HazardSeverity, HazardType, ZoneType};
    use serde_json::json;

    fn square(lat: f64, lon: f64, size: f64) -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [lon, lat],
                [lon + size, lat],
                [lon + size, lat + size],
                [lon, lat + size],
                [lon, lat]
            ]]
        })
    }

    fn zone(id: &str, code: &str, boundary: Option<serde_json::Value>) -> Zone {
        Zone {
            id: id.to_string(),
            name: format!("Zone {id}"),
            boundary,
            zone_type: ZoneType {
                code: code.to_string(),
                name: code.to_string(),
                description: None,
                color: None,
            },
            priority: None,
        }
    }

    fn hazard(id: &str, boundary: Option<serde_json::Value>) -> HazardZone {
        HazardZone {
            id: id.to_string(),
            name: format!("Hazard {id}"),
            hazard_type: HazardType::Flood,
            severity: HazardSeverity::High,
            boundary,
            barangay_id: None,
        }
    }

    const INSIDE: Point = Point::new(7.505, 125.625);

    #[test]
    fn first_match_wins_for_overlapping_zones() {
        let zones = vec![
            zone("a", "RZ", Some(square(7.5, 125.62, 0.02))),
            zone("b", "CZ", Some(square(7.5, 125.62, 0.01))),
        ];
        let index = SpatialIndex::build(zones, vec![], ZoneOrdering::InputOrder);

        for _ in 0..10 {
            assert_eq!(index.resolve_zone(INSIDE).map(|z| z.id.as_str()), Some("a"));
        }
    }

    #[test]
    fn first_match_follows_supplied_order() {
        let zones = vec![
            zone("b", "CZ", Some(square(7.5, 125.62, 0.01))),
            zone("a", "RZ", Some(square(7.5, 125.62, 0.02))),
        ];
        let index = SpatialIndex::build(zones, vec![], ZoneOrdering::InputOrder);

        assert_eq!(index.resolve_zone(INSIDE).map(|z| z.id.as_str()), Some("b"));
    }

    #[test]
    fn priority_ordering_prefers_lowest_priority() {
        let mut low = zone("low", "CZ", Some(square(7.5, 125.62, 0.01)));
        low.priority = Some(1);
        let mut high = zone("high", "RZ", Some(square(7.5, 125.62, 0.02)));
        high.priority = Some(5);
        let unranked = zone("none", "IZ", Some(square(7.5, 125.62, 0.03)));

        let index = SpatialIndex::build(vec![unranked, high, low], vec![], ZoneOrdering::Priority);

        assert_eq!(index.resolve_zone(INSIDE).map(|z| z.id.as_str()), Some("low"));
    }

    #[test]
    fn smallest_area_ordering_prefers_tightest_zone() {
        let zones = vec![
            zone("big", "RZ", Some(square(7.5, 125.62, 0.02))),
            zone("small", "CZ", Some(square(7.5, 125.62, 0.01))),
        ];
        let index = SpatialIndex::build(zones, vec![], ZoneOrdering::SmallestArea);

        assert_eq!(
            index.resolve_zone(INSIDE).map(|z| z.id.as_str()),
            Some("small")
        );
    }

    #[test]
    fn config_selects_ordering() {
        let zones = vec![
            zone("big", "CZ", Some(square(7.5, 125.62, 0.02))),
            zone("small", "RZ", Some(square(7.5, 125.62, 0.01))),
        ];
        let config = IndexConfig {
            zone_ordering: ZoneOrdering::SmallestArea,
        };
        let index = SpatialIndex::with_config(zones, vec![], &config);

        assert_eq!(index.ordering(), ZoneOrdering::SmallestArea);
        assert_eq!(
            index.resolve_zone(INSIDE).map(|z| z.id.as_str()),
            Some("small")
        );
        assert_eq!(
            SpatialIndex::with_config(vec![], vec![], &IndexConfig::default()).ordering(),
            ZoneOrdering::InputOrder
        );
    }

    #[test]
    fn zones_without_boundary_never_match() {
        let zones = vec![
            zone("empty", "RZ", None),
            zone("real", "CZ", Some(square(7.5, 125.62, 0.01))),
        ];
        let index = SpatialIndex::build(zones, vec![], ZoneOrdering::InputOrder);

        assert_eq!(
            index.resolve_zone(INSIDE).map(|z| z.id.as_str()),
            Some("real")
        );
        assert!(index.issues().is_empty());
    }

    #[test]
    fn point_outside_all_zones_resolves_to_none() {
        let zones = vec![zone("a", "RZ", Some(square(7.5, 125.62, 0.01)))];
        let index = SpatialIndex::build(zones, vec![], ZoneOrdering::InputOrder);

        assert!(index.resolve_zone(Point::new(8.0, 126.0)).is_none());
        assert!(index.resolve_zone(Point::new(f64::NAN, 125.625)).is_none());
    }

    #[test]
    fn malformed_boundaries_are_quarantined() {
        let zones = vec![
            zone("bad", "RZ", Some(json!({ "type": "Point", "coordinates": [125.6, 7.5] }))),
            zone("good", "CZ", Some(square(7.5, 125.62, 0.01))),
        ];
        let hazards = vec![
            hazard("broken", Some(json!({ "type": "Polygon", "coordinates": [[[125.6, 7.5]]] }))),
            hazard("flood", Some(square(7.5, 125.62, 0.01))),
        ];
        let index = SpatialIndex::build(zones, hazards, ZoneOrdering::InputOrder);

        assert_eq!(index.issues().len(), 2);
        assert_eq!(index.issues()[0].kind, BoundaryKind::Zone);
        assert_eq!(index.issues()[0].id, "bad");
        assert_eq!(index.issues()[1].kind, BoundaryKind::Hazard);
        assert_eq!(index.issues()[1].id, "broken");

        assert_eq!(
            index.resolve_zone(INSIDE).map(|z| z.id.as_str()),
            Some("good")
        );
        let found: Vec<&str> = index
            .detect_hazards(INSIDE)
            .iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(found, vec!["flood"]);
    }

    #[test]
    fn detects_all_overlapping_hazards_in_input_order() {
        let hazards = vec![
            hazard("h1", Some(square(7.5, 125.62, 0.02))),
            hazard("h2", None),
            hazard("h3", Some(square(7.6, 125.62, 0.01))),
            hazard("h4", Some(square(7.5, 125.62, 0.01))),
        ];
        let index = SpatialIndex::build(vec![], hazards, ZoneOrdering::InputOrder);

        let found: Vec<&str> = index
            .detect_hazards(INSIDE)
            .iter()
            .map(|h| h.id.as_str())
            .collect();
        assert_eq!(found, vec!["h1", "h4"]);
        assert!(index.detect_hazards(Point::new(9.0, 120.0)).is_empty());
    }
}
