#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stateless geometry primitives for the compliance checks.
//!
//! Everything here is a pure function over [`Point`] and [`Polygon`]
//! values. Containment and distance are delegated to `geo`; coordinates
//! are mapped to `geo`'s `x = lon, y = lat` convention at the boundary.
//!
//! Boundary policy: a point lying exactly on a polygon edge or vertex is
//! **not** contained. This follows `geo::Contains`, which tests against
//! the polygon interior, and is applied uniformly without special cases.

use geo::{Area, BoundingRect, Centroid, Contains, Distance, Haversine, LineString, MultiPoint};
use permit_geometry_models::{Point, Polygon};

/// A polygon converted once into `geo` form, with its bounding box.
///
/// Build this when the same boundary is tested against many points.
#[derive(Debug, Clone)]
pub struct PreparedPolygon {
    polygon: geo::Polygon<f64>,
    min: [f64; 2],
    max: [f64; 2],
}

impl PreparedPolygon {
    /// Converts a validated polygon.
    #[must_use]
    pub fn new(polygon: &Polygon) -> Self {
        let exterior: LineString<f64> = polygon.ring().iter().map(|p| (p.lon, p.lat)).collect();
        let polygon = geo::Polygon::new(exterior, vec![]);

        let (min, max) = polygon.bounding_rect().map_or(([0.0, 0.0], [0.0, 0.0]), |rect| {
            ([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
        });

        Self { polygon, min, max }
    }

    /// Whether `point` lies in the polygon interior.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if point.lon < self.min[0]
            || point.lon > self.max[0]
            || point.lat < self.min[1]
            || point.lat > self.max[1]
        {
            return false;
        }
        self.polygon.contains(&to_geo_point(point))
    }

    /// Lower-left and upper-right corners as `[lon, lat]`.
    #[must_use]
    pub const fn envelope(&self) -> ([f64; 2], [f64; 2]) {
        (self.min, self.max)
    }

    /// Planar area in square degrees. Only meaningful for ranking.
    #[must_use]
    pub fn planar_area(&self) -> f64 {
        self.polygon.unsigned_area()
    }
}

/// Tests whether `point` is inside `polygon`.
///
/// Points on the boundary return `false`, as do zero-area (collinear)
/// rings.
#[must_use]
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    PreparedPolygon::new(polygon).contains(point)
}

/// Great-circle (haversine) distance between two points in meters.
#[must_use]
pub fn distance_meters(a: Point, b: Point) -> f64 {
    Haversine.distance(to_geo_point(a), to_geo_point(b))
}

/// Arithmetic mean of the polygon's distinct ring vertices.
#[must_use]
pub fn centroid(polygon: &Polygon) -> Point {
    centroid_of(polygon.vertices()).unwrap_or_else(|| polygon.ring()[0])
}

/// Arithmetic mean of a set of points, `None` when empty.
#[must_use]
pub fn centroid_of(points: &[Point]) -> Option<Point> {
    let multi: MultiPoint<f64> = points.iter().map(|p| to_geo_point(*p)).collect();
    multi.centroid().map(|c| Point::new(c.y(), c.x()))
}

fn to_geo_point(point: Point) -> geo::Point<f64> {
    geo::Point::new(point.lon, point.lat)
}
