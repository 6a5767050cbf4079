#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry value types shared by the permit compliance crates.
//!
//! Boundaries arrive from storage as loosely-typed `GeoJSON` blobs. This
//! crate turns them into a validated [`Geometry`] exactly once, so the
//! spatial checks downstream never see a malformed ring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in degrees, -90 to 90.
    pub lat: f64,
    /// Longitude in degrees, -180 to 180.
    pub lon: f64,
}

impl Point {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both coordinates are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Errors produced while reading or validating a geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The payload is not a `GeoJSON` geometry object.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A geometry type other than `Polygon` was supplied.
    #[error("Unsupported geometry type: {kind}")]
    UnsupportedType {
        /// The `type` member of the offending geometry.
        kind: String,
    },

    /// The polygon has no outer ring, or the ring has no positions.
    #[error("Polygon has an empty outer ring")]
    EmptyRing,

    /// A ring position has fewer than two ordinates.
    #[error("Ring position {index} has {len} ordinates, expected at least 2")]
    MalformedPosition {
        /// Position index within the ring.
        index: usize,
        /// Number of ordinates found.
        len: usize,
    },

    /// A coordinate is non-finite or out of the WGS84 range.
    #[error("Invalid coordinate at ring position {index}: lat={lat}, lon={lon}")]
    InvalidCoordinate {
        /// Position index within the ring.
        index: usize,
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },

    /// The ring has fewer than three distinct vertices.
    #[error("Polygon has {count} distinct vertices, expected at least 3")]
    TooFewVertices {
        /// Number of distinct vertices found.
        count: usize,
    },
}

/// A polygon described by a single closed outer ring.
///
/// Always holds at least four ring positions with the first equal to the
/// last, and at least three distinct vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Point>,
}

impl Polygon {
    /// Builds a polygon from an outer ring, closing it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring is empty, contains an invalid
    /// coordinate, or has fewer than three distinct vertices.
    pub fn new(mut ring: Vec<Point>) -> Result<Self, GeometryError> {
        let (Some(&first), Some(&last)) = (ring.first(), ring.last()) else {
            return Err(GeometryError::EmptyRing);
        };

        if let Some((index, p)) = ring.iter().enumerate().find(|(_, p)| !p.is_valid()) {
            return Err(GeometryError::InvalidCoordinate {
                index,
                lat: p.lat,
                lon: p.lon,
            });
        }

        if first != last {
            ring.push(first);
        }

        let distinct = ring[..ring.len() - 1]
            .iter()
            .map(|p| (p.lat.to_bits(), p.lon.to_bits()))
            .collect::<BTreeSet<_>>()
            .len();

        if distinct < 3 {
            return Err(GeometryError::TooFewVertices { count: distinct });
        }

        Ok(Self { ring })
    }

    /// The closed ring, first and last point equal.
    #[must_use]
    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    /// The ring without its closing point.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.ring[..self.ring.len() - 1]
    }

    /// Converts the polygon to a `GeoJSON` geometry (`[lon, lat]` order).
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Geometry {
        let ring = self.ring.iter().map(|p| vec![p.lon, p.lat]).collect();
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }
}

/// A validated boundary geometry.
///
/// Only polygons are supported today. Inner rings (holes) in the source
/// `GeoJSON` are ignored; the outer ring defines the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "geojson::Geometry")]
pub enum Geometry {
    /// A single-ring polygon.
    Polygon(Polygon),
}

impl Geometry {
    /// Parses and validates a `GeoJSON` geometry object.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a `GeoJSON` geometry, is not a
    /// `Polygon`, or its outer ring fails [`Polygon::new`] validation.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, GeometryError> {
        let geometry: geojson::Geometry = serde_json::from_value(value.clone())?;

        let geojson::Value::Polygon(rings) = geometry.value else {
            let kind = value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            return Err(GeometryError::UnsupportedType { kind });
        };

        let outer = rings.first().ok_or(GeometryError::EmptyRing)?;
        let ring = outer
            .iter()
            .enumerate()
            .map(|(index, position)| match position.as_slice() {
                [lon, lat, ..] => Ok(Point::new(*lat, *lon)),
                _ => Err(GeometryError::MalformedPosition {
                    index,
                    len: position.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Polygon::new(ring).map(Self::Polygon)
    }

    /// The polygon backing this geometry.
    #[must_use]
    pub const fn as_polygon(&self) -> &Polygon {
        match self {
            Self::Polygon(polygon) => polygon,
        }
    }
}

impl TryFrom<serde_json::Value> for Geometry {
    type Error = GeometryError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json_value(&value)
    }
}

impl From<Geometry> for geojson::Geometry {
    fn from(geometry: Geometry) -> Self {
        geometry.as_polygon().to_geojson()
    }
}
