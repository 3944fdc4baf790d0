#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic and projected coordinate types.
//!
//! Every other crate in the workspace speaks in terms of [`GeoPoint`]
//! (WGS84 latitude/longitude). [`ProjectedPoint`] only appears at the
//! data-access boundary, for upstream datasets published in the TWD97
//! TM2 grid.

use serde::{Deserialize, Serialize};

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, expected in `[-90, 90]`.
    pub lat: f64,
    /// Longitude, expected in `[-180, 180]`.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if both components are finite and inside the valid
    /// latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for GeoPoint {
    /// Builds a point from a `[lat, lng]` pair.
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lng]
    }
}

/// A planar coordinate in the TWD97 TM2 (121°E zone) grid, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    /// Easting, including the false easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl ProjectedPoint {
    /// Creates a new projected point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns `true` if the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }

    /// Returns a copy of this box grown by `lat_margin` degrees to the
    /// north and south and `lng_margin` degrees to the east and west.
    #[must_use]
    pub fn expanded(&self, lat_margin: f64, lng_margin: f64) -> Self {
        Self {
            west: self.west - lng_margin,
            south: self.south - lat_margin,
            east: self.east + lng_margin,
            north: self.north + lat_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_validity() {
        assert!(GeoPoint::new(25.03, 121.56).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn bbox_contains_is_edge_inclusive() {
        let bbox = BoundingBox::new(121.0, 25.0, 122.0, 26.0);
        assert!(bbox.contains(GeoPoint::new(25.0, 121.0)));
        assert!(bbox.contains(GeoPoint::new(26.0, 122.0)));
        assert!(!bbox.contains(GeoPoint::new(26.000_1, 121.5)));
    }

    #[test]
    fn bbox_expanded_grows_every_side() {
        let bbox = BoundingBox::new(121.0, 25.0, 122.0, 26.0).expanded(0.5, 0.25);
        assert_eq!(bbox, BoundingBox::new(120.75, 24.5, 122.25, 26.5));
    }
}
