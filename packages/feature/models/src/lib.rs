#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Safety feature taxonomy and record types.
//!
//! Upstream datasets are mapped into [`RawRecord`]s at the data-access
//! boundary. The feature index turns the records around a query point
//! into [`Feature`]s, which live for a single query response.

use safe_route_geo_models::{GeoPoint, ProjectedPoint};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of point feature contributing to a safety score.
///
/// The serialized names (`cctv`, `metro`, ...) are part of the HTTP
/// contract and must not change.
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
pub enum FeatureKind {
    /// Surveillance camera.
    #[serde(rename = "cctv")]
    #[strum(serialize = "cctv")]
    Camera,
    /// Metro station exit.
    #[serde(rename = "metro")]
    #[strum(serialize = "metro")]
    TransitExit,
    /// Police station or police box.
    #[serde(rename = "police")]
    #[strum(serialize = "police")]
    PoliceStation,
    /// Street lamp.
    #[serde(rename = "streetlight")]
    #[strum(serialize = "streetlight")]
    Streetlight,
    /// Reported robbery incident.
    #[serde(rename = "robbery_incident")]
    #[strum(serialize = "robbery_incident")]
    IncidentReport,
}

impl FeatureKind {
    /// Returns `+1` for features that make an area safer and `-1` for
    /// those that make it less safe.
    #[must_use]
    pub const fn polarity(self) -> i8 {
        match self {
            Self::Camera | Self::TransitExit | Self::PoliceStation | Self::Streetlight => 1,
            Self::IncidentReport => -1,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Camera,
            Self::TransitExit,
            Self::PoliceStation,
            Self::Streetlight,
            Self::IncidentReport,
        ]
    }
}

/// Coordinates of a raw record as read from upstream.
///
/// Components are `None` when the upstream field was missing or could not
/// be parsed as a number; such records are skipped at query time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawCoordinates {
    /// WGS84 latitude/longitude.
    Geographic {
        /// Latitude in degrees.
        lat: Option<f64>,
        /// Longitude in degrees.
        lng: Option<f64>,
    },
    /// TWD97 TM2 grid coordinates.
    Projected {
        /// Easting in meters.
        x: Option<f64>,
        /// Northing in meters.
        y: Option<f64>,
    },
}

impl RawCoordinates {
    /// Geographic coordinates with both components present.
    #[must_use]
    pub const fn geographic(point: GeoPoint) -> Self {
        Self::Geographic {
            lat: Some(point.lat),
            lng: Some(point.lng),
        }
    }

    /// Projected coordinates with both components present.
    #[must_use]
    pub const fn projected(point: ProjectedPoint) -> Self {
        Self::Projected {
            x: Some(point.x),
            y: Some(point.y),
        }
    }
}

/// Optional, kind-specific details carried through to the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureAttributes {
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Date the incident occurred, as published upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<String>,
    /// Time band the incident occurred in, as published upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_time: Option<String>,
    /// Free-text description of the incident location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_desc: Option<String>,
}

/// One upstream record mapped onto the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Display name (camera ID, exit name, station name, ...).
    pub name: String,
    /// Position as published upstream.
    pub coordinates: RawCoordinates,
    /// Kind-specific details.
    #[serde(default)]
    pub attributes: FeatureAttributes,
}

/// A feature found within the radius of a query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature kind.
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Display name.
    pub name: String,
    /// WGS84 position.
    pub location: GeoPoint,
    /// Great-circle distance from the query point, in meters.
    pub distance_m: f64,
    /// Kind-specific details.
    #[serde(flatten)]
    pub attributes: FeatureAttributes,
}

/// Why a raw record could not be placed on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// A coordinate field was missing or not numeric.
    MissingCoordinate,
    /// A coordinate was NaN or infinite.
    NonFiniteCoordinate,
    /// The resolved point is outside the valid latitude/longitude range.
    OutOfRange {
        /// Resolved latitude.
        lat: f64,
        /// Resolved longitude.
        lng: f64,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCoordinate => write!(f, "missing coordinate"),
            Self::NonFiniteCoordinate => write!(f, "non-finite coordinate"),
            Self::OutOfRange { lat, lng } => write!(f, "coordinate ({lat}, {lng}) out of range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_incidents_are_negative() {
        for kind in FeatureKind::all() {
            let expected = if *kind == FeatureKind::IncidentReport {
                -1
            } else {
                1
            };
            assert_eq!(kind.polarity(), expected, "{kind:?}");
        }
    }

    #[test]
    fn kind_names_round_trip_through_strum() {
        for kind in FeatureKind::all() {
            let parsed: FeatureKind = kind.as_ref().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
        assert_eq!(FeatureKind::TransitExit.to_string(), "metro");
    }

    #[test]
    fn feature_serializes_with_flattened_attributes() {
        let feature = Feature {
            kind: FeatureKind::PoliceStation,
            name: "Xinyi Precinct".to_string(),
            location: GeoPoint::new(25.033, 121.565),
            distance_m: 42.0,
            attributes: FeatureAttributes {
                phone: Some("110".to_string()),
                ..FeatureAttributes::default()
            },
        };

        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["type"], "police");
        assert_eq!(json["phone"], "110");
        assert!(json.get("address").is_none());
    }
}
