#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route sampling and safety analysis.
//!
//! Everything here is a pure computation over already-loaded feature
//! datasets; fetching and caching happen in the caller before any route
//! is analyzed.

pub mod analyzer;
pub mod sampler;
pub mod segments;

pub use analyzer::{PointScore, analyze_route, analyze_routes, recommend, score_point};
pub use safe_route_route_models as models;
pub use sampler::{sample, sample_interval};
pub use segments::analyze_segments;

/// Errors for requests that cannot be analyzed.
///
/// These are raised before any scoring happens, so there is never a
/// partial result.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// A route needs at least two points.
    #[error("route has {count} point(s); at least 2 are required")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
    },

    /// No candidate routes were supplied.
    #[error("no routes to analyze")]
    NoRoutes,

    /// The search radius is not a positive finite number.
    #[error("invalid search radius: {radius_m}")]
    InvalidRadius {
        /// Radius supplied, in meters.
        radius_m: f64,
    },

    /// A coordinate is non-finite or out of range.
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate {
        /// Latitude supplied.
        lat: f64,
        /// Longitude supplied.
        lng: f64,
    },
}

pub(crate) fn validate_radius(radius_m: f64) -> Result<(), RouteError> {
    if radius_m.is_finite() && radius_m > 0.0 {
        Ok(())
    } else {
        Err(RouteError::InvalidRadius { radius_m })
    }
}

pub(crate) fn validate_points(points: &[safe_route_geo::GeoPoint]) -> Result<(), RouteError> {
    match points.iter().find(|p| !p.is_valid()) {
        Some(p) => Err(RouteError::InvalidCoordinate {
            lat: p.lat,
            lng: p.lng,
        }),
        None => Ok(()),
    }
}
