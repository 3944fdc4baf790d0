#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate math shared by the feature index and route analysis.
//!
//! * [`projection`] converts TWD97 TM2 grid coordinates (the reference
//!   system several Taipei datasets are published in) to WGS84.
//! * [`distance`] computes spherical great-circle distances.
//! * [`bbox`] builds the bounding boxes used to pre-filter large datasets
//!   before per-point spatial filtering.

pub mod bbox;
pub mod distance;
pub mod projection;

pub use distance::{EARTH_RADIUS_M, distance_meters};
pub use projection::{to_geographic, to_projected};
pub use safe_route_geo_models::{BoundingBox, GeoPoint, ProjectedPoint};
