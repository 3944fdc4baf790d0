#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Candidate routes from an external routing service.
//!
//! Route analysis never talks to the routing service itself; it is handed
//! the [`CandidateRoute`]s produced by a [`RouteProvider`].

pub mod osrm;

use safe_route_geo_models::GeoPoint;
use safe_route_route_models::CandidateRoute;

pub use osrm::OsrmClient;

/// Errors that can occur while requesting routes.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request to the routing service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The routing service rejected the request.
    #[error("Routing service error: {message}")]
    Service {
        /// Description of what went wrong.
        message: String,
    },

    /// A route geometry was not a `LineString`.
    #[error("Unexpected route geometry: {message}")]
    Geometry {
        /// Description of what went wrong.
        message: String,
    },
}

/// Source of alternative routes between two points.
#[async_trait::async_trait]
pub trait RouteProvider: Send + Sync {
    /// Returns the alternative routes from `start` to `end`, best first.
    /// An empty list means no route exists.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] if the routing service fails.
    async fn routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Vec<CandidateRoute>, RoutingError>;
}
