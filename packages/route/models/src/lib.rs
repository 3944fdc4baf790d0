#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route and road-segment analysis types.

use safe_route_geo_models::GeoPoint;
use safe_route_score_models::{FeatureCounts, ScoreBreakdown};
use serde::{Deserialize, Serialize};

/// A route proposed by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    /// Path in traversal order.
    pub geometry: Vec<GeoPoint>,
    /// Total length in meters.
    pub distance_m: f64,
    /// Estimated travel time in seconds, when the routing service
    /// provides one.
    pub duration_s: Option<f64>,
}

/// One scored sample point along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSample {
    /// Position of this sample in the sample sequence.
    pub index: usize,
    /// Sample location.
    pub location: GeoPoint,
    /// Score around the sample location.
    pub breakdown: ScoreBreakdown,
}

/// Safety analysis of a single route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    /// Index of the route among the analyzed candidates.
    pub route_index: usize,
    /// Full route path.
    pub geometry: Vec<GeoPoint>,
    /// Total length in meters.
    pub distance_m: f64,
    /// Estimated travel time in seconds.
    pub duration_s: Option<f64>,
    /// Per-sample scores, in traversal order.
    pub samples: Vec<RouteSample>,
    /// Score of the counts summed over all samples.
    pub overall: ScoreBreakdown,
    /// Whether this is the recommended route among its alternatives.
    pub is_recommended: bool,
}

/// The analyses of a set of alternative routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    /// One analysis per candidate, in candidate order.
    pub routes: Vec<RouteAnalysis>,
    /// Index of the route with the highest overall score.
    pub recommended_index: usize,
}

impl RouteComparison {
    /// Returns the recommended route.
    #[must_use]
    pub fn recommended(&self) -> Option<&RouteAnalysis> {
        self.routes.get(self.recommended_index)
    }
}

/// A named road segment given as a sequence of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Street name.
    pub name: String,
    /// Road classification (`primary`, `residential`, ...).
    #[serde(default)]
    pub road_type: String,
    /// Segment nodes in order.
    pub nodes: Vec<GeoPoint>,
}

/// Safety analysis of one road segment, scored at its midpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    /// Index of the segment in the input list.
    pub segment_index: usize,
    /// Street name.
    pub name: String,
    /// Road classification.
    pub road_type: String,
    /// Mean of the segment nodes.
    pub midpoint: GeoPoint,
    /// Segment nodes in order.
    pub nodes: Vec<GeoPoint>,
    /// Score around the midpoint.
    pub breakdown: ScoreBreakdown,
}

/// Safety analysis of a set of road segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaAnalysis {
    /// Scored segments; segments with fewer than two nodes are omitted.
    pub segments: Vec<SegmentAnalysis>,
    /// Counts summed over all scored segments.
    pub totals: FeatureCounts,
    /// Score of `totals`.
    pub overall: ScoreBreakdown,
}
