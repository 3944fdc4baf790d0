#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the safe-route server.
//!
//! Field names are snake case and match what existing map clients
//! already read (`cctv_count`, `overall_score`, `recommended_route_index`,
//! ...). They are separate from the analysis types so the wire format can
//! stay fixed while the analysis evolves.

use chrono::{DateTime, FixedOffset, TimeZone as _, Utc};
use safe_route_feature_models::{Feature, FeatureAttributes, FeatureKind};
use safe_route_geo_models::GeoPoint;
use safe_route_route_models::{AreaAnalysis, RoadSegment, RouteAnalysis, SegmentAnalysis};
use safe_route_score_models::ScoreBreakdown;
use serde::{Deserialize, Serialize};

/// Query point used when the client sends none (Taipei 101).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(25.033_964, 121.564_468);

/// Search radius used when the client sends none.
pub const DEFAULT_RADIUS_M: f64 = 200.0;

/// Time zone echoed when the client sends none.
pub const DEFAULT_TZ: &str = "Asia/Taipei";

/// Number of nearest features returned per category by the point query.
pub const RESOURCES_PER_KIND: usize = 2;

const fn default_radius_m() -> f64 {
    DEFAULT_RADIUS_M
}

/// The query time used when the client sends none.
#[must_use]
pub fn default_at() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .and_then(|taipei| taipei.with_ymd_and_hms(2025, 11, 8, 23, 0, 0).single())
        .unwrap_or_else(|| Utc::now().fixed_offset())
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Per-kind feature counts, as the map clients name them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCounts {
    /// Cameras.
    pub cctv_count: u32,
    /// Metro exits.
    pub metro_count: u32,
    /// Robbery incidents.
    pub robbery_count: u32,
    /// Street lamps.
    pub streetlight_count: u32,
    /// Police stations.
    pub police_count: u32,
}

impl From<&ScoreBreakdown> for ApiCounts {
    fn from(breakdown: &ScoreBreakdown) -> Self {
        Self {
            cctv_count: breakdown.camera_count,
            metro_count: breakdown.transit_count,
            robbery_count: breakdown.incident_count,
            streetlight_count: breakdown.streetlight_count,
            police_count: breakdown.police_count,
        }
    }
}

// ── Point query ─────────────────────────────────────────────────────────

/// Query parameters for `GET /api/safety`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafetyQueryParams {
    /// Query latitude.
    pub center_lat: Option<f64>,
    /// Query longitude.
    pub center_lng: Option<f64>,
    /// Search radius in meters.
    pub radius_m: Option<f64>,
    /// Query time (RFC 3339). Echoed back; scoring is time-independent.
    pub at: Option<DateTime<FixedOffset>>,
    /// IANA time zone name. Echoed back.
    pub tz: Option<String>,
}

impl SafetyQueryParams {
    /// The query point, with defaults filled in.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            self.center_lat.unwrap_or(DEFAULT_CENTER.lat),
            self.center_lng.unwrap_or(DEFAULT_CENTER.lng),
        )
    }

    /// The search radius, with the default filled in.
    #[must_use]
    pub fn radius_m(&self) -> f64 {
        self.radius_m.unwrap_or(DEFAULT_RADIUS_M)
    }

    /// Builds the `meta` block echoed in the response.
    #[must_use]
    pub fn meta(&self) -> SafetyMeta {
        SafetyMeta {
            at: self.at.unwrap_or_else(default_at),
            center: self.center(),
            radius_m: self.radius_m(),
            tz: self.tz.clone().unwrap_or_else(|| DEFAULT_TZ.to_string()),
        }
    }
}

/// Echo of the point query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyMeta {
    /// Query time.
    pub at: DateTime<FixedOffset>,
    /// Query point.
    pub center: GeoPoint,
    /// Search radius in meters.
    pub radius_m: f64,
    /// Time zone name.
    pub tz: String,
}

/// Score of a single point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetySummary {
    /// Score in `[0, 100]`.
    pub safety_score: f64,
    /// Safety level (1-3).
    pub level: u8,
    /// Level label.
    pub label: String,
    /// Counts within the radius.
    pub analysis: ApiCounts,
}

impl From<&ScoreBreakdown> for SafetySummary {
    fn from(breakdown: &ScoreBreakdown) -> Self {
        Self {
            safety_score: breakdown.score,
            level: breakdown.level.value(),
            label: breakdown.level.label().to_string(),
            analysis: breakdown.into(),
        }
    }
}

/// A nearby feature as shown on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResource {
    /// `1` if the feature makes the area safer, `-1` otherwise.
    pub safety: i8,
    /// Feature kind.
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Display name.
    pub name: String,
    /// Feature position.
    pub location: GeoPoint,
    /// Distance from the query point, rounded to whole meters.
    pub distance_m: u64,
    /// Kind-specific details.
    #[serde(flatten)]
    pub attributes: FeatureAttributes,
}

impl From<&Feature> for ApiResource {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from(feature: &Feature) -> Self {
        Self {
            safety: feature.kind.polarity(),
            kind: feature.kind,
            name: feature.name.clone(),
            location: feature.location,
            distance_m: feature.distance_m.round().max(0.0) as u64,
            attributes: feature.attributes.clone(),
        }
    }
}

/// The nearest features of each category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyResources {
    /// Cameras.
    pub cctv: Vec<ApiResource>,
    /// Metro exits.
    pub metro: Vec<ApiResource>,
    /// Robbery incidents.
    pub criminal: Vec<ApiResource>,
    /// Street lamps.
    pub streetlight: Vec<ApiResource>,
    /// Police stations.
    pub police: Vec<ApiResource>,
}

impl SafetyResources {
    /// Keeps the `per_kind` nearest features of each category.
    #[must_use]
    pub fn nearest(features: &[Feature], per_kind: usize) -> Self {
        let mut sorted: Vec<&Feature> = features.iter().collect();
        sorted.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

        let pick = |kind: FeatureKind| {
            sorted
                .iter()
                .filter(|f| f.kind == kind)
                .take(per_kind)
                .map(|f| ApiResource::from(*f))
                .collect()
        };

        Self {
            cctv: pick(FeatureKind::Camera),
            metro: pick(FeatureKind::TransitExit),
            criminal: pick(FeatureKind::IncidentReport),
            streetlight: pick(FeatureKind::Streetlight),
            police: pick(FeatureKind::PoliceStation),
        }
    }
}

/// Response for `GET /api/safety`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyResponse {
    /// Query echo.
    pub meta: SafetyMeta,
    /// Score and counts.
    pub summary: SafetySummary,
    /// Nearest features per category.
    pub resources: SafetyResources,
    /// Ids of datasets that could not be loaded for this response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

// ── Routes ──────────────────────────────────────────────────────────────

/// Aggregate score of a route or of a set of road segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRouteSummary {
    /// Number of scored sample points.
    pub total_segments: usize,
    /// Cameras summed over all samples.
    pub total_cctv: u32,
    /// Metro exits summed over all samples.
    pub total_metro: u32,
    /// Robbery incidents summed over all samples.
    pub total_robbery: u32,
    /// Street lamps summed over all samples.
    pub total_streetlight: u32,
    /// Police stations summed over all samples.
    pub total_police: u32,
    /// Score of the summed counts.
    pub overall_score: f64,
    /// Safety level (1-3).
    pub level: u8,
    /// Level label.
    pub label: String,
}

impl ApiRouteSummary {
    fn new(total_segments: usize, overall: &ScoreBreakdown) -> Self {
        Self {
            total_segments,
            total_cctv: overall.camera_count,
            total_metro: overall.transit_count,
            total_robbery: overall.incident_count,
            total_streetlight: overall.streetlight_count,
            total_police: overall.police_count,
            overall_score: overall.score,
            level: overall.level.value(),
            label: overall.level.label().to_string(),
        }
    }
}

impl From<&RouteAnalysis> for ApiRouteSummary {
    fn from(analysis: &RouteAnalysis) -> Self {
        Self::new(analysis.samples.len(), &analysis.overall)
    }
}

/// One scored sample point along a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRouteSegment {
    /// Position in the sample sequence.
    pub segment_index: usize,
    /// Sample location.
    pub location: GeoPoint,
    /// Counts within the radius.
    #[serde(flatten)]
    pub counts: ApiCounts,
    /// Score in `[0, 100]`.
    pub safety_score: f64,
    /// Safety level (1-3).
    pub level: u8,
    /// Level label.
    pub label: String,
}

/// A scored route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRoute {
    /// Index among the alternatives.
    pub route_index: usize,
    /// Whether this is the recommended alternative.
    pub is_recommended: bool,
    /// Full path as `[lat, lng]` pairs.
    pub geometry: Vec<[f64; 2]>,
    /// Length in meters.
    pub distance_m: f64,
    /// Travel time in seconds.
    pub duration_s: Option<f64>,
    /// Aggregate score.
    pub summary: ApiRouteSummary,
    /// Per-sample scores.
    pub segments: Vec<ApiRouteSegment>,
}

impl From<&RouteAnalysis> for ApiRoute {
    fn from(analysis: &RouteAnalysis) -> Self {
        Self {
            route_index: analysis.route_index,
            is_recommended: analysis.is_recommended,
            geometry: analysis.geometry.iter().copied().map(Into::into).collect(),
            distance_m: analysis.distance_m,
            duration_s: analysis.duration_s,
            summary: analysis.into(),
            segments: route_segments(analysis),
        }
    }
}

fn route_segments(analysis: &RouteAnalysis) -> Vec<ApiRouteSegment> {
    analysis
        .samples
        .iter()
        .map(|sample| ApiRouteSegment {
            segment_index: sample.index,
            location: sample.location,
            counts: (&sample.breakdown).into(),
            safety_score: sample.breakdown.score,
            level: sample.breakdown.level.value(),
            label: sample.breakdown.level.label().to_string(),
        })
        .collect()
}

/// Body of `POST /api/route-safety`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSafetyRequest {
    /// Route path as `[lat, lng]` pairs.
    #[serde(default)]
    pub route_coordinates: Vec<[f64; 2]>,
    /// Search radius around each sample, in meters.
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
}

impl RouteSafetyRequest {
    /// The route path as points.
    #[must_use]
    pub fn points(&self) -> Vec<GeoPoint> {
        self.route_coordinates.iter().copied().map(Into::into).collect()
    }
}

/// Size of the analyzed route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRouteInfo {
    /// Number of points in the submitted path.
    pub total_points: usize,
    /// Number of points that were scored.
    pub sampled_points: usize,
    /// Search radius in meters.
    pub radius_m: f64,
}

/// Response for `POST /api/route-safety`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSafetyResponse {
    /// Route size.
    pub route: ApiRouteInfo,
    /// Aggregate score.
    pub summary: ApiRouteSummary,
    /// Per-sample scores.
    pub segments: Vec<ApiRouteSegment>,
    /// Ids of datasets that could not be loaded for this response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

impl RouteSafetyResponse {
    /// Builds the response for a single analyzed route.
    #[must_use]
    pub fn new(analysis: &RouteAnalysis, radius_m: f64, unavailable_sources: Vec<String>) -> Self {
        Self {
            route: ApiRouteInfo {
                total_points: analysis.geometry.len(),
                sampled_points: analysis.samples.len(),
                radius_m,
            },
            summary: analysis.into(),
            segments: route_segments(analysis),
            unavailable_sources,
        }
    }
}

/// Body of `POST /api/safe-routes`.
#[derive(Debug, Clone, Deserialize)]
pub struct SafeRoutesRequest {
    /// Start latitude.
    pub start_lat: Option<f64>,
    /// Start longitude.
    pub start_lng: Option<f64>,
    /// End latitude.
    pub end_lat: Option<f64>,
    /// End longitude.
    pub end_lng: Option<f64>,
    /// Search radius around each sample, in meters.
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
}

impl SafeRoutesRequest {
    /// Start and end points, or `None` if any coordinate is missing.
    #[must_use]
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        Some((
            GeoPoint::new(self.start_lat?, self.start_lng?),
            GeoPoint::new(self.end_lat?, self.end_lng?),
        ))
    }
}

/// Response for `POST /api/safe-routes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeRoutesResponse {
    /// Route start.
    pub start: GeoPoint,
    /// Route end.
    pub end: GeoPoint,
    /// Search radius in meters.
    pub radius_m: f64,
    /// Number of analyzed alternatives.
    pub total_routes: usize,
    /// Index of the recommended alternative.
    pub recommended_route_index: usize,
    /// Scored alternatives, in routing-service order.
    pub routes: Vec<ApiRoute>,
    /// Ids of datasets that could not be loaded for this response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

// ── Road segments ───────────────────────────────────────────────────────

/// A road segment submitted for scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRoadInput {
    /// Street name.
    #[serde(default = "unknown_road")]
    pub road_name: String,
    /// Road classification.
    #[serde(default = "unknown_type")]
    pub road_type: String,
    /// Nodes as `[lat, lng]` pairs.
    pub nodes: Vec<[f64; 2]>,
}

fn unknown_road() -> String {
    "Unknown Road".to_string()
}

fn unknown_type() -> String {
    "unknown".to_string()
}

impl From<&ApiRoadInput> for RoadSegment {
    fn from(input: &ApiRoadInput) -> Self {
        Self {
            name: input.road_name.clone(),
            road_type: input.road_type.clone(),
            nodes: input.nodes.iter().copied().map(Into::into).collect(),
        }
    }
}

/// Body of `POST /api/road-safety`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadSafetyRequest {
    /// Segments to score.
    #[serde(default)]
    pub segments: Vec<ApiRoadInput>,
    /// Search radius around each segment midpoint, in meters.
    #[serde(default = "default_radius_m")]
    pub safety_radius_m: f64,
}

/// A scored road segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRoad {
    /// Street name.
    pub road_name: String,
    /// Road classification.
    pub road_type: String,
    /// Nodes as `[lat, lng]` pairs.
    pub nodes: Vec<[f64; 2]>,
    /// Mean of the nodes; the point that was scored.
    pub center: GeoPoint,
    /// Counts within the radius.
    #[serde(flatten)]
    pub counts: ApiCounts,
    /// Score in `[0, 100]`.
    pub safety_score: f64,
    /// Safety level (1-3).
    pub level: u8,
    /// Level label.
    pub label: String,
}

impl From<&SegmentAnalysis> for ApiRoad {
    fn from(segment: &SegmentAnalysis) -> Self {
        Self {
            road_name: segment.name.clone(),
            road_type: segment.road_type.clone(),
            nodes: segment.nodes.iter().copied().map(Into::into).collect(),
            center: segment.midpoint,
            counts: (&segment.breakdown).into(),
            safety_score: segment.breakdown.score,
            level: segment.breakdown.level.value(),
            label: segment.breakdown.level.label().to_string(),
        }
    }
}

/// Aggregate score of a set of road segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAreaSummary {
    /// Number of scored segments.
    pub total_roads: usize,
    /// Cameras summed over all segments.
    pub total_cctv: u32,
    /// Metro exits summed over all segments.
    pub total_metro: u32,
    /// Robbery incidents summed over all segments.
    pub total_robbery: u32,
    /// Street lamps summed over all segments.
    pub total_streetlight: u32,
    /// Police stations summed over all segments.
    pub total_police: u32,
    /// Score of the summed counts.
    pub overall_score: f64,
    /// Safety level (1-3).
    pub level: u8,
    /// Level label.
    pub label: String,
}

/// Response for `POST /api/road-safety`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadSafetyResponse {
    /// Search radius in meters.
    pub safety_radius_m: f64,
    /// Aggregate score.
    pub summary: ApiAreaSummary,
    /// Scored segments.
    pub roads: Vec<ApiRoad>,
    /// Ids of datasets that could not be loaded for this response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

impl RoadSafetyResponse {
    /// Builds the response for an analyzed set of segments.
    #[must_use]
    pub fn new(area: &AreaAnalysis, safety_radius_m: f64, unavailable_sources: Vec<String>) -> Self {
        let summary = ApiRouteSummary::new(area.segments.len(), &area.overall);
        Self {
            safety_radius_m,
            summary: ApiAreaSummary {
                total_roads: summary.total_segments,
                total_cctv: summary.total_cctv,
                total_metro: summary.total_metro,
                total_robbery: summary.total_robbery,
                total_streetlight: summary.total_streetlight,
                total_police: summary.total_police,
                overall_score: summary.overall_score,
                level: summary.level,
                label: summary.label,
            },
            roads: area.segments.iter().map(ApiRoad::from).collect(),
            unavailable_sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use safe_route_route_models::RouteSample;
    use safe_route_score_models::SafetyLevel;

    use super::*;

    fn breakdown(score: f64, level: SafetyLevel) -> ScoreBreakdown {
        ScoreBreakdown {
            camera_count: 3,
            transit_count: 1,
            police_count: 0,
            streetlight_count: 7,
            incident_count: 2,
            score,
            level,
        }
    }

    fn feature(kind: FeatureKind, name: &str, distance_m: f64) -> Feature {
        Feature {
            kind,
            name: name.to_string(),
            location: GeoPoint::new(25.03, 121.56),
            distance_m,
            attributes: FeatureAttributes::default(),
        }
    }

    #[test]
    fn query_defaults_point_at_taipei_101() {
        let params = SafetyQueryParams::default();
        let meta = params.meta();

        assert_eq!(meta.center, DEFAULT_CENTER);
        assert!((meta.radius_m - 200.0).abs() < f64::EPSILON);
        assert_eq!(meta.tz, "Asia/Taipei");
        assert_eq!(meta.at.to_rfc3339(), "2025-11-08T23:00:00+08:00");
    }

    #[test]
    fn resources_keep_the_two_nearest_per_kind() {
        let features = vec![
            feature(FeatureKind::Camera, "far", 150.4),
            feature(FeatureKind::Camera, "near", 12.6),
            feature(FeatureKind::Camera, "mid", 80.0),
            feature(FeatureKind::IncidentReport, "robbery", 40.0),
        ];

        let resources = SafetyResources::nearest(&features, RESOURCES_PER_KIND);

        let names: Vec<_> = resources.cctv.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["near", "mid"]);
        assert_eq!(resources.cctv[0].distance_m, 13);
        assert_eq!(resources.criminal.len(), 1);
        assert_eq!(resources.criminal[0].safety, -1);
        assert!(resources.metro.is_empty());
    }

    #[test]
    fn resource_uses_compatible_field_names() {
        let mut police = feature(FeatureKind::PoliceStation, "Xinyi Precinct", 99.5);
        police.attributes.phone = Some("110".to_string());

        let json = serde_json::to_value(ApiResource::from(&police)).unwrap();

        assert_eq!(json["type"], "police");
        assert_eq!(json["safety"], 1);
        assert_eq!(json["distance_m"], 100);
        assert_eq!(json["phone"], "110");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn summary_reports_numeric_level_and_label() {
        let json =
            serde_json::to_value(SafetySummary::from(&breakdown(45.5, SafetyLevel::Caution)))
                .unwrap();

        assert_eq!(json["safety_score"], 45.5);
        assert_eq!(json["level"], 2);
        assert_eq!(json["label"], "Caution");
        assert_eq!(json["analysis"]["cctv_count"], 3);
        assert_eq!(json["analysis"]["robbery_count"], 2);
    }

    #[test]
    fn route_flattens_counts_into_segments() {
        let analysis = RouteAnalysis {
            route_index: 1,
            geometry: vec![GeoPoint::new(25.03, 121.56), GeoPoint::new(25.04, 121.57)],
            distance_m: 1400.0,
            duration_s: Some(200.0),
            samples: vec![RouteSample {
                index: 0,
                location: GeoPoint::new(25.03, 121.56),
                breakdown: breakdown(72.0, SafetyLevel::Safe),
            }],
            overall: breakdown(72.0, SafetyLevel::Safe),
            is_recommended: true,
        };

        let json = serde_json::to_value(ApiRoute::from(&analysis)).unwrap();

        assert_eq!(json["route_index"], 1);
        assert_eq!(json["is_recommended"], true);
        assert_eq!(json["geometry"][1], serde_json::json!([25.04, 121.57]));
        assert_eq!(json["summary"]["total_segments"], 1);
        assert_eq!(json["summary"]["total_streetlight"], 7);
        assert_eq!(json["segments"][0]["segment_index"], 0);
        assert_eq!(json["segments"][0]["metro_count"], 1);
        assert_eq!(json["segments"][0]["label"], "Safe");
    }

    #[test]
    fn missing_endpoint_coordinate_yields_none() {
        let request: SafeRoutesRequest = serde_json::from_value(serde_json::json!({
            "start_lat": 25.03, "start_lng": 121.56, "end_lat": 25.04
        }))
        .unwrap();

        assert!(request.endpoints().is_none());
        assert!((request.radius_m - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn road_input_defaults_name_and_type() {
        let request: RoadSafetyRequest = serde_json::from_value(serde_json::json!({
            "segments": [{"nodes": [[25.03, 121.56], [25.04, 121.57]]}],
            "safety_radius_m": 50
        }))
        .unwrap();

        let segment = RoadSegment::from(&request.segments[0]);
        assert_eq!(segment.name, "Unknown Road");
        assert_eq!(segment.road_type, "unknown");
        assert_eq!(segment.nodes[1], GeoPoint::new(25.04, 121.57));
        assert!((request.safety_radius_m - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unavailable_sources_are_omitted_when_empty() {
        let response = SafetyResponse {
            meta: SafetyQueryParams::default().meta(),
            summary: SafetySummary::from(&breakdown(10.0, SafetyLevel::Danger)),
            resources: SafetyResources::default(),
            unavailable_sources: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("unavailable_sources").is_none());
        assert_eq!(json["meta"]["at"], "2025-11-08T23:00:00+08:00");
    }
}
