//! HTTP handler functions for the safe-route API.

use actix_web::{HttpResponse, web};
use safe_route_geo::{GeoPoint, distance_meters};
use safe_route_route::{RouteError, analyze_routes, analyze_segments, score_point};
use safe_route_route_models::{CandidateRoute, RoadSegment};
use safe_route_server_models::{
    ApiHealth, ApiRoute, RESOURCES_PER_KIND, RoadSafetyRequest, RoadSafetyResponse,
    RouteSafetyRequest, RouteSafetyResponse, SafeRoutesRequest, SafeRoutesResponse,
    SafetyQueryParams, SafetyResources, SafetyResponse, SafetySummary,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/safety` (also `GET /get_safety_data`)
///
/// Scores a single point and lists the nearest features of each kind.
pub async fn safety(
    state: web::Data<AppState>,
    params: web::Query<SafetyQueryParams>,
) -> HttpResponse {
    let center = params.center();
    let radius_m = params.radius_m();

    if !center.is_valid() {
        return bad_request(&RouteError::InvalidCoordinate {
            lat: center.lat,
            lng: center.lng,
        });
    }
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return bad_request(&RouteError::InvalidRadius { radius_m });
    }

    let loaded = state.store.load_all().await;
    let point = score_point(center, radius_m, &loaded.sources, &state.maxima);

    log::info!(
        "Safety at ({}, {}) r={radius_m}m: {} feature(s), score {}",
        center.lat,
        center.lng,
        point.features.len(),
        point.breakdown.score
    );

    HttpResponse::Ok().json(SafetyResponse {
        meta: params.meta(),
        summary: SafetySummary::from(&point.breakdown),
        resources: SafetyResources::nearest(&point.features, RESOURCES_PER_KIND),
        unavailable_sources: loaded.unavailable(),
    })
}

/// `POST /api/route-safety` (also `POST /get_route_safety`)
///
/// Scores a client-supplied route path.
pub async fn route_safety(
    state: web::Data<AppState>,
    body: web::Json<RouteSafetyRequest>,
) -> HttpResponse {
    let points = body.points();
    if points.len() < 2 {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Invalid route coordinates" }));
    }

    let route = CandidateRoute {
        distance_m: path_length(&points),
        geometry: points,
        duration_s: None,
    };

    let loaded = state.store.load_all().await;
    let comparison = match analyze_routes(
        std::slice::from_ref(&route),
        body.radius_m,
        &loaded.sources,
        &state.maxima,
    ) {
        Ok(c) => c,
        Err(e) => return bad_request(&e),
    };

    let Some(analysis) = comparison.recommended() else {
        return error_response(&RouteError::NoRoutes);
    };

    log::info!(
        "Route safety: {} point(s), {} sample(s), score {}",
        analysis.geometry.len(),
        analysis.samples.len(),
        analysis.overall.score
    );

    HttpResponse::Ok().json(RouteSafetyResponse::new(
        analysis,
        body.radius_m,
        loaded.unavailable(),
    ))
}

/// `POST /api/safe-routes` (also `POST /find_safe_routes`)
///
/// Fetches alternative routes between two points, scores each one, and
/// marks the safest.
pub async fn safe_routes(
    state: web::Data<AppState>,
    body: web::Json<SafeRoutesRequest>,
) -> HttpResponse {
    let Some((start, end)) = body.endpoints() else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing required parameters: start_lat, start_lng, end_lat, end_lng"
        }));
    };

    if let Some(p) = [start, end].into_iter().find(|p| !p.is_valid()) {
        return bad_request(&RouteError::InvalidCoordinate {
            lat: p.lat,
            lng: p.lng,
        });
    }

    let candidates = match state.routing.routes(start, end).await {
        Ok(routes) => routes,
        Err(e) => {
            log::error!("Failed to fetch routes: {e}");
            return HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": format!("Failed to fetch routes: {e}") }));
        }
    };

    if candidates.is_empty() {
        return error_response(&RouteError::NoRoutes);
    }

    let loaded = state.store.load_all().await;
    let comparison = match analyze_routes(&candidates, body.radius_m, &loaded.sources, &state.maxima)
    {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };

    log::info!(
        "Analyzed {} route(s); recommending route {}",
        comparison.routes.len(),
        comparison.recommended_index
    );

    HttpResponse::Ok().json(SafeRoutesResponse {
        start,
        end,
        radius_m: body.radius_m,
        total_routes: comparison.routes.len(),
        recommended_route_index: comparison.recommended_index,
        routes: comparison.routes.iter().map(ApiRoute::from).collect(),
        unavailable_sources: loaded.unavailable(),
    })
}

/// `POST /api/road-safety`
///
/// Scores each road segment at its midpoint and the area as a whole.
pub async fn road_safety(
    state: web::Data<AppState>,
    body: web::Json<RoadSafetyRequest>,
) -> HttpResponse {
    let segments: Vec<RoadSegment> = body.segments.iter().map(RoadSegment::from).collect();

    let loaded = state.store.load_all().await;
    let area = match analyze_segments(
        &segments,
        body.safety_radius_m,
        &loaded.sources,
        &state.maxima,
    ) {
        Ok(a) => a,
        Err(e) => return bad_request(&e),
    };

    log::info!(
        "Road safety: {}/{} segment(s) scored, score {}",
        area.segments.len(),
        segments.len(),
        area.overall.score
    );

    HttpResponse::Ok().json(RoadSafetyResponse::new(
        &area,
        body.safety_radius_m,
        loaded.unavailable(),
    ))
}

fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}

fn bad_request(e: &RouteError) -> HttpResponse {
    log::debug!("Rejected request: {e}");
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn error_response(e: &RouteError) -> HttpResponse {
    match e {
        RouteError::NoRoutes => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": "No routes found" }))
        }
        _ => bad_request(e),
    }
}
