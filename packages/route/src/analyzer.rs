//! Per-point and per-route safety analysis.

use safe_route_feature::{FeatureSources, query};
use safe_route_feature_models::Feature;
use safe_route_geo::{GeoPoint, bbox};
use safe_route_route_models::{CandidateRoute, RouteAnalysis, RouteComparison, RouteSample};
use safe_route_score::{count_features, score};
use safe_route_score_models::{FeatureCounts, ScoreBreakdown, ScoreMaxima};

use crate::{RouteError, sampler, validate_points, validate_radius};

/// Features and score around a single point.
#[derive(Debug, Clone)]
pub struct PointScore {
    /// Features within the radius, grouped by kind.
    pub features: Vec<Feature>,
    /// Per-kind counts of `features`.
    pub counts: FeatureCounts,
    /// Score of `counts`.
    pub breakdown: ScoreBreakdown,
}

/// Queries the features around `center` and scores them.
#[must_use]
pub fn score_point(
    center: GeoPoint,
    radius_m: f64,
    sources: &FeatureSources,
    maxima: &ScoreMaxima,
) -> PointScore {
    let features = query(center, radius_m, sources);
    let counts = count_features(&features);
    let breakdown = score(&counts, maxima);

    PointScore {
        features,
        counts,
        breakdown,
    }
}

/// Samples and scores a single route.
///
/// Per-sample counts are summed (not averaged) and the totals are scored
/// once more to give the route's overall breakdown.
///
/// # Errors
///
/// * [`RouteError::InvalidRadius`] if `radius_m` is not positive
/// * [`RouteError::TooFewPoints`] if the geometry has fewer than two points
/// * [`RouteError::InvalidCoordinate`] if any point is invalid
pub fn analyze_route(
    route_index: usize,
    route: &CandidateRoute,
    radius_m: f64,
    sources: &FeatureSources,
    maxima: &ScoreMaxima,
) -> Result<RouteAnalysis, RouteError> {
    validate_radius(radius_m)?;
    validate_route(route)?;

    let mut totals = FeatureCounts::default();
    let samples: Vec<_> = sampler::sample(&route.geometry)
        .into_iter()
        .enumerate()
        .map(|(index, location)| {
            let point = score_point(location, radius_m, sources, maxima);
            totals += point.counts;
            RouteSample {
                index,
                location,
                breakdown: point.breakdown,
            }
        })
        .collect();

    let overall = score(&totals, maxima);
    log::debug!(
        "Route {route_index}: {} points, {} samples, score {}",
        route.geometry.len(),
        samples.len(),
        overall.score
    );

    Ok(RouteAnalysis {
        route_index,
        geometry: route.geometry.clone(),
        distance_m: route.distance_m,
        duration_s: route.duration_s,
        samples,
        overall,
        is_recommended: false,
    })
}

/// Analyzes a set of alternative routes and marks the best one.
///
/// `sources` is first restricted to a box covering every route plus the
/// search radius, so each sample only scans records near the routes.
///
/// # Errors
///
/// * [`RouteError::NoRoutes`] if `routes` is empty
/// * any error from [`analyze_route`]
pub fn analyze_routes(
    routes: &[CandidateRoute],
    radius_m: f64,
    sources: &FeatureSources,
    maxima: &ScoreMaxima,
) -> Result<RouteComparison, RouteError> {
    validate_radius(radius_m)?;
    for route in routes {
        validate_route(route)?;
    }

    let area = bbox::covering(routes.iter().flat_map(|r| &r.geometry), radius_m)
        .ok_or(RouteError::NoRoutes)?;
    let nearby = sources.prefiltered(&area);
    log::debug!(
        "Pre-filtered {} records to {} around {} route(s)",
        sources.len(),
        nearby.len(),
        routes.len()
    );

    let mut analyses = routes
        .iter()
        .enumerate()
        .map(|(index, route)| analyze_route(index, route, radius_m, &nearby, maxima))
        .collect::<Result<Vec<_>, _>>()?;

    let scores: Vec<_> = analyses.iter().map(|a| a.overall.score).collect();
    let recommended_index = recommend(&scores).ok_or(RouteError::NoRoutes)?;
    analyses[recommended_index].is_recommended = true;

    Ok(RouteComparison {
        routes: analyses,
        recommended_index,
    })
}

/// Returns the index of the highest score. The first one wins on ties.
#[must_use]
pub fn recommend(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, &score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((index, score)),
        })
        .map(|(index, _)| index)
}

fn validate_route(route: &CandidateRoute) -> Result<(), RouteError> {
    if route.geometry.len() < 2 {
        return Err(RouteError::TooFewPoints {
            count: route.geometry.len(),
        });
    }
    validate_points(&route.geometry)
}
