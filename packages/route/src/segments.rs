//! Road-segment safety: each segment is scored at the mean of its nodes.

use safe_route_feature::FeatureSources;
use safe_route_geo::{GeoPoint, bbox};
use safe_route_route_models::{AreaAnalysis, RoadSegment, SegmentAnalysis};
use safe_route_score::score;
use safe_route_score_models::{FeatureCounts, ScoreMaxima};

use crate::{RouteError, analyzer::score_point, validate_points, validate_radius};

/// Returns the mean of `nodes`, or `None` when there are fewer than two.
#[must_use]
pub fn midpoint(nodes: &[GeoPoint]) -> Option<GeoPoint> {
    if nodes.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = nodes.len() as f64;
    let (lat, lng) = nodes
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(GeoPoint::new(lat / n, lng / n))
}

/// Scores every segment with at least two nodes, then scores the counts
/// summed over all segments.
///
/// # Errors
///
/// * [`RouteError::InvalidRadius`] if `radius_m` is not positive
/// * [`RouteError::InvalidCoordinate`] if any node is invalid
pub fn analyze_segments(
    segments: &[RoadSegment],
    radius_m: f64,
    sources: &FeatureSources,
    maxima: &ScoreMaxima,
) -> Result<AreaAnalysis, RouteError> {
    validate_radius(radius_m)?;
    for segment in segments {
        validate_points(&segment.nodes)?;
    }

    let nearby = bbox::covering(segments.iter().flat_map(|s| &s.nodes), radius_m)
        .map_or_else(FeatureSources::new, |area| sources.prefiltered(&area));

    let mut totals = FeatureCounts::default();
    let mut analyses = Vec::with_capacity(segments.len());

    for (segment_index, segment) in segments.iter().enumerate() {
        let Some(center) = midpoint(&segment.nodes) else {
            log::debug!(
                "Skipping segment {segment_index} ('{}'): {} node(s)",
                segment.name,
                segment.nodes.len()
            );
            continue;
        };

        let point = score_point(center, radius_m, &nearby, maxima);
        totals += point.counts;
        analyses.push(SegmentAnalysis {
            segment_index,
            name: segment.name.clone(),
            road_type: segment.road_type.clone(),
            midpoint: center,
            nodes: segment.nodes.clone(),
            breakdown: point.breakdown,
        });
    }

    Ok(AreaAnalysis {
        segments: analyses,
        totals,
        overall: score(&totals, maxima),
    })
}
