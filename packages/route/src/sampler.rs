//! Reduces a dense route path to a bounded set of sample points.

use safe_route_geo::GeoPoint;

/// Routes up to this many points are sampled at every point.
pub const DENSE_LIMIT: usize = 20;

/// Routes up to this many points are sampled at every other point.
pub const MEDIUM_LIMIT: usize = 50;

/// Approximate number of samples taken from long routes.
pub const TARGET_SAMPLES: usize = 25;

/// Returns the stride used to sample a path of `len` points.
#[must_use]
pub fn sample_interval(len: usize) -> usize {
    if len <= DENSE_LIMIT {
        1
    } else if len <= MEDIUM_LIMIT {
        2
    } else {
        (len / TARGET_SAMPLES).max(2)
    }
}

/// Takes every [`sample_interval`]-th point starting at the first, then
/// appends the last point unless an equal point was already taken.
#[must_use]
pub fn sample(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let Some(last_index) = points.len().checked_sub(1) else {
        return Vec::new();
    };

    let interval = sample_interval(points.len());
    let mut samples: Vec<_> = points.iter().step_by(interval).copied().collect();

    let last = points[last_index];
    if !samples.contains(&last) {
        samples.push(last);
    }

    samples
}
