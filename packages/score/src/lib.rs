#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weighted safety score for a set of feature counts.
//!
//! Each count is normalized to `[0, 1]` against its configured maximum,
//! the normalized terms are combined linearly, and the clamped sum is
//! scaled to `[0, 100]` and rounded to two decimals:
//!
//! ```text
//! raw = 0.3·store + 0.1·camera + 0.5·streetlight + 0.8·police
//!     + 0.7·transit − 0.4·theft − 0.5·robbery
//! ```
//!
//! These are the weights clients have always been scored with. Older
//! documentation lists 0.05 for streetlights, 0.3 for police and 0.2 for
//! transit; those values were never applied.
//!
//! Theft and store counts have no dataset yet and are always 0.
//!
//! Every place that turns a score into a level goes through [`classify`].

use safe_route_feature_models::Feature;
use safe_route_score_models::{FeatureCounts, SafetyLevel, ScoreBreakdown, ScoreMaxima};

pub use safe_route_score_models as models;

/// Weight of convenience-store density.
pub const STORE_WEIGHT: f64 = 0.3;
/// Weight of camera density.
pub const CAMERA_WEIGHT: f64 = 0.1;
/// Weight of streetlight density.
pub const STREETLIGHT_WEIGHT: f64 = 0.5;
/// Weight of police proximity.
pub const POLICE_WEIGHT: f64 = 0.8;
/// Weight of metro exit density.
pub const TRANSIT_WEIGHT: f64 = 0.7;
/// Penalty weight of theft density.
pub const THEFT_WEIGHT: f64 = 0.4;
/// Penalty weight of robbery density.
pub const ROBBERY_WEIGHT: f64 = 0.5;

/// Lowest score classified as [`SafetyLevel::Safe`].
pub const SAFE_THRESHOLD: f64 = 60.0;
/// Lowest score classified as [`SafetyLevel::Caution`].
pub const CAUTION_THRESHOLD: f64 = 40.0;

/// Normalizes `count` against `max` into `[0, 1]`.
///
/// A non-positive maximum yields 0.
#[must_use]
pub fn normalize_count(count: u32, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (f64::from(count) / max).clamp(0.0, 1.0)
}

/// Weighted sum of the normalized counts, clamped to `[0, 1]`.
#[must_use]
pub fn raw_score(counts: &FeatureCounts, maxima: &ScoreMaxima) -> f64 {
    let raw = STORE_WEIGHT * normalize_count(counts.store, maxima.store)
        + CAMERA_WEIGHT * normalize_count(counts.camera, maxima.camera)
        + STREETLIGHT_WEIGHT * normalize_count(counts.streetlight, maxima.streetlight)
        + POLICE_WEIGHT * normalize_count(counts.police, maxima.police)
        + TRANSIT_WEIGHT * normalize_count(counts.transit, maxima.transit)
        - THEFT_WEIGHT * normalize_count(counts.theft, maxima.theft)
        - ROBBERY_WEIGHT * normalize_count(counts.incident, maxima.robbery);

    raw.clamp(0.0, 1.0)
}

/// Scales a clamped raw score to `[0, 100]`, rounded to two decimals.
#[must_use]
pub fn scale(raw: f64) -> f64 {
    round2(raw.clamp(0.0, 1.0) * 100.0)
}

/// Classifies a `[0, 100]` score. Each band includes its lower bound.
///
/// Pass the unrounded score: 39.9999 is `Danger` even though it displays
/// as 40.00.
#[must_use]
pub fn classify(score: f64) -> SafetyLevel {
    if score >= SAFE_THRESHOLD {
        SafetyLevel::Safe
    } else if score >= CAUTION_THRESHOLD {
        SafetyLevel::Caution
    } else {
        SafetyLevel::Danger
    }
}

/// Scores a set of counts. The level comes from the unrounded score.
#[must_use]
pub fn score(counts: &FeatureCounts, maxima: &ScoreMaxima) -> ScoreBreakdown {
    let raw = raw_score(counts, maxima);

    ScoreBreakdown {
        camera_count: counts.camera,
        transit_count: counts.transit,
        police_count: counts.police,
        streetlight_count: counts.streetlight,
        incident_count: counts.incident,
        score: scale(raw),
        level: classify(raw * 100.0),
    }
}

/// Tallies features by kind.
#[must_use]
pub fn count_features(features: &[Feature]) -> FeatureCounts {
    let mut counts = FeatureCounts::default();
    for feature in features {
        counts.increment(feature.kind);
    }
    counts
}

/// Rounds to two decimal places. Ties round away from zero, not to even.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
