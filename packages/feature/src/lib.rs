#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Radius queries over the safety feature datasets.
//!
//! Each dataset is a list of [`RawRecord`]s keyed by [`FeatureKind`].
//! A query resolves every record to a WGS84 point (converting TWD97 grid
//! coordinates on the fly), drops records whose coordinates are missing
//! or invalid, and keeps those within the radius of the query point.

use std::collections::BTreeMap;
use std::sync::Arc;

use safe_route_feature_models::{Feature, FeatureKind, RawCoordinates, RawRecord, SkipReason};
use safe_route_geo::{BoundingBox, GeoPoint, ProjectedPoint, distance_meters, to_geographic};

pub use safe_route_feature_models as models;

/// Outcome of resolving a raw record to a map position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordOutcome {
    /// The record has a usable WGS84 position.
    Located(GeoPoint),
    /// The record must be ignored.
    Skipped(SkipReason),
}

/// Resolves a raw record to a WGS84 point.
#[must_use]
pub fn locate(record: &RawRecord) -> RecordOutcome {
    let point = match record.coordinates {
        RawCoordinates::Geographic {
            lat: Some(lat),
            lng: Some(lng),
        } => {
            if !lat.is_finite() || !lng.is_finite() {
                return RecordOutcome::Skipped(SkipReason::NonFiniteCoordinate);
            }
            GeoPoint::new(lat, lng)
        }
        RawCoordinates::Projected {
            x: Some(x),
            y: Some(y),
        } => {
            if !x.is_finite() || !y.is_finite() {
                return RecordOutcome::Skipped(SkipReason::NonFiniteCoordinate);
            }
            to_geographic(ProjectedPoint::new(x, y))
        }
        RawCoordinates::Geographic { .. } | RawCoordinates::Projected { .. } => {
            return RecordOutcome::Skipped(SkipReason::MissingCoordinate);
        }
    };

    if point.is_valid() {
        RecordOutcome::Located(point)
    } else {
        RecordOutcome::Skipped(SkipReason::OutOfRange {
            lat: point.lat,
            lng: point.lng,
        })
    }
}

/// The loaded datasets, one record list per feature kind.
///
/// Record lists are shared, so cloning a `FeatureSources` is cheap.
#[derive(Debug, Clone, Default)]
pub struct FeatureSources {
    records: BTreeMap<FeatureKind, Arc<Vec<RawRecord>>>,
}

impl FeatureSources {
    /// Creates an empty set of datasets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the records for `kind`, replacing any previous list.
    pub fn insert(&mut self, kind: FeatureKind, records: Arc<Vec<RawRecord>>) {
        self.records.insert(kind, records);
    }

    /// Returns the records for `kind`, if that dataset is loaded.
    #[must_use]
    pub fn get(&self, kind: FeatureKind) -> Option<&Arc<Vec<RawRecord>>> {
        self.records.get(&kind)
    }

    /// Iterates the loaded datasets in [`FeatureKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKind, &Arc<Vec<RawRecord>>)> {
        self.records.iter().map(|(kind, records)| (*kind, records))
    }

    /// Total number of records across all datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.values().map(|records| records.len()).sum()
    }

    /// Returns `true` if no records are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy restricted to records located inside `bbox`.
    ///
    /// Used before scoring many points along a route so each point scans
    /// only the records near the route.
    #[must_use]
    pub fn prefiltered(&self, bbox: &BoundingBox) -> Self {
        let records = self
            .records
            .iter()
            .map(|(kind, records)| (*kind, Arc::new(prefilter(records, bbox))))
            .collect();
        Self { records }
    }
}

/// Returns the records of `records` located inside `bbox`. Records that
/// cannot be located are dropped.
#[must_use]
pub fn prefilter(records: &[RawRecord], bbox: &BoundingBox) -> Vec<RawRecord> {
    records
        .iter()
        .filter(|record| matches!(locate(record), RecordOutcome::Located(p) if bbox.contains(p)))
        .cloned()
        .collect()
}

/// Result of a radius query, including how many records were ignored.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Features within the radius.
    pub features: Vec<Feature>,
    /// Records skipped because their position could not be resolved.
    pub skipped: usize,
}

/// Returns every feature within `radius_m` meters of `center` (boundary
/// inclusive).
///
/// Features are grouped by kind in [`FeatureKind`] order; within a kind
/// they keep the order of the underlying dataset.
#[must_use]
pub fn query(center: GeoPoint, radius_m: f64, sources: &FeatureSources) -> Vec<Feature> {
    query_with_stats(center, radius_m, sources).features
}

/// Same as [`query`], also reporting the number of skipped records.
#[must_use]
pub fn query_with_stats(center: GeoPoint, radius_m: f64, sources: &FeatureSources) -> QueryResult {
    let mut result = QueryResult::default();

    for (kind, records) in sources.iter() {
        for record in records.iter() {
            let location = match locate(record) {
                RecordOutcome::Located(point) => point,
                RecordOutcome::Skipped(reason) => {
                    log::trace!("Skipping {kind} record '{}': {reason}", record.name);
                    result.skipped += 1;
                    continue;
                }
            };

            let distance_m = distance_meters(center, location);
            if distance_m <= radius_m {
                result.features.push(Feature {
                    kind,
                    name: record.name.clone(),
                    location,
                    distance_m,
                    attributes: record.attributes.clone(),
                });
            }
        }
    }

    if result.skipped > 0 {
        log::debug!(
            "Radius query at ({}, {}) skipped {} unlocatable records",
            center.lat,
            center.lng,
            result.skipped
        );
    }

    result
}
