#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Safety score inputs and results.
//!
//! [`FeatureCounts`] are what the scorer consumes, [`ScoreMaxima`] holds
//! the "maximum expected" count per category used for normalization, and
//! [`ScoreBreakdown`] is the scored result with its [`SafetyLevel`].

use std::ops::{Add, AddAssign};

use safe_route_feature_models::FeatureKind;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Per-category feature counts around a point (or summed along a route).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    /// Surveillance cameras.
    pub camera: u32,
    /// Metro station exits.
    pub transit: u32,
    /// Police stations.
    pub police: u32,
    /// Street lamps.
    pub streetlight: u32,
    /// Robbery incidents.
    pub incident: u32,
    /// Theft incidents. No dataset feeds this yet, so it stays 0.
    #[serde(default)]
    pub theft: u32,
    /// Convenience stores. No dataset feeds this yet, so it stays 0.
    #[serde(default)]
    pub store: u32,
}

impl FeatureCounts {
    /// Counts one feature of the given kind.
    pub const fn increment(&mut self, kind: FeatureKind) {
        match kind {
            FeatureKind::Camera => self.camera += 1,
            FeatureKind::TransitExit => self.transit += 1,
            FeatureKind::PoliceStation => self.police += 1,
            FeatureKind::Streetlight => self.streetlight += 1,
            FeatureKind::IncidentReport => self.incident += 1,
        }
    }

    /// Returns the count for a feature kind.
    #[must_use]
    pub const fn get(&self, kind: FeatureKind) -> u32 {
        match kind {
            FeatureKind::Camera => self.camera,
            FeatureKind::TransitExit => self.transit,
            FeatureKind::PoliceStation => self.police,
            FeatureKind::Streetlight => self.streetlight,
            FeatureKind::IncidentReport => self.incident,
        }
    }
}

impl AddAssign for FeatureCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.camera += rhs.camera;
        self.transit += rhs.transit;
        self.police += rhs.police;
        self.streetlight += rhs.streetlight;
        self.incident += rhs.incident;
        self.theft += rhs.theft;
        self.store += rhs.store;
    }
}

impl Add for FeatureCounts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl std::iter::Sum for FeatureCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// "Maximum expected" count per category. A count at or above its maximum
/// normalizes to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreMaxima {
    /// Convenience stores.
    pub store: f64,
    /// Surveillance cameras.
    pub camera: f64,
    /// Street lamps.
    pub streetlight: f64,
    /// Police stations.
    pub police: f64,
    /// Metro station exits.
    pub transit: f64,
    /// Theft incidents.
    pub theft: f64,
    /// Robbery incidents.
    pub robbery: f64,
}

impl Default for ScoreMaxima {
    fn default() -> Self {
        Self {
            store: 3.0,
            camera: 5.0,
            streetlight: 10.0,
            police: 1.0,
            transit: 3.0,
            theft: 5.0,
            robbery: 2.0,
        }
    }
}

/// Three-band safety classification.
///
/// The numeric values and the labels are a compatibility surface for
/// existing clients.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SafetyLevel {
    /// Score below 40.
    Danger = 1,
    /// Score in `[40, 60)`.
    Caution = 2,
    /// Score of 60 or more.
    Safe = 3,
}

impl SafetyLevel {
    /// Returns the numeric value of this level (1-3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns the display label (`Danger`, `Caution` or `Safe`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Danger => "Danger",
            Self::Caution => "Caution",
            Self::Safe => "Safe",
        }
    }
}

/// A scored set of counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Surveillance cameras counted.
    pub camera_count: u32,
    /// Metro station exits counted.
    pub transit_count: u32,
    /// Police stations counted.
    pub police_count: u32,
    /// Street lamps counted.
    pub streetlight_count: u32,
    /// Robbery incidents counted.
    pub incident_count: u32,
    /// Score in `[0, 100]`, rounded to two decimal places.
    pub score: f64,
    /// Classification of `score`.
    pub level: SafetyLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_numbered_from_danger_up() {
        assert_eq!(SafetyLevel::Danger.value(), 1);
        assert_eq!(SafetyLevel::Caution.value(), 2);
        assert_eq!(SafetyLevel::Safe.value(), 3);
    }

    #[test]
    fn labels_match_display() {
        for level in [SafetyLevel::Danger, SafetyLevel::Caution, SafetyLevel::Safe] {
            assert_eq!(level.label(), level.to_string());
            assert_eq!(level.label(), level.as_ref());
        }
    }

    #[test]
    fn counts_sum_field_by_field() {
        let mut a = FeatureCounts::default();
        a.increment(FeatureKind::Camera);
        a.increment(FeatureKind::Camera);
        a.increment(FeatureKind::IncidentReport);

        let mut b = FeatureCounts::default();
        b.increment(FeatureKind::Camera);
        b.increment(FeatureKind::Streetlight);

        let total: FeatureCounts = [a, b].into_iter().sum();
        assert_eq!(total.camera, 3);
        assert_eq!(total.streetlight, 1);
        assert_eq!(total.incident, 1);
        assert_eq!(total.get(FeatureKind::PoliceStation), 0);
    }

    #[test]
    fn maxima_fill_missing_fields_with_defaults() {
        let maxima: ScoreMaxima = toml::from_str("camera = 8.0").unwrap();
        assert!((maxima.camera - 8.0).abs() < f64::EPSILON);
        assert!((maxima.streetlight - 10.0).abs() < f64::EPSILON);
        assert!((maxima.robbery - 2.0).abs() < f64::EPSILON);
    }
}
