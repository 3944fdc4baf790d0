//! Source registry: loads all dataset definitions from embedded TOML
//! configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the
//! binary at compile time via [`include_str!`].

use crate::source_def::{SourceDefinition, parse_source_toml};

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    // ── Taipei open-data API ─────────────────────────────────────────
    ("cctv", include_str!("../sources/cctv.toml")),
    ("mrt", include_str!("../sources/mrt.toml")),
    ("robbery", include_str!("../sources/robbery.toml")),
    // ── JSON blobs ───────────────────────────────────────────────────
    ("streetlight", include_str!("../sources/streetlight.toml")),
    // ── Local files ──────────────────────────────────────────────────
    ("police", include_str!("../sources/police.toml")),
];

/// Total number of configured sources (used in tests).
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 5;

/// Returns all configured dataset definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use safe_route_feature_models::FeatureKind;

    use super::*;
    use crate::source_def::{CoordinateFields, FetcherConfig};

    #[test]
    fn loads_all_sources() {
        let sources = all_sources();
        assert_eq!(sources.len(), EXPECTED_SOURCE_COUNT);
    }

    #[test]
    fn source_ids_are_unique() {
        let sources = all_sources();
        let mut ids: Vec<&str> = sources.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_SOURCE_COUNT);
    }

    #[test]
    fn every_feature_kind_has_a_source() {
        let sources = all_sources();
        for kind in FeatureKind::all() {
            assert!(
                sources.iter().any(|s| s.kind == *kind),
                "no source for {kind}"
            );
        }
    }

    #[test]
    fn all_sources_have_required_fields() {
        for source in &all_sources() {
            assert!(!source.id.is_empty(), "source id is empty");
            assert!(!source.name.is_empty(), "source name is empty");
            assert!(source.ttl_secs > 0, "{}: ttl is zero", source.id);
            assert!(
                !source.fields.name.is_empty() || source.fields.default_name.is_some(),
                "{}: no name fields",
                source.id
            );
        }
    }

    #[test]
    fn streetlights_are_projected_once_and_cached_longer() {
        let sources = all_sources();
        let lights = sources.iter().find(|s| s.id == "streetlight").unwrap();

        assert_eq!(lights.ttl_secs, 3600);
        assert!(lights.fields.project_on_load);
        assert!(matches!(
            lights.fields.coordinates,
            CoordinateFields::Projected { .. }
        ));
        assert!(matches!(lights.fetcher, FetcherConfig::JsonBlob { .. }));
    }
}
