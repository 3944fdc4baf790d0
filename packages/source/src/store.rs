//! Cached access to every configured dataset.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use safe_route_cache::TtlCache;
use safe_route_feature::FeatureSources;
use safe_route_feature_models::{FeatureKind, RawRecord};

use crate::{SourceDefinition, SourceError};

/// Records of one dataset, shared between the cache and in-flight queries.
pub type Records = Arc<Vec<RawRecord>>;

/// A dataset that could not be loaded.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    /// Dataset id.
    pub id: String,
    /// Feature kind the dataset feeds.
    pub kind: FeatureKind,
    /// Error description.
    pub message: String,
}

/// The outcome of loading every dataset.
///
/// Failed datasets are reported next to the ones that loaded, so a single
/// broken upstream never hides the others.
#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    /// Records of every dataset that loaded.
    pub sources: FeatureSources,
    /// Datasets that failed.
    pub failures: Vec<SourceFailure>,
}

impl LoadedSources {
    /// Ids of the datasets that failed to load.
    #[must_use]
    pub fn unavailable(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.id.clone()).collect()
    }
}

/// Fetches datasets through a per-dataset expiring cache.
///
/// One store is shared by all requests; concurrent requests for an
/// expired dataset share a single upstream fetch.
#[derive(Debug)]
pub struct SourceStore {
    client: reqwest::Client,
    definitions: Vec<SourceDefinition>,
    cache: TtlCache<String, Records>,
    fetch_timeout: Duration,
}

impl SourceStore {
    /// Creates a store for `definitions`. Each fetch (including retries)
    /// is abandoned after `fetch_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(
        definitions: Vec<SourceDefinition>,
        fetch_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .user_agent(concat!("safe-route/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            definitions,
            cache: TtlCache::new(),
            fetch_timeout,
        })
    }

    /// The configured dataset definitions.
    #[must_use]
    pub fn definitions(&self) -> &[SourceDefinition] {
        &self.definitions
    }

    /// Returns the records of one dataset, fetching them if the cached
    /// copy is missing or expired.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails or times out. The cached
    /// copy, if any, is left as it was.
    pub async fn load(&self, definition: &SourceDefinition) -> Result<Records, SourceError> {
        self.cache
            .get(&definition.id, definition.ttl(), || self.fetch(definition))
            .await
    }

    async fn fetch(&self, definition: &SourceDefinition) -> Result<Records, SourceError> {
        let raw = tokio::time::timeout(self.fetch_timeout, definition.fetch(&self.client))
            .await
            .map_err(|_| SourceError::Timeout {
                source_id: definition.id.clone(),
                secs: self.fetch_timeout.as_secs(),
            })??;

        let records = definition.normalize(&raw);
        log::info!(
            "[{}] loaded {} records ({} upstream)",
            definition.id,
            records.len(),
            raw.len()
        );

        Ok(Arc::new(records))
    }

    /// Loads every dataset concurrently.
    ///
    /// Datasets feeding the same kind are concatenated in definition
    /// order.
    pub async fn load_all(&self) -> LoadedSources {
        let results =
            futures::future::join_all(self.definitions.iter().map(|def| self.load(def))).await;

        let mut by_kind: BTreeMap<FeatureKind, Vec<Records>> = BTreeMap::new();
        let mut failures = Vec::new();

        for (definition, result) in self.definitions.iter().zip(results) {
            match result {
                Ok(records) => by_kind.entry(definition.kind).or_default().push(records),
                Err(e) => {
                    log::warn!("[{}] unavailable: {e}", definition.id);
                    failures.push(SourceFailure {
                        id: definition.id.clone(),
                        kind: definition.kind,
                        message: e.to_string(),
                    });
                }
            }
        }

        let mut sources = FeatureSources::new();
        for (kind, mut lists) in by_kind {
            let records = if lists.len() == 1 {
                lists.remove(0)
            } else {
                Arc::new(lists.iter().flat_map(|l| l.iter().cloned()).collect())
            };
            sources.insert(kind, records);
        }

        LoadedSources { sources, failures }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use safe_route_feature_models::RawCoordinates;

    use super::*;
    use crate::source_def::parse_source_toml;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("safe_route_store_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn csv_source(id: &str, kind: &str, path: &std::path::Path) -> SourceDefinition {
        parse_source_toml(&format!(
            r#"
            id = "{id}"
            name = "{id}"
            kind = "{kind}"
            ttl_secs = 1800

            [fetcher]
            type = "csv_file"
            path = "{}"

            [fields]
            name = ["name"]

            [fields.coordinates]
            type = "geographic"
            lat = "lat"
            lng = "lng"
            "#,
            path.display()
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn loads_and_maps_csv_sources() {
        let path = write_fixture("cams.csv", "name,lat,lng\nA001,25.0340,121.5645\nA002,,121.5\n");
        let store = SourceStore::new(
            vec![csv_source("cams", "cctv", &path)],
            Duration::from_secs(5),
        )
        .unwrap();

        let loaded = store.load_all().await;
        assert!(loaded.failures.is_empty());

        let cams = loaded.sources.get(FeatureKind::Camera).unwrap();
        assert_eq!(cams.len(), 2);
        assert_eq!(
            cams[0].coordinates,
            RawCoordinates::Geographic {
                lat: Some(25.034),
                lng: Some(121.5645)
            }
        );
        assert_eq!(
            cams[1].coordinates,
            RawCoordinates::Geographic {
                lat: None,
                lng: Some(121.5)
            }
        );
    }

    #[tokio::test]
    async fn one_failing_source_does_not_hide_the_others() {
        let path = write_fixture("exits.csv", "name,lat,lng\nExit 1,25.0330,121.5630\n");
        let store = SourceStore::new(
            vec![
                csv_source("mrt", "metro", &path),
                csv_source("robbery", "robbery_incident", std::path::Path::new("/nonexistent.csv")),
            ],
            Duration::from_secs(5),
        )
        .unwrap();

        let loaded = store.load_all().await;

        assert_eq!(loaded.unavailable(), ["robbery"]);
        assert_eq!(loaded.failures[0].kind, FeatureKind::IncidentReport);
        assert_eq!(loaded.sources.get(FeatureKind::TransitExit).unwrap().len(), 1);
        assert!(loaded.sources.get(FeatureKind::IncidentReport).is_none());
    }

    #[tokio::test]
    async fn cached_records_survive_file_changes_within_ttl() {
        let path = write_fixture("lamps.csv", "name,lat,lng\nL1,25.03,121.56\n");
        let definition = csv_source("lamps", "streetlight", &path);
        let store = SourceStore::new(vec![definition.clone()], Duration::from_secs(5)).unwrap();

        let first = store.load(&definition).await.unwrap();
        std::fs::write(&path, "name,lat,lng\nL1,25.03,121.56\nL2,25.04,121.57\n").unwrap();
        let second = store.load(&definition).await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn same_kind_sources_are_concatenated() {
        let a = write_fixture("police_a.csv", "name,lat,lng\nStation A,25.03,121.56\n");
        let b = write_fixture("police_b.csv", "name,lat,lng\nStation B,25.04,121.57\n");
        let store = SourceStore::new(
            vec![
                csv_source("police_a", "police", &a),
                csv_source("police_b", "police", &b),
            ],
            Duration::from_secs(5),
        )
        .unwrap();

        let loaded = store.load_all().await;
        let names: Vec<_> = loaded
            .sources
            .get(FeatureKind::PoliceStation)
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, ["Station A", "Station B"]);
    }
}
