//! Config-driven dataset definition.
//!
//! [`SourceDefinition`] captures everything unique about a dataset: where
//! to fetch it, which feature kind it feeds, how long it stays cached, and
//! how its upstream field names map onto [`RawRecord`]. A single generic
//! implementation handles every dataset.

use std::path::PathBuf;
use std::time::Duration;

use safe_route_feature_models::{FeatureAttributes, FeatureKind, RawCoordinates, RawRecord};
use safe_route_geo::{ProjectedPoint, to_geographic};
use serde::Deserialize;

use crate::csv_file::fetch_csv_file;
use crate::open_data::{TAIPEI_OPEN_DATA_URL, fetch_json_blob, fetch_taipei_open_data};
use crate::parsing::{first_text, get_coordinate, get_text};
use crate::SourceError;

// ── Top-level source definition ──────────────────────────────────────────

/// A complete, config-driven dataset definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"cctv"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Feature kind every record of this dataset becomes.
    pub kind: FeatureKind,
    /// How long fetched records stay cached, in seconds.
    pub ttl_secs: u64,
    /// How to fetch raw records.
    pub fetcher: FetcherConfig,
    /// Field name mappings for normalization.
    pub fields: FieldMapping,
}

// ── Fetcher config ───────────────────────────────────────────────────────

/// How to fetch raw records.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// Taipei open-data dataset API (`result.results`).
    TaipeiOpenData {
        /// Resource ID of the dataset.
        resource_id: String,
        /// Maximum records to request.
        #[serde(default = "default_open_data_limit")]
        limit: u64,
        /// API base URL.
        #[serde(default = "default_open_data_url")]
        base_url: String,
    },
    /// A JSON document that is a bare array of records.
    JsonBlob {
        /// Document URL.
        url: String,
    },
    /// A local CSV file with a header row.
    CsvFile {
        /// File path, relative to the working directory unless absolute.
        path: PathBuf,
    },
}

const fn default_open_data_limit() -> u64 {
    1000
}

fn default_open_data_url() -> String {
    TAIPEI_OPEN_DATA_URL.to_string()
}

// ── Field mapping ────────────────────────────────────────────────────────

/// Maps upstream field names onto the canonical [`RawRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Where the position is stored.
    pub coordinates: CoordinateFields,
    /// Field names for the display name, tried in order (first non-empty
    /// wins).
    #[serde(default)]
    pub name: Vec<String>,
    /// Name used when no name field has a value. Records with neither are
    /// dropped.
    pub default_name: Option<String>,
    /// Text prepended to the name (e.g. `"搶奪案件 - "` before a date).
    pub name_prefix: Option<String>,
    /// Phone number field.
    pub phone: Option<String>,
    /// Phone number used when the field is empty.
    pub default_phone: Option<String>,
    /// Street address field.
    pub address: Option<String>,
    /// Incident date field.
    pub incident_date: Option<String>,
    /// Incident time band field.
    pub incident_time: Option<String>,
    /// Incident location description field.
    pub location_desc: Option<String>,
    /// Convert projected coordinates to WGS84 once at fetch time instead
    /// of on every query. Used for very large projected datasets.
    #[serde(default)]
    pub project_on_load: bool,
}

/// Where a record's position is stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinateFields {
    /// WGS84 latitude/longitude fields.
    Geographic {
        /// Latitude field name.
        lat: String,
        /// Longitude field name.
        lng: String,
    },
    /// TWD97 TM2 grid fields.
    Projected {
        /// Easting field name.
        x: String,
        /// Northing field name.
        y: String,
    },
}

impl CoordinateFields {
    /// Extracts the raw coordinates. Missing or unparseable components
    /// are `None`.
    fn extract(&self, record: &serde_json::Value) -> RawCoordinates {
        match self {
            Self::Geographic { lat, lng } => RawCoordinates::Geographic {
                lat: get_coordinate(record, lat),
                lng: get_coordinate(record, lng),
            },
            Self::Projected { x, y } => RawCoordinates::Projected {
                x: get_coordinate(record, x),
                y: get_coordinate(record, y),
            },
        }
    }
}

impl FieldMapping {
    /// Maps one upstream record. Returns `None` when the record has no
    /// name and no default name is configured.
    fn map_record(&self, record: &serde_json::Value) -> Option<RawRecord> {
        let name = first_text(record, &self.name).or_else(|| self.default_name.clone())?;
        let name = match &self.name_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name,
        };

        let mut coordinates = self.coordinates.extract(record);
        if self.project_on_load
            && let RawCoordinates::Projected {
                x: Some(x),
                y: Some(y),
            } = coordinates
            && x.is_finite()
            && y.is_finite()
        {
            coordinates = RawCoordinates::geographic(to_geographic(ProjectedPoint::new(x, y)));
        }

        let field = |f: &Option<String>| f.as_deref().and_then(|f| get_text(record, f));

        Some(RawRecord {
            name,
            coordinates,
            attributes: FeatureAttributes {
                phone: field(&self.phone).or_else(|| self.default_phone.clone()),
                address: field(&self.address),
                incident_date: field(&self.incident_date),
                incident_time: field(&self.incident_time),
                location_desc: field(&self.location_desc),
            },
        })
    }
}

// ── Behaviour ────────────────────────────────────────────────────────────

impl SourceDefinition {
    /// Cache lifetime of this dataset.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Fetches the raw upstream records.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails.
    pub async fn fetch(
        &self,
        client: &reqwest::Client,
    ) -> Result<Vec<serde_json::Value>, SourceError> {
        match &self.fetcher {
            FetcherConfig::TaipeiOpenData {
                resource_id,
                limit,
                base_url,
            } => fetch_taipei_open_data(client, base_url, resource_id, *limit).await,
            FetcherConfig::JsonBlob { url } => fetch_json_blob(client, url).await,
            FetcherConfig::CsvFile { path } => fetch_csv_file(path).await,
        }
    }

    /// Maps upstream records onto [`RawRecord`]s.
    ///
    /// Records are kept even when their coordinates are unusable; the
    /// feature index skips those at query time.
    #[must_use]
    pub fn normalize(&self, records: &[serde_json::Value]) -> Vec<RawRecord> {
        let normalized: Vec<_> = records
            .iter()
            .filter_map(|record| self.fields.map_record(record))
            .collect();

        let dropped = records.len() - normalized.len();
        if dropped > 0 {
            log::debug!("[{}] dropped {dropped} records without a name", self.id);
        }

        normalized
    }
}

/// Parses a TOML string into a [`SourceDefinition`].
///
/// # Errors
///
/// Returns an error string if the TOML is invalid.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(toml: &str) -> FieldMapping {
        toml::de::from_str(toml).unwrap()
    }

    #[test]
    fn maps_geographic_string_coordinates() {
        let fields = mapping(
            r#"
            name = ["攝影機編號"]
            phone = "電話"
            [coordinates]
            type = "geographic"
            lat = "wgsy"
            lng = "wgsx"
            "#,
        );
        let record = serde_json::json!({"攝影機編號": "A001", "wgsy": "25.0418", "wgsx": "121.5436"});

        let mapped = fields.map_record(&record).unwrap();
        assert_eq!(mapped.name, "A001");
        assert_eq!(
            mapped.coordinates,
            RawCoordinates::Geographic {
                lat: Some(25.0418),
                lng: Some(121.5436)
            }
        );
        assert_eq!(mapped.attributes.phone, None);
    }

    #[test]
    fn name_falls_back_through_fields_then_default() {
        let fields = mapping(
            r#"
            name = ["中文單位名稱", "英文單位名稱"]
            default_name = "Unknown Police Station"
            default_phone = "110"
            phone = "電話"
            [coordinates]
            type = "projected"
            x = "POINT_X"
            y = "POINT_Y"
            "#,
        );

        let english = serde_json::json!({"英文單位名稱": "Xinyi Precinct", "POINT_X": "307160"});
        let mapped = fields.map_record(&english).unwrap();
        assert_eq!(mapped.name, "Xinyi Precinct");
        assert_eq!(mapped.attributes.phone.as_deref(), Some("110"));
        assert_eq!(
            mapped.coordinates,
            RawCoordinates::Projected {
                x: Some(307_160.0),
                y: None
            }
        );

        let anonymous = serde_json::json!({"電話": "02-2758-5000"});
        let mapped = fields.map_record(&anonymous).unwrap();
        assert_eq!(mapped.name, "Unknown Police Station");
        assert_eq!(mapped.attributes.phone.as_deref(), Some("02-2758-5000"));
    }

    #[test]
    fn records_without_a_name_are_dropped() {
        let fields = mapping(
            r#"
            name = ["出入口名稱"]
            [coordinates]
            type = "geographic"
            lat = "緯度"
            lng = "經度"
            "#,
        );
        let record = serde_json::json!({"緯度": 25.04, "經度": 121.56});
        assert!(fields.map_record(&record).is_none());
    }

    #[test]
    fn incident_names_get_a_prefix() {
        let fields = mapping(
            r#"
            name = ["發生日期"]
            default_name = "Unknown"
            name_prefix = "搶奪案件 - "
            incident_date = "發生日期"
            incident_time = "發生時段"
            location_desc = "發生地點"
            [coordinates]
            type = "geographic"
            lat = "緯度"
            lng = "經度"
            "#,
        );
        let record = serde_json::json!({
            "發生日期": "1130105",
            "發生時段": "22~24",
            "發生地點": "臺北市信義區松仁路",
            "緯度": "25.0330",
            "經度": "121.5680",
        });

        let mapped = fields.map_record(&record).unwrap();
        assert_eq!(mapped.name, "搶奪案件 - 1130105");
        assert_eq!(mapped.attributes.incident_time.as_deref(), Some("22~24"));
        assert_eq!(
            mapped.attributes.location_desc.as_deref(),
            Some("臺北市信義區松仁路")
        );
    }

    #[test]
    fn project_on_load_converts_once() {
        let fields = mapping(
            r#"
            name = ["SerialNumber"]
            default_name = "Unknown"
            project_on_load = true
            [coordinates]
            type = "projected"
            x = "TWD97X"
            y = "TWD97Y"
            "#,
        );
        let record = serde_json::json!({"SerialNumber": "L-1", "TWD97X": "306500", "TWD97Y": "2770100"});

        let mapped = fields.map_record(&record).unwrap();
        let RawCoordinates::Geographic {
            lat: Some(lat),
            lng: Some(lng),
        } = mapped.coordinates
        else {
            panic!("expected geographic coordinates, got {:?}", mapped.coordinates);
        };
        assert!((25.0..25.1).contains(&lat), "lat = {lat}");
        assert!((121.5..121.6).contains(&lng), "lng = {lng}");

        let broken = serde_json::json!({"SerialNumber": "L-2", "TWD97X": "n/a", "TWD97Y": "2770100"});
        assert!(matches!(
            fields.map_record(&broken).unwrap().coordinates,
            RawCoordinates::Projected { x: None, .. }
        ));
    }

    #[test]
    fn parses_fetcher_variants() {
        let def = parse_source_toml(
            r#"
            id = "mrt"
            name = "Metro exits"
            kind = "metro"
            ttl_secs = 1800
            [fetcher]
            type = "taipei_open_data"
            resource_id = "307a7f61-e302-4108-a817-877ccbfca7c1"
            [fields]
            name = ["出入口名稱"]
            [fields.coordinates]
            type = "geographic"
            lat = "緯度"
            lng = "經度"
            "#,
        )
        .unwrap();

        assert_eq!(def.kind, FeatureKind::TransitExit);
        assert_eq!(def.ttl(), Duration::from_secs(1800));
        let FetcherConfig::TaipeiOpenData {
            limit, base_url, ..
        } = &def.fetcher
        else {
            panic!("expected taipei_open_data fetcher");
        };
        assert_eq!(*limit, 1000);
        assert_eq!(base_url, TAIPEI_OPEN_DATA_URL);
    }
}
