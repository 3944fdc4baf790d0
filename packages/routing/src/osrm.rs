//! OSRM HTTP client.

use std::time::Duration;

use safe_route_geo_models::GeoPoint;
use safe_route_route_models::CandidateRoute;
use serde::Deserialize;

use crate::{RouteProvider, RoutingError};

/// Public OSRM demo server.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// OSRM route service client (driving profile, alternatives enabled).
#[derive(Debug, Clone)]
pub struct OsrmClient {
    base_url: String,
    client: reqwest::Client,
}

impl OsrmClient {
    /// Creates a client for the OSRM server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, start.lng, start.lat, end.lng, end.lat
        )
    }
}

/// OSRM route response body.
#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    distance: f64,
    #[serde(default)]
    duration: Option<f64>,
    geometry: geojson::Geometry,
}

impl TryFrom<OsrmRoute> for CandidateRoute {
    type Error = RoutingError;

    fn try_from(route: OsrmRoute) -> Result<Self, Self::Error> {
        let positions = match route.geometry.value {
            geojson::Value::LineString(positions) => positions,
            other => {
                return Err(RoutingError::Geometry {
                    message: format!("expected LineString, got {}", type_name(&other)),
                });
            }
        };

        // GeoJSON positions are [lng, lat].
        let geometry = positions
            .into_iter()
            .map(|position| match position.as_slice() {
                [lng, lat, ..] => Ok(GeoPoint::new(*lat, *lng)),
                _ => Err(RoutingError::Geometry {
                    message: format!("position with {} coordinate(s)", position.len()),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            geometry,
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}

const fn type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Parses an OSRM route response. `NoRoute` yields an empty list.
fn parse_response(body: &str) -> Result<Vec<CandidateRoute>, RoutingError> {
    let response: OsrmResponse = serde_json::from_str(body)?;

    match response.code.as_str() {
        "Ok" => response
            .routes
            .into_iter()
            .map(CandidateRoute::try_from)
            .collect(),
        "NoRoute" => Ok(Vec::new()),
        code => Err(RoutingError::Service {
            message: response
                .message
                .map_or_else(|| code.to_string(), |m| format!("{code}: {m}")),
        }),
    }
}

#[async_trait::async_trait]
impl RouteProvider for OsrmClient {
    async fn routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Vec<CandidateRoute>, RoutingError> {
        let url = self.route_url(start, end);
        log::debug!("Requesting routes: {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
                ("steps", "false"),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        // OSRM reports bad queries as 400 with a JSON `code`.
        if !status.is_success() && !status.is_client_error() {
            return Err(RoutingError::Service {
                message: format!("HTTP {status}"),
            });
        }

        let routes = parse_response(&body)?;
        log::info!("OSRM returned {} route(s)", routes.len());
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alternatives_as_lat_lng() {
        let body = serde_json::json!({
            "code": "Ok",
            "routes": [
                {
                    "distance": 1523.4,
                    "duration": 212.1,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[121.5645, 25.0340], [121.5650, 25.0352], [121.5661, 25.0370]]
                    }
                },
                {
                    "distance": 1710.0,
                    "duration": 240.0,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[121.5645, 25.0340], [121.5661, 25.0370]]
                    }
                }
            ],
            "waypoints": []
        })
        .to_string();

        let routes = parse_response(&body).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].geometry.len(), 3);
        assert_eq!(routes[0].geometry[0], GeoPoint::new(25.0340, 121.5645));
        assert!((routes[0].distance_m - 1523.4).abs() < f64::EPSILON);
        assert_eq!(routes[1].duration_s, Some(240.0));
    }

    #[test]
    fn no_route_is_empty() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn service_errors_keep_the_message() {
        let body = r#"{"code":"InvalidQuery","message":"Query string malformed"}"#;
        let err = parse_response(body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Routing service error: InvalidQuery: Query string malformed"
        );
    }

    #[test]
    fn non_linestring_geometry_is_rejected() {
        let body = serde_json::json!({
            "code": "Ok",
            "routes": [{
                "distance": 10.0,
                "geometry": {"type": "Point", "coordinates": [121.56, 25.03]}
            }]
        })
        .to_string();
        assert!(matches!(
            parse_response(&body),
            Err(RoutingError::Geometry { .. })
        ));
    }

    #[test]
    fn url_puts_longitude_first() {
        let client = OsrmClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        let url = client.route_url(GeoPoint::new(25.03, 121.56), GeoPoint::new(25.04, 121.57));
        assert_eq!(url, "http://localhost:5000/route/v1/driving/121.56,25.03;121.57,25.04");
    }
}
