//! Runtime configuration read from the environment.

use std::time::Duration;

use safe_route_routing::osrm::DEFAULT_BASE_URL;

/// Server settings. Every field has a default, so an empty environment
/// yields a working local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// OSRM server base URL (`OSRM_BASE_URL`).
    pub osrm_base_url: String,
    /// Limit on one dataset fetch, retries included (`FETCH_TIMEOUT_SECS`).
    pub fetch_timeout: Duration,
    /// Limit on one routing request (`ROUTING_TIMEOUT_SECS`).
    pub routing_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 5001,
            osrm_base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(30),
            routing_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Unset or unparsable
    /// values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .map_or(default, Duration::from_secs)
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            osrm_base_url: lookup("OSRM_BASE_URL").unwrap_or(defaults.osrm_base_url),
            fetch_timeout: secs("FETCH_TIMEOUT_SECS", defaults.fetch_timeout),
            routing_timeout: secs("ROUTING_TIMEOUT_SECS", defaults.routing_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: BTreeMap<_, _> = vars.iter().copied().collect();
        ServerConfig::from_lookup(|key| vars.get(key).map(ToString::to_string))
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), ServerConfig::default());
        assert_eq!(config(&[]).port, 5001);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "8080"),
            ("OSRM_BASE_URL", "http://localhost:5000"),
            ("FETCH_TIMEOUT_SECS", "5"),
        ]);

        assert_eq!(cfg.bind_addr, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.osrm_base_url, "http://localhost:5000");
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(5));
        assert_eq!(cfg.routing_timeout, Duration::from_secs(10));
    }

    #[test]
    fn unparsable_numbers_fall_back() {
        let cfg = config(&[("PORT", "http"), ("ROUTING_TIMEOUT_SECS", "-1")]);
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.routing_timeout, Duration::from_secs(10));
    }
}
