//! Client configuration read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `ROAD_SAFETY_BACKEND` | `mock` | `mock` or `http` |
//! | `ROAD_SAFETY_API_URL` | `http://127.0.0.1:8080` | Server base URL for the HTTP backend |
//! | `ROAD_SAFETY_SESSION_DIR` | `data/client` | Directory holding the stored session |
//! | `ROAD_SAFETY_MOCK_LATENCY` | `on` | Whether the mock backend simulates network delay |
//! | `ROAD_SAFETY_TIMEOUT_SECS` | `30` | Per-request timeout for the HTTP backend |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value for {var}: {value:?} ({expected})")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// The offending value.
        value: String,
        /// What was expected instead.
        expected: &'static str,
    },
}

/// Which [`DataAccess`](crate::DataAccess) implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Locally synthesised data.
    #[default]
    Mock,
    /// The road safety API server.
    Http,
}

impl std::str::FromStr for BackendKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "http" | "server" => Ok(Self::Http),
            _ => Err(()),
        }
    }
}

/// Settings for the dashboard client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend: BackendKind,
    pub api_url: String,
    pub session_dir: PathBuf,
    pub mock_latency: bool,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mock,
            api_url: "http://127.0.0.1:8080".to_string(),
            session_dir: PathBuf::from("data/client"),
            mock_latency: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to an
    /// unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to an
    /// unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("ROAD_SAFETY_BACKEND") {
            config.backend = value.parse().map_err(|()| ConfigError::InvalidValue {
                var: "ROAD_SAFETY_BACKEND",
                value,
                expected: "mock or http",
            })?;
        }

        if let Some(value) = lookup("ROAD_SAFETY_API_URL") {
            config.api_url = value.trim_end_matches('/').to_string();
        }

        if let Some(value) = lookup("ROAD_SAFETY_SESSION_DIR") {
            config.session_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("ROAD_SAFETY_MOCK_LATENCY") {
            config.mock_latency = match value.trim().to_lowercase().as_str() {
                "on" | "true" | "1" | "yes" => true,
                "off" | "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "ROAD_SAFETY_MOCK_LATENCY",
                        value,
                        expected: "on or off",
                    });
                }
            };
        }

        if let Some(value) = lookup("ROAD_SAFETY_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "ROAD_SAFETY_TIMEOUT_SECS",
                    value: value.clone(),
                    expected: "a positive whole number of seconds",
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.backend, BackendKind::Mock);
        assert!(config.mock_latency);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("ROAD_SAFETY_BACKEND", "HTTP"),
            ("ROAD_SAFETY_API_URL", "http://api.local:9000/"),
            ("ROAD_SAFETY_SESSION_DIR", "/tmp/rs"),
            ("ROAD_SAFETY_MOCK_LATENCY", "off"),
            ("ROAD_SAFETY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.api_url, "http://api.local:9000");
        assert_eq!(config.session_dir, PathBuf::from("/tmp/rs"));
        assert!(!config.mock_latency);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup_from(&[("ROAD_SAFETY_BACKEND", "grpc")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "ROAD_SAFETY_BACKEND",
                ..
            }
        ));

        assert!(
            ClientConfig::from_lookup(lookup_from(&[("ROAD_SAFETY_TIMEOUT_SECS", "soon")]))
                .is_err()
        );
        assert!(
            ClientConfig::from_lookup(lookup_from(&[("ROAD_SAFETY_MOCK_LATENCY", "maybe")]))
                .is_err()
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[("ROAD_SAFETY_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "ROAD_SAFETY_TIMEOUT_SECS",
                ..
            }
        ));

        let config =
            ClientConfig::from_lookup(lookup_from(&[("ROAD_SAFETY_TIMEOUT_SECS", "1")])).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}
