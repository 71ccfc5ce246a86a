#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data access facade for the road safety dashboard.
//!
//! Every page requests domain data through the [`DataAccess`] trait and
//! nothing else. Two backends implement it:
//!
//! - [`mock::MockBackend`] synthesises results locally after a simulated
//!   delay. It is the only place random values are produced.
//! - [`http::HttpBackend`] calls the road safety API server over JSON.
//!
//! Callers pick one at startup via [`create_backend`] and never see the
//! difference.

pub mod config;
pub mod gate;
pub mod history;
pub mod http;
pub mod mock;

use road_safety_accident_models::AccidentRecord;
use road_safety_api_models::{AdminStats, AdminUser, PredictionInput, PredictionResult, Stats};
use road_safety_session_models::{Session, SignupRequest};
use thiserror::Error;

use crate::config::{BackendKind, ClientConfig};

/// Errors that can occur during data access.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Login was attempted with an empty email or password, or the server
    /// rejected the credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup was attempted without an email or password.
    #[error("Missing required fields")]
    MissingFields,

    /// The backend could not be reached.
    #[error("Network error: {message}")]
    Network {
        /// Description of what went wrong.
        message: String,
    },

    /// The backend did not answer in time.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with an error status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of what went wrong.
        message: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedded mock fixtures are unusable.
    #[error("Fixture error: {message}")]
    Fixture {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode {
                message: e.to_string(),
            }
        } else {
            Self::Network {
                message: e.to_string(),
            }
        }
    }
}

/// The single seam through which pages request domain data.
#[async_trait::async_trait]
pub trait DataAccess: Send + Sync {
    /// Authenticates a user and issues a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidCredentials`] if either field is empty or
    /// the credentials are rejected.
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    /// Registers a user and issues a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingFields`] if email or password is missing.
    async fn signup(&self, request: &SignupRequest) -> Result<Session, ApiError>;

    /// Predicts accident severity for the given conditions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend fails.
    async fn predict(&self, conditions: &PredictionInput) -> Result<PredictionResult, ApiError>;

    /// Fetches aggregate accident statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend fails.
    async fn get_stats(&self) -> Result<Stats, ApiError>;

    /// Fetches up to `limit` accident hotspot records.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend fails.
    async fn get_hotspots(&self, limit: u32) -> Result<Vec<AccidentRecord>, ApiError>;

    /// Fetches the administrative system summary.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend fails.
    async fn get_admin_stats(&self) -> Result<AdminStats, ApiError>;

    /// Lists the accounts shown on the admin page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend fails.
    async fn get_admin_users(&self) -> Result<Vec<AdminUser>, ApiError>;
}

/// Creates the backend selected by `config`.
///
/// # Errors
///
/// Returns [`ApiError`] if the mock fixtures cannot be loaded or the HTTP
/// client cannot be built.
pub fn create_backend(config: &ClientConfig) -> Result<Box<dyn DataAccess>, ApiError> {
    match config.backend {
        BackendKind::Mock => {
            let latency = if config.mock_latency {
                mock::MockLatency::default()
            } else {
                mock::MockLatency::none()
            };
            log::debug!("Using mock backend (latency {latency:?})");
            Ok(Box::new(mock::MockBackend::new(latency)?))
        }
        BackendKind::Http => {
            log::debug!("Using HTTP backend at {}", config.api_url);
            Ok(Box::new(http::HttpBackend::new(
                &config.api_url,
                config.timeout,
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn mock_backend_from_config() {
        let config = ClientConfig {
            mock_latency: false,
            ..ClientConfig::default()
        };
        let backend = create_backend(&config).unwrap();
        let stats = backend.get_stats().await.unwrap();
        assert_eq!(stats.total_accidents, 1256);
    }

    #[test]
    fn http_backend_from_config() {
        let config = ClientConfig {
            backend: BackendKind::Http,
            api_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            ..ClientConfig::default()
        };
        assert!(create_backend(&config).is_ok());
    }
}
