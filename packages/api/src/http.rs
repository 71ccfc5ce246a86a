//! Backend that calls the road safety API server.

use std::time::Duration;

use road_safety_accident_models::AccidentRecord;
use road_safety_api_models::{
    AdminStats, AdminUser, ApiErrorBody, PredictionInput, PredictionResult, Stats,
};
use road_safety_session_models::{LoginRequest, Session, SignupRequest};
use serde::de::DeserializeOwned;

use crate::{ApiError, DataAccess};

/// [`DataAccess`] over the server's JSON API.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend for the server at `base_url` (for example
    /// `http://127.0.0.1:8080`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("road-safety/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// Sends a request and decodes a JSON success body. Error statuses go
    /// through [`error_for_status`].
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map_or_else(|_| body.clone(), |b| b.error);

        log::warn!("{url} returned {status}: {message}");

        Err(error_for_status(status, message))
    }
}

/// 401 maps to [`ApiError::InvalidCredentials`]; every other status becomes
/// [`ApiError::Server`].
fn error_for_status(status: reqwest::StatusCode, message: String) -> ApiError {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        ApiError::InvalidCredentials
    } else {
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// Signup answers 400 when email or password is missing.
fn signup_error(e: ApiError) -> ApiError {
    match e {
        ApiError::Server { status: 400, .. } => ApiError::MissingFields,
        other => other,
    }
}

#[async_trait::async_trait]
impl DataAccess for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.client.post(self.url("/auth/login")).json(&body))
            .await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session, ApiError> {
        self.send(self.client.post(self.url("/auth/signup")).json(request))
            .await
            .map_err(signup_error)
    }

    async fn predict(&self, conditions: &PredictionInput) -> Result<PredictionResult, ApiError> {
        self.send(self.client.post(self.url("/predict")).json(conditions))
            .await
    }

    async fn get_stats(&self) -> Result<Stats, ApiError> {
        self.send(self.client.get(self.url("/data/stats"))).await
    }

    async fn get_hotspots(&self, limit: u32) -> Result<Vec<AccidentRecord>, ApiError> {
        self.send(
            self.client
                .get(self.url("/data/hotspots"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    async fn get_admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.send(self.client.get(self.url("/admin/stats"))).await
    }

    async fn get_admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.send(self.client.get(self.url("/admin/users"))).await
    }
}
