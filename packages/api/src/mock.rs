//! Locally synthesised backend.
//!
//! Results come from fixed records and the canned prediction templates in
//! `fixtures/predictions.toml`, with random draws where the dashboard needs
//! variety. Each operation waits for a simulated network delay first.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;
use rand::{Rng as _, SeedableRng as _};
use road_safety_accident_models::{AccidentRecord, RoadType, Severity, WeatherCondition};
use road_safety_api_models::{
    AdminStats, AdminUser, PredictionInput, PredictionResult, Stats, UserStatus,
};
use road_safety_session_models::{ContactDetails, Role, Session, SignupRequest};
use serde::Deserialize;

use crate::{ApiError, DataAccess};

/// Demo address that always signs in as an administrator.
pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";

/// Centre of generated hotspots (central London).
pub const HOTSPOT_CENTER: (f64, f64) = (51.5074, -0.1278);

/// Maximum distance, in degrees, of a generated hotspot from the centre on
/// each axis.
const HOTSPOT_JITTER_DEGREES: f64 = 0.05;

/// Generated hotspot dates fall within this many days before now.
const HOTSPOT_WINDOW_DAYS: i64 = 30;

const TEMPLATES_TOML: &str = include_str!("../fixtures/predictions.toml");

/// A canned prediction outcome.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionTemplate {
    pub severity: Severity,
    pub confidence: f64,
    pub factors: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct TemplateFile {
    prediction: Vec<PredictionTemplate>,
}

/// Parses the embedded prediction templates.
///
/// # Errors
///
/// Returns [`ApiError::Fixture`] if the fixture does not parse or holds no
/// templates.
pub fn prediction_templates() -> Result<Vec<PredictionTemplate>, ApiError> {
    let file: TemplateFile = toml::from_str(TEMPLATES_TOML).map_err(|e| ApiError::Fixture {
        message: format!("predictions.toml: {e}"),
    })?;

    if file.prediction.is_empty() {
        return Err(ApiError::Fixture {
            message: "predictions.toml holds no templates".to_string(),
        });
    }

    Ok(file.prediction)
}

/// Simulated delay of each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub login: Duration,
    pub signup: Duration,
    pub predict: Duration,
    pub stats: Duration,
    pub hotspots: Duration,
    pub admin_stats: Duration,
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(1000),
            signup: Duration::from_millis(1500),
            predict: Duration::from_millis(2000),
            stats: Duration::from_millis(500),
            hotspots: Duration::from_millis(800),
            admin_stats: Duration::from_millis(500),
        }
    }
}

impl MockLatency {
    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            login: Duration::ZERO,
            signup: Duration::ZERO,
            predict: Duration::ZERO,
            stats: Duration::ZERO,
            hotspots: Duration::ZERO,
            admin_stats: Duration::ZERO,
        }
    }
}

/// Backend that fabricates every response.
pub struct MockBackend {
    latency: MockLatency,
    templates: Vec<PredictionTemplate>,
    rng: Mutex<StdRng>,
}

impl MockBackend {
    /// Creates a backend seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Fixture`] if the prediction templates are
    /// unusable.
    pub fn new(latency: MockLatency) -> Result<Self, ApiError> {
        Self::with_rng(latency, StdRng::from_entropy())
    }

    /// Creates a backend with a fixed seed so draws are reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Fixture`] if the prediction templates are
    /// unusable.
    pub fn with_seed(latency: MockLatency, seed: u64) -> Result<Self, ApiError> {
        Self::with_rng(latency, StdRng::seed_from_u64(seed))
    }

    fn with_rng(latency: MockLatency, rng: StdRng) -> Result<Self, ApiError> {
        Ok(Self {
            latency,
            templates: prediction_templates()?,
            rng: Mutex::new(rng),
        })
    }

    /// The templates predictions are drawn from.
    #[must_use]
    pub fn templates(&self) -> &[PredictionTemplate] {
        &self.templates
    }

    fn draw_template(&self) -> PredictionTemplate {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let idx = rng.gen_range(0..self.templates.len());
        self.templates[idx].clone()
    }

    fn generate_hotspots(&self, limit: u32, now: DateTime<Utc>) -> Vec<AccidentRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let window_ms = HOTSPOT_WINDOW_DAYS * 24 * 60 * 60 * 1000;

        (1..=u64::from(limit))
            .map(|id| {
                let latitude = HOTSPOT_CENTER.0
                    + rng.gen_range(-HOTSPOT_JITTER_DEGREES..HOTSPOT_JITTER_DEGREES);
                let longitude = HOTSPOT_CENTER.1
                    + rng.gen_range(-HOTSPOT_JITTER_DEGREES..HOTSPOT_JITTER_DEGREES);
                let age = chrono::Duration::milliseconds(rng.gen_range(0..window_ms));

                let severity = *Severity::all()
                    .choose(&mut *rng)
                    .unwrap_or(&Severity::Slight);
                let weather = WeatherCondition::hotspot_options()
                    .choose(&mut *rng)
                    .map_or("Clear", |w| w.as_ref());
                let road_type = RoadType::hotspot_options()
                    .choose(&mut *rng)
                    .map_or("Local", |r| r.as_ref());

                AccidentRecord {
                    id,
                    latitude,
                    longitude,
                    severity,
                    date: now - age,
                    weather: weather.to_string(),
                    road_type: road_type.to_string(),
                }
            })
            .collect()
    }
}

fn demo_users() -> Vec<AdminUser> {
    [
        (1, "John Admin", DEMO_ADMIN_EMAIL, Role::Admin, UserStatus::Active, 24),
        (2, "Jane User", "jane@example.com", Role::User, UserStatus::Active, 15),
        (3, "Bob Tester", "bob@example.com", Role::User, UserStatus::Inactive, 8),
        (4, "Alice Analyst", "alice@example.com", Role::User, UserStatus::Active, 12),
    ]
    .into_iter()
    .map(|(id, name, email, role, status, predictions)| AdminUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        predictions,
    })
    .collect()
}

/// Role the mock assigns to an email address.
///
/// Placeholder policy: any address containing `admin` is an administrator.
#[must_use]
pub fn role_for_email(email: &str) -> Role {
    if email.contains("admin") || email == DEMO_ADMIN_EMAIL {
        Role::Admin
    } else {
        Role::User
    }
}

fn mock_token(now: DateTime<Utc>) -> String {
    format!("mock-jwt-token-{}", now.timestamp_millis())
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait::async_trait]
impl DataAccess for MockBackend {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        simulate(self.latency.login).await;

        if email.is_empty() || password.is_empty() {
            log::debug!("Rejecting login with empty email or password");
            return Err(ApiError::InvalidCredentials);
        }

        let now = Utc::now();
        let name = email.split('@').next().unwrap_or(email).to_string();

        Ok(Session {
            id: "1".to_string(),
            name,
            email: email.to_string(),
            role: role_for_email(email),
            token: mock_token(now),
            created_at: now,
            updated_at: None,
            contact: ContactDetails::default(),
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session, ApiError> {
        simulate(self.latency.signup).await;

        if !request.has_required_fields() {
            return Err(ApiError::MissingFields);
        }

        let now = Utc::now();

        Ok(Session {
            id: now.timestamp_millis().to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            role: Role::User,
            token: mock_token(now),
            created_at: now,
            updated_at: None,
            contact: ContactDetails::default(),
        })
    }

    async fn predict(&self, conditions: &PredictionInput) -> Result<PredictionResult, ApiError> {
        simulate(self.latency.predict).await;

        let template = self.draw_template();
        log::debug!(
            "Mock prediction: {} at {}%",
            template.severity,
            template.confidence
        );

        Ok(PredictionResult {
            id: uuid::Uuid::new_v4().to_string(),
            severity: template.severity,
            confidence: template.confidence,
            needs_review: PredictionResult::confidence_needs_review(template.confidence),
            recommendation: template.severity.recommendation().to_string(),
            factors: template.factors,
            timestamp: Utc::now(),
            conditions: conditions.clone(),
        })
    }

    async fn get_stats(&self) -> Result<Stats, ApiError> {
        simulate(self.latency.stats).await;

        Ok(Stats {
            total_accidents: 1256,
            fatal: 89,
            serious: 342,
            slight: 825,
            accuracy: 92.5,
            response_time: "0.8s".to_string(),
        })
    }

    async fn get_hotspots(&self, limit: u32) -> Result<Vec<AccidentRecord>, ApiError> {
        simulate(self.latency.hotspots).await;
        Ok(self.generate_hotspots(limit, Utc::now()))
    }

    async fn get_admin_stats(&self) -> Result<AdminStats, ApiError> {
        simulate(self.latency.admin_stats).await;

        Ok(AdminStats {
            total_users: 156,
            active_users: 128,
            total_predictions: 2345,
            accuracy: 92.5,
            avg_response_time: "0.8s".to_string(),
            system_uptime: "99.9%".to_string(),
        })
    }

    async fn get_admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        simulate(self.latency.admin_stats).await;
        Ok(demo_users())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn backend() -> MockBackend {
        MockBackend::with_seed(MockLatency::none(), 7).unwrap()
    }

    #[test]
    fn templates_parse() {
        let templates = prediction_templates().unwrap();
        assert_eq!(templates.len(), 3);
        for t in &templates {
            assert!((0.0..=100.0).contains(&t.confidence));
            let total: f64 = t.factors.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "{:?} sums to {total}", t.severity);
        }
    }

    #[tokio::test]
    async fn login_assigns_roles() {
        let api = backend();

        let user = api.login("a@b.com", "x").await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.name, "a");
        assert!(user.is_valid());
        assert!(user.token.starts_with("mock-jwt-token-"));

        let admin = api.login(DEMO_ADMIN_EMAIL, "x").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn login_rejects_empty_fields() {
        let api = backend();
        assert!(matches!(
            api.login("", "x").await,
            Err(ApiError::InvalidCredentials)
        ));
        assert!(matches!(
            api.login("a@b.com", "").await,
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn signup_requires_email_and_password() {
        let api = backend();

        let missing = SignupRequest {
            name: "N".to_string(),
            email: "n@example.com".to_string(),
            password: String::new(),
        };
        assert!(matches!(
            api.signup(&missing).await,
            Err(ApiError::MissingFields)
        ));

        let ok = SignupRequest {
            password: "secret".to_string(),
            ..missing
        };
        let session = api.signup(&ok).await.unwrap();
        assert_eq!(session.email, "n@example.com");
        assert_eq!(session.name, "N");
        assert_eq!(session.role, Role::User);
        assert!(session.is_valid());
    }

    #[tokio::test]
    async fn predictions_flag_low_confidence() {
        let api = backend();
        let conditions = PredictionInput::default();
        let mut seen = BTreeSet::new();

        for _ in 0..60 {
            let result = api.predict(&conditions).await.unwrap();
            assert_eq!(result.needs_review, result.confidence < 80.0);
            assert_eq!(result.conditions, conditions);
            assert_eq!(result.recommendation, result.severity.recommendation());
            seen.insert(result.severity);
        }

        assert_eq!(seen.len(), 3, "uniform draw never produced every template");
    }

    #[tokio::test]
    async fn hotspots_are_well_formed() {
        let api = backend();
        let hotspots = api.get_hotspots(50).await.unwrap();
        assert_eq!(hotspots.len(), 50);

        let now = Utc::now();
        for (i, h) in hotspots.iter().enumerate() {
            assert_eq!(h.id, i as u64 + 1);
            assert!(h.has_valid_coordinates());
            assert!(Severity::all().contains(&h.severity));
            assert!((h.latitude - HOTSPOT_CENTER.0).abs() <= HOTSPOT_JITTER_DEGREES);
            assert!((h.longitude - HOTSPOT_CENTER.1).abs() <= HOTSPOT_JITTER_DEGREES);
            assert!(h.date <= now);
            assert!(now - h.date <= chrono::Duration::days(HOTSPOT_WINDOW_DAYS));
            assert!(["Clear", "Rain", "Fog"].contains(&h.weather.as_str()));
            assert!(["Highway", "Arterial", "Local"].contains(&h.road_type.as_str()));
        }

        assert!(api.get_hotspots(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fixed_aggregates() {
        let api = backend();
        let stats = api.get_stats().await.unwrap();
        assert_eq!(stats.fatal + stats.serious + stats.slight, stats.total_accidents);

        let admin = api.get_admin_stats().await.unwrap();
        assert_eq!(admin.total_users, 156);
        assert_eq!(admin.system_uptime, "99.9%");
    }

    #[tokio::test]
    async fn admin_users_include_the_demo_admin() {
        let users = backend().get_admin_users().await.unwrap();
        assert_eq!(users.len(), 4);

        let admins: Vec<&AdminUser> = users.iter().filter(|u| u.role == Role::Admin).collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, DEMO_ADMIN_EMAIL);
        assert_eq!(role_for_email(&admins[0].email), Role::Admin);

        let inactive = users
            .iter()
            .filter(|u| u.status == UserStatus::Inactive)
            .count();
        assert_eq!(inactive, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_latency_is_simulated() {
        let api = MockBackend::with_seed(MockLatency::default(), 1).unwrap();
        let start = tokio::time::Instant::now();
        api.get_stats().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
