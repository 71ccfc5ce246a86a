#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the road safety data access facade.
//!
//! These types are the contract between pages and whatever backend sits
//! behind the facade. They are serialized to JSON by the API server with
//! the same snake_case field names the dashboard has always used.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use road_safety_accident_models::{
    DriverAge, JunctionControl, LightCondition, RoadSurface, RoadType, Severity, TimeOfDay,
    VehicleType, WeatherCondition,
};
use road_safety_session_models::Role;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Confidence (percent) below which a prediction is flagged for review.
pub const REVIEW_CONFIDENCE_THRESHOLD: f64 = 80.0;

/// Conditions submitted for a severity prediction.
///
/// Defaults match the initial state of the prediction form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub weather_conditions: WeatherCondition,
    pub light_conditions: LightCondition,
    pub road_type: RoadType,
    /// Posted speed limit in km/h.
    pub speed_limit: u16,
    pub vehicle_type: VehicleType,
    pub junction_control: JunctionControl,
    pub road_surface: RoadSurface,
    pub pedestrian_involved: bool,
    pub alcohol_involved: bool,
    pub driver_age: DriverAge,
    pub time_of_day: TimeOfDay,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            weather_conditions: WeatherCondition::default(),
            light_conditions: LightCondition::default(),
            road_type: RoadType::default(),
            speed_limit: 60,
            vehicle_type: VehicleType::default(),
            junction_control: JunctionControl::default(),
            road_surface: RoadSurface::default(),
            pedestrian_involved: false,
            alcohol_involved: false,
            driver_age: DriverAge::default(),
            time_of_day: TimeOfDay::default(),
        }
    }
}

/// A severity prediction for one set of conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Prediction identifier.
    pub id: String,
    /// Predicted severity.
    pub severity: Severity,
    /// Confidence as a percentage (0-100).
    pub confidence: f64,
    /// Contributing factor name to weight in `[0, 1]`.
    pub factors: BTreeMap<String, f64>,
    /// Whether a human should review this prediction.
    pub needs_review: bool,
    /// Responder guidance for the predicted severity.
    pub recommendation: String,
    /// When the prediction was made.
    pub timestamp: DateTime<Utc>,
    /// The conditions the prediction was made for.
    pub conditions: PredictionInput,
}

impl PredictionResult {
    /// Whether `confidence` is low enough to require review.
    #[must_use]
    pub fn confidence_needs_review(confidence: f64) -> bool {
        confidence < REVIEW_CONFIDENCE_THRESHOLD
    }

    /// Sum of all factor weights.
    #[must_use]
    pub fn factor_weight_total(&self) -> f64 {
        self.factors.values().sum()
    }
}

/// Aggregate accident statistics for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_accidents: u64,
    pub fatal: u64,
    pub serious: u64,
    pub slight: u64,
    /// Model accuracy as a percentage.
    pub accuracy: f64,
    /// Typical prediction response time label (e.g. `"0.8s"`).
    pub response_time: String,
}

impl Stats {
    /// Count for a single severity.
    #[must_use]
    pub const fn count_for(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Fatal => self.fatal,
            Severity::Serious => self.serious,
            Severity::Slight => self.slight,
        }
    }
}

/// System summary shown on the admin page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_predictions: u64,
    /// Model accuracy as a percentage.
    pub accuracy: f64,
    pub avg_response_time: String,
    pub system_uptime: String,
}

/// Whether an account may currently sign in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// One row of the admin page's user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    /// Predictions this user has requested.
    pub predictions: u64,
}

/// Query parameters for the hotspots endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotspotQueryParams {
    /// Number of records to return.
    pub limit: Option<u32>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error message.
    pub error: String,
}
