#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident severity and road-condition taxonomy types.
//!
//! This crate defines the closed enumerations shared by every part of the
//! road-safety system: the three-level accident severity scale and the
//! option lists a prediction form offers for each road condition. It also
//! defines [`AccidentRecord`], the shape of one historical (or synthetic)
//! accident hotspot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a road accident, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Severity {
    /// Minor injuries only.
    Slight,
    /// Injuries requiring medical attention.
    Serious,
    /// At least one fatality.
    Fatal,
}

impl Severity {
    /// Hex colour used to render markers and badges of this severity.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Fatal => "#dc3545",
            Self::Serious => "#ffc107",
            Self::Slight => "#28a745",
        }
    }

    /// Responder guidance shown next to a prediction of this severity.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Fatal => {
                "Immediate emergency response required. Contact EMS and police immediately."
            }
            Self::Serious => {
                "Medical attention required. Secure the area and call emergency services."
            }
            Self::Slight => "Minor injuries. Exchange information and file a police report.",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Slight, Self::Serious, Self::Fatal]
    }
}

/// Weather at the time of the accident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
    Storm,
    Other,
}

impl WeatherCondition {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Clear,
            Self::Rain,
            Self::Snow,
            Self::Fog,
            Self::Storm,
            Self::Other,
        ]
    }

    /// Conditions that appear on recorded hotspots.
    #[must_use]
    pub const fn hotspot_options() -> &'static [Self] {
        &[Self::Clear, Self::Rain, Self::Fog]
    }
}

/// Ambient light conditions.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum LightCondition {
    #[default]
    Daylight,
    #[serde(rename = "Dawn/Dusk")]
    #[strum(serialize = "Dawn/Dusk")]
    DawnDusk,
    #[serde(rename = "Dark-Lighted")]
    #[strum(serialize = "Dark-Lighted")]
    DarkLighted,
    #[serde(rename = "Dark-NotLighted")]
    #[strum(serialize = "Dark-NotLighted")]
    DarkNotLighted,
}

impl LightCondition {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Daylight,
            Self::DawnDusk,
            Self::DarkLighted,
            Self::DarkNotLighted,
        ]
    }
}

/// Classification of the road where the accident happened.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RoadType {
    #[default]
    Highway,
    Arterial,
    Collector,
    Local,
    Rural,
}

impl RoadType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Highway,
            Self::Arterial,
            Self::Collector,
            Self::Local,
            Self::Rural,
        ]
    }

    /// Road types that appear on recorded hotspots.
    #[must_use]
    pub const fn hotspot_options() -> &'static [Self] {
        &[Self::Highway, Self::Arterial, Self::Local]
    }
}

/// Primary vehicle involved.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum VehicleType {
    #[default]
    Car,
    Motorcycle,
    Truck,
    Bus,
    Bicycle,
    Pedestrian,
    Other,
}

impl VehicleType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Car,
            Self::Motorcycle,
            Self::Truck,
            Self::Bus,
            Self::Bicycle,
            Self::Pedestrian,
            Self::Other,
        ]
    }
}

/// Traffic control at the nearest junction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum JunctionControl {
    #[default]
    Signalized,
    #[serde(rename = "Stop Sign")]
    #[strum(serialize = "Stop Sign")]
    StopSign,
    Yield,
    Roundabout,
    /// No control at the junction.
    None,
}

impl JunctionControl {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Signalized,
            Self::StopSign,
            Self::Yield,
            Self::Roundabout,
            Self::None,
        ]
    }
}

/// Condition of the road surface.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RoadSurface {
    #[default]
    Dry,
    Wet,
    Snow,
    Ice,
    Other,
}

impl RoadSurface {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Dry, Self::Wet, Self::Snow, Self::Ice, Self::Other]
    }
}

/// Age bracket of the driver.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DriverAge {
    #[serde(rename = "<18")]
    #[strum(serialize = "<18")]
    Under18,
    #[serde(rename = "18-30")]
    #[strum(serialize = "18-30")]
    From18To30,
    #[default]
    #[serde(rename = "30-45")]
    #[strum(serialize = "30-45")]
    From30To45,
    #[serde(rename = "45-60")]
    #[strum(serialize = "45-60")]
    From45To60,
    #[serde(rename = "60+")]
    #[strum(serialize = "60+")]
    Over60,
}

impl DriverAge {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Under18,
            Self::From18To30,
            Self::From30To45,
            Self::From45To60,
            Self::Over60,
        ]
    }
}

/// Coarse time-of-day bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
    #[serde(rename = "Dawn/Dusk")]
    #[strum(serialize = "Dawn/Dusk")]
    DawnDusk,
}

impl TimeOfDay {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Day, Self::Night, Self::DawnDusk]
    }
}

/// Speed limits (km/h) offered by the prediction form.
pub const SPEED_LIMIT_OPTIONS: &[u16] = &[30, 40, 50, 60, 70, 80, 90, 100, 110, 120];

/// One recorded accident location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentRecord {
    /// Record identifier.
    pub id: u64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Accident severity.
    pub severity: Severity,
    /// When the accident occurred.
    pub date: DateTime<Utc>,
    /// Weather label as recorded at the scene.
    pub weather: String,
    /// Road type label as recorded at the scene.
    pub road_type: String,
}

impl AccidentRecord {
    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub const fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn severity_orders_by_harm() {
        assert!(Severity::Fatal > Severity::Serious);
        assert!(Severity::Serious > Severity::Slight);
        assert_eq!(Severity::all().iter().max(), Some(&Severity::Fatal));
    }

    #[test]
    fn every_severity_has_color_and_recommendation() {
        for severity in Severity::all() {
            assert!(severity.color().starts_with('#'));
            assert!(!severity.recommendation().is_empty());
        }
    }

    #[test]
    fn labels_match_form_values() {
        assert_eq!(LightCondition::DawnDusk.to_string(), "Dawn/Dusk");
        assert_eq!(JunctionControl::StopSign.as_ref(), "Stop Sign");
        assert_eq!(DriverAge::from_str("60+").unwrap(), DriverAge::Over60);
        assert_eq!(
            serde_json::to_string(&DriverAge::Under18).unwrap(),
            "\"<18\""
        );
        assert_eq!(
            serde_json::from_str::<LightCondition>("\"Dark-NotLighted\"").unwrap(),
            LightCondition::DarkNotLighted
        );
    }

    #[test]
    fn hotspot_options_are_subsets() {
        for weather in WeatherCondition::hotspot_options() {
            assert!(WeatherCondition::all().contains(weather));
        }
        for road in RoadType::hotspot_options() {
            assert!(RoadType::all().contains(road));
        }
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let mut record = AccidentRecord {
            id: 1,
            latitude: 51.5,
            longitude: -0.12,
            severity: Severity::Slight,
            date: Utc::now(),
            weather: "Clear".to_string(),
            road_type: "Local".to_string(),
        };
        assert!(record.has_valid_coordinates());
        record.latitude = f64::NAN;
        assert!(!record.has_valid_coordinates());
    }
}
