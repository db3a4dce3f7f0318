//! Zone snapshots received from the external data collaborator
//!
//! A snapshot is replaced wholesale on every refresh. Nothing in the
//! simulation mutates it; the fleet, the impact estimator and the alert
//! monitor only read from it.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::types::GeoPoint;

/// Wind speed assumed when a zone carries no weather reading (m/s)
///
/// Only a missing reading takes this value. A reported `0.0` is kept as calm
/// air, so it earns no wind bonus in the impact estimate.
pub const DEFAULT_WIND_SPEED: f64 = 3.0;

/// Deserialize a telemetry field, taking the default for null or mistyped values
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Dominant pollution source classified for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutionType {
    Dust,
    Combustion,
    #[default]
    #[serde(other)]
    Mixed,
}

/// Action chosen for a zone by the decision backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalAction {
    SprayLow,
    SprayHigh,
    #[default]
    #[serde(other)]
    NoSpray,
}

impl FinalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalAction::NoSpray => "no_spray",
            FinalAction::SprayLow => "spray_low",
            FinalAction::SprayHigh => "spray_high",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(default, deserialize_with = "lenient")]
    pub traffic_level: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub congestion_index: Option<f64>,
    /// Current road speed in km/h
    #[serde(default, deserialize_with = "lenient")]
    pub current_speed: Option<f64>,
}

/// One zone of the dashboard snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub aqi: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub pollution_type: PollutionType,
    #[serde(default, deserialize_with = "lenient")]
    pub pm25: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub pm10: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub pm_ratio: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub final_action: FinalAction,
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub reason: String,
    /// Whether this zone currently requests a truck
    #[serde(default, deserialize_with = "lenient")]
    pub truck: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Weather>,
    #[serde(default, deserialize_with = "lenient")]
    pub traffic: Option<Traffic>,
}

impl ZoneSnapshot {
    /// Create a zone with no telemetry beyond its location and AQI
    pub fn new(name: impl Into<String>, position: GeoPoint, aqi: f64) -> Self {
        Self {
            name: name.into(),
            lat: position.lat,
            lng: position.lng,
            aqi,
            pollution_type: PollutionType::Mixed,
            pm25: 0.0,
            pm10: 0.0,
            pm_ratio: 0.0,
            final_action: FinalAction::NoSpray,
            confidence: 0.0,
            reason: String::new(),
            truck: false,
            weather: None,
            traffic: None,
        }
    }

    pub fn with_truck(mut self, truck: bool) -> Self {
        self.truck = truck;
        self
    }

    pub fn with_action(mut self, action: FinalAction) -> Self {
        self.final_action = action;
        self
    }

    pub fn with_pollution_type(mut self, pollution_type: PollutionType) -> Self {
        self.pollution_type = pollution_type;
        self
    }

    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.weather.get_or_insert_with(Weather::default).wind_speed = Some(wind_speed);
        self
    }

    pub fn with_traffic(mut self, traffic_level: u32, congestion_index: f64) -> Self {
        let traffic = self.traffic.get_or_insert_with(Traffic::default);
        traffic.traffic_level = Some(traffic_level);
        traffic.congestion_index = Some(congestion_index);
        self
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Wind speed in m/s, falling back to [`DEFAULT_WIND_SPEED`]
    pub fn wind_speed(&self) -> f64 {
        self.weather
            .as_ref()
            .and_then(|w| w.wind_speed)
            .unwrap_or(DEFAULT_WIND_SPEED)
    }

    /// Traffic level, lowest (0) when unknown
    pub fn traffic_level(&self) -> u32 {
        self.traffic
            .as_ref()
            .and_then(|t| t.traffic_level)
            .unwrap_or(0)
    }

    pub fn congestion_index(&self) -> f64 {
        self.traffic
            .as_ref()
            .and_then(|t| t.congestion_index)
            .unwrap_or(0.0)
    }

    pub fn current_speed(&self) -> Option<f64> {
        self.traffic.as_ref().and_then(|t| t.current_speed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprinklerState {
    #[serde(default)]
    pub active: bool,
}

/// City-wide aggregate reported alongside the zones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSummary {
    #[serde(rename = "water_saved_L")]
    pub water_saved_l: f64,
    pub people_covered: u64,
    #[serde(rename = "cost_saved_INR")]
    pub cost_saved_inr: f64,
    pub avg_aqi: f64,
    pub trucks_deployed: u32,
    pub combustion_skipped: u32,
    pub total_zones: Option<u32>,
}

/// A full dashboard document as produced on each refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub zones: Vec<ZoneSnapshot>,
    #[serde(default)]
    pub sprinklers: BTreeMap<String, SprinklerState>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: SnapshotSummary,
}

impl DashboardSnapshot {
    pub fn from_zones(zones: Vec<ZoneSnapshot>) -> Self {
        Self {
            zones,
            ..Default::default()
        }
    }

    /// Parse a dashboard document in the backend's JSON format
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse dashboard snapshot")
    }

    pub fn zone(&self, name: &str) -> Option<&ZoneSnapshot> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn sprinkler_active(&self, name: &str) -> bool {
        self.sprinklers.get(name).is_some_and(|s| s.active)
    }
}

/// Load a dashboard snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<DashboardSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    DashboardSnapshot::from_json(&json)
        .with_context(|| format!("Invalid snapshot in {}", path.display()))
}
