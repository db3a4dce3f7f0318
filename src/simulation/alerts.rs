//! Alert deduplication for the traffic alert surfaces
//!
//! Alerts are keyed by zone. Each key may fire at most once per cooldown
//! window; the window is measured on an injectable monotonic clock so runs
//! can be replayed deterministically.

use log::info;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use super::zone::ZoneSnapshot;

/// Cooldown for the heavy-traffic warning (2 minutes)
pub const CONGESTION_WINDOW_MS: u64 = 120_000;
/// Cooldown for the spray-benefit notification (3 minutes)
pub const BENEFIT_WINDOW_MS: u64 = 180_000;
/// Traffic level at or above which a spraying zone counts as congested
pub const CONGESTION_TRAFFIC_LEVEL: u32 = 2;
/// Congestion index above which a spraying zone counts as congested
pub const CONGESTION_INDEX_THRESHOLD: f64 = 0.65;
/// AQI above which spraying in traffic is worth announcing
pub const BENEFIT_AQI_THRESHOLD: f64 = 200.0;
/// Rough AQI improvement factor quoted in the benefit notification
pub const BENEFIT_IMPROVEMENT_FACTOR: f64 = 0.18;

const BENEFIT_KEY_SUFFIX: &str = "_benefit";

/// Source of monotonic time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock, counted from when it was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle while the
/// dashboard owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Per-key record of when each alert last fired
#[derive(Debug, Clone, Default)]
pub struct CooldownGate {
    last_fired: HashMap<String, u64>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` may fire at `now`. Records `now` for the key when it may.
    pub fn should_fire(&mut self, key: &str, now: u64, window_ms: u64) -> bool {
        let ready = match self.last_fired.get(key) {
            None => true,
            Some(&last) => now.saturating_sub(last) > window_ms,
        };
        if ready {
            self.last_fired.insert(key.to_string(), now);
        }
        ready
    }

    pub fn last_fired(&self, key: &str) -> Option<u64> {
        self.last_fired.get(key).copied()
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// A truck is spraying in heavy traffic
    Congestion,
    /// Spraying is knocking down traffic dust in a polluted zone
    Benefit,
}

/// Tag used by the alert list to style an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertSeverity {
    Traffic,
    Dust,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Traffic => "traffic",
            AlertSeverity::Dust => "dust",
        }
    }
}

/// An alert that made it through the cooldown gate
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub zone: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    /// Headline for the news ticker, when the alert has one
    pub headline: Option<String>,
    pub fired_at: u64,
}

pub fn is_congested(zone: &ZoneSnapshot) -> bool {
    zone.traffic_level() >= CONGESTION_TRAFFIC_LEVEL
        || zone.congestion_index() > CONGESTION_INDEX_THRESHOLD
}

pub fn is_benefit(zone: &ZoneSnapshot) -> bool {
    zone.traffic_level() >= 1 && zone.aqi > BENEFIT_AQI_THRESHOLD
}

/// Watches spraying zones for traffic conditions worth an alert
#[derive(Debug, Clone)]
pub struct TrafficAlertMonitor {
    gate: CooldownGate,
    pub enabled: bool,
}

impl Default for TrafficAlertMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficAlertMonitor {
    pub fn new() -> Self {
        Self {
            gate: CooldownGate::new(),
            enabled: true,
        }
    }

    pub fn gate(&self) -> &CooldownGate {
        &self.gate
    }

    /// Evaluate every zone with an active truck and return the alerts that fire
    pub fn check(&mut self, zones: &[ZoneSnapshot], now: u64) -> Vec<AlertEvent> {
        if !self.enabled {
            return Vec::new();
        }

        let mut events = Vec::new();
        for zone in zones.iter().filter(|z| z.truck) {
            if is_congested(zone)
                && self.gate.should_fire(&zone.name, now, CONGESTION_WINDOW_MS)
            {
                events.push(congestion_alert(zone, now));
            }

            let benefit_key = format!("{}{}", zone.name, BENEFIT_KEY_SUFFIX);
            if is_benefit(zone) && self.gate.should_fire(&benefit_key, now, BENEFIT_WINDOW_MS) {
                events.push(benefit_alert(zone, now));
            }
        }

        for event in &events {
            info!("[{}] {}", event.severity.as_str(), event.message);
        }
        events
    }
}

fn congestion_alert(zone: &ZoneSnapshot, now: u64) -> AlertEvent {
    let speed = zone
        .current_speed()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "—".to_string());
    let message = format!(
        "⚠ MCD truck spraying in HIGH TRAFFIC zone: {} — congestion {}%, speed {} km/h. Consider off-peak rescheduling.",
        zone.name,
        (zone.congestion_index() * 100.0).round(),
        speed
    );
    let headline = format!(
        "MCD water truck active in heavy traffic at {} — spray efficiency may be reduced, AQI still {}",
        zone.name,
        zone.aqi.round()
    );

    AlertEvent {
        zone: zone.name.clone(),
        kind: AlertKind::Congestion,
        severity: AlertSeverity::Traffic,
        message,
        headline: Some(headline),
        fired_at: now,
    }
}

fn benefit_alert(zone: &ZoneSnapshot, now: u64) -> AlertEvent {
    let message = format!(
        "✅ Spray truck in {} reducing dust stirred by traffic — AQI {}, est. {} point improvement",
        zone.name,
        zone.aqi.round(),
        (zone.aqi * BENEFIT_IMPROVEMENT_FACTOR).round()
    );

    AlertEvent {
        zone: zone.name.clone(),
        kind: AlertKind::Benefit,
        severity: AlertSeverity::Dust,
        message,
        headline: None,
        fired_at: now,
    }
}
