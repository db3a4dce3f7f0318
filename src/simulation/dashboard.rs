//! Dashboard runtime that ties everything together
//!
//! Two periodic tasks share this state: a slow refresh that swaps in a new
//! zone snapshot, and a fast tick that moves the fleet and checks alerts.
//! Both take `&mut self` and run to completion, so they never interleave.

use log::{debug, info, warn};
use std::collections::VecDeque;

use super::alerts::{AlertEvent, AlertSeverity, Clock, SystemClock, TrafficAlertMonitor};
use super::fleet::{FleetConfig, FleetPool};
use super::impact::{estimate, impact_note, ImpactEstimate};
use super::presentation::{fleet_views, TruckView};
use super::types::TruckStatus;
use super::zone::{DashboardSnapshot, ZoneSnapshot};

/// Number of entries the alert feed keeps
pub const ALERT_FEED_CAPACITY: usize = 12;

/// Tag of an alert feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedTag {
    Alert(AlertSeverity),
    Info,
    Warn,
}

impl FeedTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedTag::Alert(severity) => severity.as_str(),
            FeedTag::Info => "info",
            FeedTag::Warn => "warn",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub tag: FeedTag,
    pub message: String,
    pub at: u64,
}

/// Most recent alerts, newest first
#[derive(Debug, Clone)]
pub struct AlertFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::with_capacity(ALERT_FEED_CAPACITY)
    }
}

impl AlertFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, tag: FeedTag, message: impl Into<String>, at: u64) {
        self.entries.push_front(FeedEntry {
            tag,
            message: message.into(),
            at,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Output of one fleet tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub trucks: Vec<TruckView>,
    pub alerts: Vec<AlertEvent>,
}

/// The dashboard's simulation state
pub struct Dashboard<C: Clock = SystemClock> {
    pub fleet: FleetPool,
    pub alerts: TrafficAlertMonitor,
    pub feed: AlertFeed,
    snapshot: Option<DashboardSnapshot>,
    selected_zone: Option<String>,
    truck_count: usize,
    clock: C,
    /// Fleet ticks run against a snapshot
    pub ticks: u64,
    /// Snapshots received
    pub refreshes: u64,
    last_refresh_ms: Option<u64>,
}

impl Default for Dashboard<SystemClock> {
    fn default() -> Self {
        Self::new(FleetConfig::default())
    }
}

impl Dashboard<SystemClock> {
    pub fn new(config: FleetConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Dashboard<C> {
    pub fn with_clock(config: FleetConfig, clock: C) -> Self {
        let truck_count = config.fleet_size;
        Self {
            fleet: FleetPool::new(config),
            alerts: TrafficAlertMonitor::new(),
            feed: AlertFeed::default(),
            snapshot: None,
            selected_zone: None,
            truck_count,
            clock,
            ticks: 0,
            refreshes: 0,
            last_refresh_ms: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Limit how many trucks may be dispatched
    pub fn set_truck_count(&mut self, truck_count: usize) {
        self.truck_count = truck_count;
    }

    pub fn truck_count(&self) -> usize {
        self.truck_count
    }

    /// Milliseconds since the current snapshot arrived
    pub fn snapshot_age_ms(&self) -> Option<u64> {
        self.last_refresh_ms
            .map(|at| self.clock.now_ms().saturating_sub(at))
    }

    /// Replace the zone snapshot with a freshly received one
    pub fn refresh(&mut self, snapshot: DashboardSnapshot) {
        let now = self.clock.now_ms();
        info!(
            "Snapshot received: {} zones, {} requesting trucks",
            snapshot.zones.len(),
            snapshot.zones.iter().filter(|z| z.truck).count()
        );
        if self.snapshot.is_some() {
            self.feed.push(FeedTag::Info, "🔄 Data auto-refreshed", now);
        }
        self.snapshot = Some(snapshot);
        self.last_refresh_ms = Some(now);
        self.refreshes += 1;
    }

    /// Record a failed refresh. The previous snapshot stays in use.
    pub fn refresh_failed(&mut self, error: &anyhow::Error) {
        warn!("Snapshot refresh failed: {:#}", error);
        let now = self.clock.now_ms();
        self.feed
            .push(FeedTag::Warn, format!("⚠ Backend unreachable: {}", error), now);
    }

    /// Run one fleet tick and the traffic alert check.
    ///
    /// Does nothing until the first snapshot has arrived.
    pub fn tick(&mut self) -> TickReport {
        let Some(snapshot) = &self.snapshot else {
            debug!("Tick skipped: no snapshot yet");
            return TickReport::default();
        };

        let now = self.clock.now_ms();
        self.fleet.step(&snapshot.zones, self.truck_count);
        let alerts = self.alerts.check(&snapshot.zones, now);
        for alert in &alerts {
            self.feed
                .push(FeedTag::Alert(alert.severity), alert.message.clone(), now);
        }
        self.ticks += 1;

        TickReport {
            trucks: fleet_views(&self.fleet),
            alerts,
        }
    }

    /// Focus a zone for the impact panel, or `None` to follow the worst zone
    pub fn select_zone(&mut self, zone: Option<String>) {
        self.selected_zone = zone;
    }

    /// The selected zone if it is still present, otherwise the highest-AQI zone
    pub fn focused_zone(&self) -> Option<&ZoneSnapshot> {
        let zones = &self.snapshot.as_ref()?.zones;
        self.selected_zone
            .as_deref()
            .and_then(|name| zones.iter().find(|z| z.name == name))
            .or_else(|| {
                zones
                    .iter()
                    .reduce(|worst, z| if worst.aqi > z.aqi { worst } else { z })
            })
    }

    pub fn focused_impact(&self) -> Option<ImpactEstimate> {
        self.focused_zone().and_then(estimate)
    }

    /// Status of the truck serving `zone_name`, for the zone list badge
    pub fn zone_truck_status(&self, zone_name: &str) -> Option<TruckStatus> {
        self.fleet.truck_for_zone(zone_name).map(|t| t.status)
    }

    /// Drop derived display state. Trucks are left exactly where they are.
    pub fn reset_presentation(&mut self) {
        self.feed.clear();
        self.selected_zone = None;
    }

    /// Print a summary of the dashboard state
    pub fn print_summary(&self) {
        let counts = self.fleet.counts();
        println!("=== Spray Fleet Summary ===");
        println!(
            "Ticks: {}, Refreshes: {}, Time: {:.1}s",
            self.ticks,
            self.refreshes,
            self.clock.now_ms() as f64 / 1000.0
        );
        println!(
            "Trucks: {} spraying, {} returning, {} idle",
            counts.spraying, counts.returning, counts.idle
        );

        println!("--- Fleet ---");
        for view in fleet_views(&self.fleet) {
            println!(
                "  {}: {:<9} {:>3}%  {:<12} ({:.4}, {:.4})",
                view.call_sign,
                view.caption,
                view.percent,
                view.label,
                view.position.lat,
                view.position.lng
            );
        }

        if let Some(snapshot) = &self.snapshot {
            let summary = &snapshot.summary;
            println!("--- City ---");
            println!(
                "  Avg AQI: {:.0}, Trucks deployed: {}/{}, Combustion skipped: {}",
                summary.avg_aqi,
                summary.trucks_deployed,
                self.fleet.len(),
                summary.combustion_skipped
            );
            println!(
                "  Water saved: {:.1} kL, Cost saved: ₹{:.0}, People covered: {}",
                summary.water_saved_l / 1000.0,
                summary.cost_saved_inr,
                summary.people_covered
            );
        }

        if let Some(zone) = self.focused_zone() {
            println!("--- Focus: {} ---", zone.name);
            println!(
                "  Action: {}",
                zone.final_action.as_str().replace('_', " ").to_uppercase()
            );
            match estimate(zone) {
                Some(impact) => println!(
                    "  AQI {:.0} → {:.0} (−{:.0}, {}%)",
                    impact.before, impact.after, impact.drop, impact.pct
                ),
                None => println!("  AQI {:.0}, no spray", zone.aqi),
            }
            println!("  {}", impact_note(zone));
        }

        if !self.feed.is_empty() {
            println!("--- Alerts ---");
            for entry in self.feed.entries() {
                println!("  [{}] {}", entry.tag.as_str(), entry.message);
            }
        }
    }
}
