//! Standalone spray fleet simulation module
//!
//! This module contains the fleet dispatch state machine, the impact model
//! and the alert cooldown logic. None of it depends on a rendering layer, so
//! it can be driven from the console or from tests.

mod alerts;
mod dashboard;
mod feed;
mod fleet;
mod impact;
mod presentation;
mod truck;
mod types;
mod zone;

pub use alerts::{
    is_benefit, is_congested, AlertEvent, AlertKind, AlertSeverity, Clock, CooldownGate,
    ManualClock, SystemClock, TrafficAlertMonitor, BENEFIT_AQI_THRESHOLD,
    BENEFIT_IMPROVEMENT_FACTOR, BENEFIT_WINDOW_MS, CONGESTION_INDEX_THRESHOLD,
    CONGESTION_TRAFFIC_LEVEL, CONGESTION_WINDOW_MS,
};
pub use dashboard::{AlertFeed, Dashboard, FeedEntry, FeedTag, TickReport, ALERT_FEED_CAPACITY};
pub use feed::{DemoFeed, FileFeed, SnapshotSource};
pub use fleet::{deployed_zones, FleetConfig, FleetCounts, FleetPool};
pub use impact::{
    estimate, impact_note, reduction, ImpactEstimate, DUST_BONUS, MAX_REDUCTION, MAX_WIND_BONUS,
    SPRAY_HIGH_REDUCTION, SPRAY_LOW_REDUCTION,
};
pub use presentation::{
    call_sign, caption, completion_percent, fleet_views, label, StatusColor, TruckView,
};
pub use truck::SimTruck;
pub use types::{
    lerp, GeoPoint, TruckId, TruckStatus, DEPOT, FLEET_SIZE, IDLE_OFFSET_LAT, IDLE_OFFSET_LNG,
    OUTBOUND_HOLD_THRESHOLD, OUTBOUND_START_STEP, OUTBOUND_STEP, PROGRESS_MAX, RETURN_STEP,
};
pub use zone::{
    load_snapshot, DashboardSnapshot, FinalAction, PollutionType, SnapshotSummary,
    SprinklerState, Traffic, Weather, ZoneSnapshot, DEFAULT_WIND_SPEED,
};
