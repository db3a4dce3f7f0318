//! Renderable view of the fleet
//!
//! Everything here is derived from truck state alone; nothing is cached
//! between calls.

use super::fleet::FleetPool;
use super::truck::SimTruck;
use super::types::{GeoPoint, TruckId, TruckStatus, PROGRESS_MAX};

/// Color category of a truck, one per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    Active,
    Returning,
    Muted,
}

impl StatusColor {
    pub fn from_status(status: TruckStatus) -> Self {
        match status {
            TruckStatus::Spray => StatusColor::Active,
            TruckStatus::Return => StatusColor::Returning,
            TruckStatus::Idle => StatusColor::Muted,
        }
    }

    /// CSS color used by the dashboard
    pub fn css(&self) -> &'static str {
        match self {
            StatusColor::Active => "#00ffb3",
            StatusColor::Returning => "#ffd84d",
            StatusColor::Muted => "rgba(200,232,255,0.2)",
        }
    }
}

/// One truck, ready for a map marker or a fleet list row
#[derive(Debug, Clone, PartialEq)]
pub struct TruckView {
    pub id: TruckId,
    pub call_sign: String,
    pub position: GeoPoint,
    pub color: StatusColor,
    pub label: String,
    pub percent: u8,
    pub caption: &'static str,
    pub tooltip: String,
}

impl TruckView {
    pub fn from_truck(truck: &SimTruck) -> Self {
        let call_sign = call_sign(truck.id);
        let tooltip = match truck.status {
            TruckStatus::Spray => format!(
                "{} SPRAYING → {}",
                call_sign,
                truck.zone.as_deref().unwrap_or("…")
            ),
            TruckStatus::Return => format!("{} RETURNING to depot", call_sign),
            TruckStatus::Idle => format!("{} IDLE at depot", call_sign),
        };

        Self {
            id: truck.id,
            call_sign,
            position: truck.position,
            color: StatusColor::from_status(truck.status),
            label: label(truck),
            percent: completion_percent(truck),
            caption: caption(truck.status),
            tooltip,
        }
    }
}

/// Views for the whole fleet, in truck order
pub fn fleet_views(fleet: &FleetPool) -> Vec<TruckView> {
    fleet.trucks().iter().map(TruckView::from_truck).collect()
}

/// Municipal call sign shown next to each truck
pub fn call_sign(id: TruckId) -> String {
    format!("MCD-0{}", id.0)
}

/// Short destination label: first word of the zone, or the depot
pub fn label(truck: &SimTruck) -> String {
    match truck.status {
        TruckStatus::Spray => truck
            .zone
            .as_deref()
            .and_then(|z| z.split(' ').next())
            .filter(|word| !word.is_empty())
            .unwrap_or("…")
            .to_string(),
        TruckStatus::Return => "← Depot".to_string(),
        TruckStatus::Idle => "Depot".to_string(),
    }
}

/// How much of the trip is done, as shown on the progress bar
pub fn completion_percent(truck: &SimTruck) -> u8 {
    match truck.status {
        TruckStatus::Spray => truck.progress,
        TruckStatus::Return => PROGRESS_MAX - truck.progress.min(PROGRESS_MAX),
        TruckStatus::Idle => 0,
    }
}

pub fn caption(status: TruckStatus) -> &'static str {
    match status {
        TruckStatus::Spray => "SPRAYING",
        TruckStatus::Return => "RETURNING",
        TruckStatus::Idle => "IDLE",
    }
}
