//! Truck state and per-leg transitions for the spray fleet
//!
//! Standalone implementation that doesn't depend on any rendering layer.
//! The fleet pool decides *which* transition a truck takes each tick; the
//! truck itself only knows how to apply it.

use log::debug;

use super::types::{
    GeoPoint, TruckId, TruckStatus, OUTBOUND_HOLD_THRESHOLD, OUTBOUND_START_STEP, OUTBOUND_STEP,
    PROGRESS_MAX, RETURN_STEP,
};
use super::zone::ZoneSnapshot;

/// A water-spray truck
#[derive(Debug, Clone, PartialEq)]
pub struct SimTruck {
    pub id: TruckId,
    pub status: TruckStatus,
    /// Zone being serviced, or just vacated while returning
    pub zone: Option<String>,
    /// Completion of the current leg, 0..=100
    pub progress: u8,
    pub position: GeoPoint,
    /// Where the current leg is heading
    pub target: Option<GeoPoint>,
}

impl SimTruck {
    /// Create an idle truck parked at the depot
    pub fn new(id: TruckId, depot: GeoPoint) -> Self {
        Self {
            id,
            status: TruckStatus::Idle,
            zone: None,
            progress: 0,
            position: depot,
            target: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == TruckStatus::Idle
    }

    /// Start an outbound leg towards `zone`.
    ///
    /// Progress is carried over from whatever leg the truck was on. Past
    /// [`OUTBOUND_HOLD_THRESHOLD`] it is held as is, otherwise it moves by
    /// [`OUTBOUND_START_STEP`].
    pub fn begin_outbound(&mut self, zone: &ZoneSnapshot) {
        debug!(
            "Truck {} dispatched to {} (was {} at {}%)",
            self.id.0,
            zone.name,
            self.status.as_str(),
            self.progress
        );
        self.status = TruckStatus::Spray;
        self.zone = Some(zone.name.clone());
        self.target = Some(zone.position());
        if self.progress <= OUTBOUND_HOLD_THRESHOLD {
            self.progress = self
                .progress
                .saturating_add(OUTBOUND_START_STEP)
                .min(PROGRESS_MAX);
        }
    }

    /// Keep heading towards the current zone
    pub fn advance_outbound(&mut self) {
        self.progress = self.progress.saturating_add(OUTBOUND_STEP).min(PROGRESS_MAX);
    }

    /// Recall the truck to the depot with the whole distance still ahead
    pub fn begin_return(&mut self, depot: GeoPoint) {
        debug!(
            "Truck {} recalled from {}",
            self.id.0,
            self.zone.as_deref().unwrap_or("?")
        );
        self.status = TruckStatus::Return;
        self.progress = PROGRESS_MAX;
        self.target = Some(depot);
    }

    /// Move one step closer to the depot.
    ///
    /// Returns true when the truck arrived and is now idle.
    pub fn advance_return(&mut self, depot: GeoPoint) -> bool {
        self.progress = self.progress.saturating_sub(RETURN_STEP);
        if self.progress > 0 {
            return false;
        }

        debug!("Truck {} back at depot", self.id.0);
        self.status = TruckStatus::Idle;
        self.zone = None;
        self.target = None;
        self.position = depot;
        true
    }

    /// Fraction of the current leg completed
    pub fn leg_fraction(&self) -> f64 {
        f64::from(self.progress) / f64::from(PROGRESS_MAX)
    }
}
