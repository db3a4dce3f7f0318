//! Core types for the spray fleet simulation
//!
//! These are standalone types that don't depend on any rendering layer.

use serde::{Deserialize, Serialize};

/// Linear interpolation between two scalars.
///
/// No bounds checking is done on `t`; callers pass `t` in `[0, 1]` to stay
/// between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A unique identifier for a truck in the fleet (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TruckId(pub u32);

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lerp(&self, other: &GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: lerp(self.lat, other.lat, t),
            lng: lerp(self.lng, other.lng, t),
        }
    }

    /// Shift this point by a fixed number of degrees on each axis
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }
}

/// Status of a truck in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruckStatus {
    /// Parked at the depot
    Idle,
    /// Outbound to, or spraying at, a zone
    Spray,
    /// Heading back to the depot
    Return,
}

impl TruckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruckStatus::Idle => "idle",
            TruckStatus::Spray => "spray",
            TruckStatus::Return => "return",
        }
    }
}

/// Municipal water depot all trucks start from and return to
pub const DEPOT: GeoPoint = GeoPoint::new(28.6139, 77.209);

/// Number of trucks in the fleet
pub const FLEET_SIZE: usize = 5;

/// Progress gained on the first tick of a new outbound leg
pub const OUTBOUND_START_STEP: u8 = 15;

/// Above this progress a reassigned truck keeps its progress
pub const OUTBOUND_HOLD_THRESHOLD: u8 = 80;

/// Progress gained per tick while heading to the same zone
pub const OUTBOUND_STEP: u8 = 8;

/// Progress lost per tick on the return leg
pub const RETURN_STEP: u8 = 10;

/// Maximum progress value of a leg
pub const PROGRESS_MAX: u8 = 100;

/// Per-index latitude offset for idle trucks parked at the depot
pub const IDLE_OFFSET_LAT: f64 = 0.003;

/// Per-index longitude offset for idle trucks parked at the depot
pub const IDLE_OFFSET_LNG: f64 = 0.002;
