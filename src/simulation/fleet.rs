//! Fleet dispatch and motion
//!
//! This module owns the truck pool and runs one assignment + transition step
//! per tick. Assignment is by rank: the truck at index `i` always serves the
//! `i`-th highest-AQI zone that requests a truck. There is no memory of which
//! truck belongs to which zone beyond that position, so a zone that drops out
//! of the ranking loses its truck on the next tick, even mid-spray.

use log::{debug, warn};
use ordered_float::OrderedFloat;

use super::truck::SimTruck;
use super::types::{
    GeoPoint, TruckId, TruckStatus, DEPOT, FLEET_SIZE, IDLE_OFFSET_LAT, IDLE_OFFSET_LNG,
};
use super::zone::ZoneSnapshot;

/// Static fleet parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FleetConfig {
    pub depot: GeoPoint,
    pub fleet_size: usize,
    /// Per-index offset (lat, lng) used to spread idle trucks around the depot
    pub idle_offset: (f64, f64),
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            depot: DEPOT,
            fleet_size: FLEET_SIZE,
            idle_offset: (IDLE_OFFSET_LAT, IDLE_OFFSET_LNG),
        }
    }
}

impl FleetConfig {
    /// Parking spot of an idle truck
    pub fn idle_position(&self, index: usize) -> GeoPoint {
        let i = index as f64;
        self.depot.offset(i * self.idle_offset.0, i * self.idle_offset.1)
    }
}

/// Per-status head count of the fleet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetCounts {
    pub spraying: usize,
    pub returning: usize,
    pub idle: usize,
}

/// What a truck was told to do on a given tick
#[derive(Debug, Clone, Copy)]
enum Assignment<'a> {
    Zone(&'a ZoneSnapshot),
    Unneeded,
}

/// Zones requesting a truck, highest AQI first.
///
/// The sort is stable, so zones with equal AQI keep their snapshot order.
pub fn deployed_zones(zones: &[ZoneSnapshot]) -> Vec<&ZoneSnapshot> {
    let mut deployed: Vec<&ZoneSnapshot> = zones.iter().filter(|z| z.truck).collect();
    deployed.sort_by_key(|z| std::cmp::Reverse(OrderedFloat(z.aqi)));
    deployed
}

/// The truck pool. Created once, mutated in place every tick.
#[derive(Debug, Clone)]
pub struct FleetPool {
    config: FleetConfig,
    trucks: Vec<SimTruck>,
}

impl Default for FleetPool {
    fn default() -> Self {
        Self::new(FleetConfig::default())
    }
}

impl FleetPool {
    /// Create a pool of idle trucks at the depot, numbered from 1
    pub fn new(config: FleetConfig) -> Self {
        let trucks = (0..config.fleet_size)
            .map(|i| SimTruck::new(TruckId(i as u32 + 1), config.depot))
            .collect();
        Self { config, trucks }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn trucks(&self) -> &[SimTruck] {
        &self.trucks
    }

    pub fn truck(&self, id: TruckId) -> Option<&SimTruck> {
        self.trucks.iter().find(|t| t.id == id)
    }

    /// The truck currently associated with `zone_name`, if any
    pub fn truck_for_zone(&self, zone_name: &str) -> Option<&SimTruck> {
        self.trucks.iter().find(|t| t.zone.as_deref() == Some(zone_name))
    }

    pub fn len(&self) -> usize {
        self.trucks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trucks.is_empty()
    }

    pub fn counts(&self) -> FleetCounts {
        let mut counts = FleetCounts::default();
        for truck in &self.trucks {
            match truck.status {
                TruckStatus::Spray => counts.spraying += 1,
                TruckStatus::Return => counts.returning += 1,
                TruckStatus::Idle => counts.idle += 1,
            }
        }
        counts
    }

    /// Run one dispatch step against the latest zone snapshot.
    ///
    /// Only the first `truck_count` trucks may be assigned; the rest are
    /// treated as not needed and wind down towards idle.
    pub fn step(&mut self, zones: &[ZoneSnapshot], truck_count: usize) {
        let deployed = deployed_zones(zones);
        let usable = truck_count.min(self.trucks.len());
        if truck_count > self.trucks.len() {
            warn!(
                "Requested {} trucks but the fleet only has {}",
                truck_count,
                self.trucks.len()
            );
        }
        debug!(
            "Fleet step: {} deployed zones, {} usable trucks",
            deployed.len(),
            usable
        );

        let depot = self.config.depot;
        for index in 0..self.trucks.len() {
            let assignment = match deployed.get(index) {
                Some(&zone) if index < usable => Assignment::Zone(zone),
                _ => Assignment::Unneeded,
            };
            let idle_spot = self.config.idle_position(index);
            let truck = &mut self.trucks[index];
            let was_idle = truck.is_idle();

            match assignment {
                Assignment::Zone(zone) => {
                    let other_zone = truck.zone.as_deref().is_some_and(|z| z != zone.name);
                    if was_idle || other_zone {
                        truck.begin_outbound(zone);
                    } else if truck.status == TruckStatus::Spray {
                        truck.advance_outbound();
                    }
                    // A truck returning from this very zone holds its place.
                }
                Assignment::Unneeded => match truck.status {
                    TruckStatus::Spray => truck.begin_return(depot),
                    TruckStatus::Return => {
                        truck.advance_return(depot);
                    }
                    TruckStatus::Idle => {}
                },
            }

            update_position(truck, zones, depot, idle_spot, was_idle);
        }
    }
}

/// Place a truck along its current leg once its status is settled
fn update_position(
    truck: &mut SimTruck,
    zones: &[ZoneSnapshot],
    depot: GeoPoint,
    idle_spot: GeoPoint,
    was_idle: bool,
) {
    let t = truck.leg_fraction();
    match truck.status {
        TruckStatus::Spray => {
            if let Some(target) = truck.target {
                truck.position = depot.lerp(&target, t);
            }
        }
        TruckStatus::Return => {
            let origin = truck
                .zone
                .as_deref()
                .and_then(|name| zones.iter().find(|z| z.name == name));
            // Zone gone from the snapshot: keep the last known position
            if let Some(zone) = origin {
                truck.position = zone.position().lerp(&depot, 1.0 - t);
            }
        }
        TruckStatus::Idle => {
            // Trucks arriving this tick stay snapped to the depot
            if was_idle {
                truck.position = idle_spot;
            }
        }
    }
}
