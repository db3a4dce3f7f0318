//! Snapshot sources for the headless runner
//!
//! The real dashboard receives its snapshots from a decision backend. The
//! runner can either replay saved backend documents or generate synthetic
//! ones from a seeded RNG.

use anyhow::{bail, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::types::{GeoPoint, FLEET_SIZE};
use super::zone::{
    load_snapshot, DashboardSnapshot, FinalAction, PollutionType, SnapshotSummary, SprinklerState,
    Traffic, Weather, ZoneSnapshot,
};

/// Anything that can hand the dashboard a new snapshot
pub trait SnapshotSource {
    fn next_snapshot(&mut self) -> Result<DashboardSnapshot>;
}

/// Replays snapshot files in order, starting over after the last one
#[derive(Debug, Clone)]
pub struct FileFeed {
    paths: Vec<PathBuf>,
    next: usize,
}

impl FileFeed {
    pub fn new(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            bail!("FileFeed needs at least one snapshot file");
        }
        Ok(Self { paths, next: 0 })
    }
}

impl SnapshotSource for FileFeed {
    fn next_snapshot(&mut self) -> Result<DashboardSnapshot> {
        let path = &self.paths[self.next];
        self.next = (self.next + 1) % self.paths.len();
        debug!("Loading snapshot from {}", path.display());
        load_snapshot(path)
    }
}

/// AQI above which a dust zone gets sprayed
pub const SPRAY_THRESHOLD_AQI: f64 = 180.0;
/// AQI above which the spray runs at high intensity
pub const SPRAY_HIGH_AQI: f64 = 250.0;
/// Wind speed at or above which spraying is pointless (m/s)
pub const MAX_SPRAY_WIND: f64 = 8.0;
/// Water a zone would get under a uniform schedule (L)
pub const UNIFORM_WATER_PER_ZONE: f64 = 2000.0;
pub const SPRAY_HIGH_WATER: f64 = 1800.0;
pub const SPRAY_LOW_WATER: f64 = 900.0;
/// Cost of one litre of tanker water (INR)
pub const WATER_COST_PER_L: f64 = 8.0;

/// A fixed monitoring zone of the demo city
#[derive(Debug, Clone)]
struct DemoZone {
    name: &'static str,
    position: GeoPoint,
    population: u64,
    base_aqi: f64,
}

/// Delhi monitoring stations
fn demo_zones() -> Vec<DemoZone> {
    let zone = |name, lat, lng, population, base_aqi| DemoZone {
        name,
        position: GeoPoint::new(lat, lng),
        population,
        base_aqi,
    };
    vec![
        zone("Anand Vihar", 28.6469, 77.3162, 120_000, 320.0),
        zone("ITO", 28.6271, 77.2402, 80_000, 260.0),
        zone("Rohini", 28.7495, 77.0935, 175_000, 230.0),
        zone("Punjabi Bagh", 28.6742, 77.1311, 110_000, 240.0),
        zone("Okhla", 28.5375, 77.2741, 140_000, 210.0),
        zone("Connaught Place", 28.6315, 77.2167, 85_000, 170.0),
        zone("Dwarka", 28.5921, 77.0460, 200_000, 190.0),
        zone("Shahdara", 28.6738, 77.2898, 130_000, 280.0),
        zone("RK Puram", 28.5686, 77.1741, 95_000, 160.0),
        zone("Narela", 28.8530, 77.0933, 65_000, 250.0),
    ]
}

/// Synthetic snapshot generator with a simple dispatch rule set
pub struct DemoFeed {
    zones: Vec<DemoZone>,
    manual_overrides: BTreeSet<String>,
    max_trucks: usize,
    rng: Option<StdRng>,
}

impl Default for DemoFeed {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DemoFeed {
    /// Create a feed; a seed makes the generated telemetry reproducible
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            zones: demo_zones(),
            manual_overrides: BTreeSet::new(),
            max_trucks: FLEET_SIZE,
            rng: seed.map(StdRng::seed_from_u64),
        }
    }

    pub fn with_max_trucks(mut self, max_trucks: usize) -> Self {
        self.max_trucks = max_trucks;
        self
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.zones.iter().map(|z| z.name)
    }

    /// Flip the manual sprinkler override for a zone.
    ///
    /// Returns the new state, or `None` for an unknown zone.
    pub fn toggle_sprinkler(&mut self, zone_name: &str) -> Option<bool> {
        if !self.zones.iter().any(|z| z.name == zone_name) {
            return None;
        }
        let active = if self.manual_overrides.remove(zone_name) {
            false
        } else {
            self.manual_overrides.insert(zone_name.to_string());
            true
        };
        info!(
            "{} sprinkler for {}",
            if active { "Activated" } else { "Deactivated" },
            zone_name
        );
        Some(active)
    }

    pub fn is_overridden(&self, zone_name: &str) -> bool {
        self.manual_overrides.contains(zone_name)
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f64>) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn sample_zone(&mut self, zone: &DemoZone) -> ZoneSnapshot {
        let aqi = (zone.base_aqi + self.random_range(-40.0..40.0)).max(0.0).round();
        let pm25 = (aqi * self.random_range(0.45..0.65) * 10.0).round() / 10.0;
        let pm_ratio = (self.random_range(1.1..2.8) * 100.0).round() / 100.0;
        let pm10 = (pm25 * pm_ratio * 10.0).round() / 10.0;
        let pollution_type = if pm_ratio >= 2.0 {
            PollutionType::Dust
        } else if pm_ratio < 1.4 {
            PollutionType::Combustion
        } else {
            PollutionType::Mixed
        };

        let wind_speed = (self.random_range(0.5..12.0) * 10.0).round() / 10.0;
        let temp = (self.random_range(18.0..35.0) * 10.0).round() / 10.0;
        let congestion = (self.random_range(0.1..0.85) * 1000.0).round() / 1000.0;
        let traffic_level = if congestion < 0.3 {
            0
        } else if congestion < 0.65 {
            1
        } else {
            2
        };
        let current_speed = (self.random_range(15.0..55.0) * 10.0).round() / 10.0;

        let mut snapshot = ZoneSnapshot::new(zone.name, zone.position, aqi);
        snapshot.pm25 = pm25;
        snapshot.pm10 = pm10;
        snapshot.pm_ratio = pm_ratio;
        snapshot.pollution_type = pollution_type;
        snapshot.confidence = (self.random_range(0.6..0.95) * 100.0).round() / 100.0;
        snapshot.weather = Some(Weather {
            wind_speed: Some(wind_speed),
            temp: Some(temp),
        });
        snapshot.traffic = Some(Traffic {
            traffic_level: Some(traffic_level),
            congestion_index: Some(congestion),
            current_speed: Some(current_speed),
        });
        snapshot
    }
}

impl SnapshotSource for DemoFeed {
    fn next_snapshot(&mut self) -> Result<DashboardSnapshot> {
        let catalog = self.zones.clone();
        let mut samples: Vec<(&DemoZone, ZoneSnapshot)> = catalog
            .iter()
            .map(|zone| (zone, self.sample_zone(zone)))
            .collect();
        // Highest AQI claims trucks first
        samples.sort_by(|a, b| b.1.aqi.total_cmp(&a.1.aqi));

        let mut summary = SnapshotSummary::default();
        let mut sprinklers = BTreeMap::new();
        let mut water_used = 0.0;
        let mut total_aqi = 0.0;

        for (zone, snapshot) in samples.iter_mut() {
            let manual = self.manual_overrides.contains(zone.name);
            let wind = snapshot.wind_speed();
            let mut water = 0.0;

            if manual {
                snapshot.final_action = FinalAction::SprayHigh;
                snapshot.reason = "Manual override active — sprinkler forced ON".to_string();
                water = SPRAY_HIGH_WATER;
            } else if snapshot.pollution_type == PollutionType::Combustion {
                summary.combustion_skipped += 1;
                snapshot.reason = format!(
                    "Combustion source detected (PM ratio {}) — water spray ineffective on vehicular/fire emissions",
                    snapshot.pm_ratio
                );
            } else if snapshot.aqi > SPRAY_THRESHOLD_AQI && wind < MAX_SPRAY_WIND {
                if snapshot.aqi > SPRAY_HIGH_AQI {
                    snapshot.final_action = FinalAction::SprayHigh;
                    snapshot.reason = format!(
                        "Hazardous dust AQI {} with low wind ({} m/s) — high-intensity spray",
                        snapshot.aqi, wind
                    );
                    water = SPRAY_HIGH_WATER;
                } else {
                    snapshot.final_action = FinalAction::SprayLow;
                    snapshot.reason =
                        format!("Elevated dust AQI {} — low-intensity preventive spray", snapshot.aqi);
                    water = SPRAY_LOW_WATER;
                }
            } else if wind >= MAX_SPRAY_WIND {
                snapshot.reason =
                    format!("Wind speed {} m/s too high — spray would disperse ineffectively", wind);
            } else {
                snapshot.reason = format!(
                    "AQI {} below threshold {} — no action required",
                    snapshot.aqi, SPRAY_THRESHOLD_AQI
                );
            }

            if snapshot.final_action != FinalAction::NoSpray {
                if (summary.trucks_deployed as usize) < self.max_trucks {
                    snapshot.truck = true;
                    summary.trucks_deployed += 1;
                }
                summary.people_covered += zone.population;
            }

            water_used += water;
            total_aqi += snapshot.aqi;
            sprinklers.insert(
                zone.name.to_string(),
                SprinklerState {
                    active: snapshot.final_action != FinalAction::NoSpray,
                },
            );
        }

        let zone_count = catalog.len() as f64;
        summary.avg_aqi = (total_aqi / zone_count * 10.0).round() / 10.0;
        summary.water_saved_l = (zone_count * UNIFORM_WATER_PER_ZONE - water_used).max(0.0);
        summary.cost_saved_inr = (summary.water_saved_l * WATER_COST_PER_L).floor();
        summary.total_zones = Some(catalog.len() as u32);

        // Back to station order for display
        let mut zones: Vec<ZoneSnapshot> = Vec::with_capacity(catalog.len());
        for zone in &catalog {
            if let Some((_, snapshot)) = samples.iter().find(|(z, _)| z.name == zone.name) {
                zones.push(snapshot.clone());
            }
        }

        Ok(DashboardSnapshot {
            timestamp: None,
            zones,
            sprinklers,
            summary,
        })
    }
}
