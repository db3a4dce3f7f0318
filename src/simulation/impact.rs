//! AQI impact model for spray actions
//!
//! A modeled prediction, not a measurement: stronger spray removes more,
//! mild wind helps disperse, and dust responds to water better than mixed
//! sources. Combustion sources are not helped by water at all.

use super::zone::{FinalAction, PollutionType, ZoneSnapshot};

/// Base reduction for a high-intensity spray
pub const SPRAY_HIGH_REDUCTION: f64 = 0.22;
/// Base reduction for a low-intensity spray
pub const SPRAY_LOW_REDUCTION: f64 = 0.12;
/// Cap on the wind contribution
pub const MAX_WIND_BONUS: f64 = 0.06;
/// Extra reduction when the zone is dust dominated
pub const DUST_BONUS: f64 = 0.05;
/// Cap on the total modeled reduction
pub const MAX_REDUCTION: f64 = 0.35;

/// Predicted effect of spraying a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEstimate {
    pub before: f64,
    pub after: f64,
    pub drop: f64,
    /// Reduction as a whole percentage
    pub pct: u32,
    action: FinalAction,
}

impl ImpactEstimate {
    /// Hours until the reduction is expected to show
    pub fn recovery_window(&self) -> &'static str {
        match self.action {
            FinalAction::SprayHigh => "3–4",
            _ => "4–6",
        }
    }
}

/// Fraction of AQI removed by spraying `zone`, or `None` if spraying is pointless
pub fn reduction(zone: &ZoneSnapshot) -> Option<f64> {
    if zone.final_action == FinalAction::NoSpray
        || zone.pollution_type == PollutionType::Combustion
    {
        return None;
    }

    let base = match zone.final_action {
        FinalAction::SprayHigh => SPRAY_HIGH_REDUCTION,
        _ => SPRAY_LOW_REDUCTION,
    };
    let wind_bonus = (zone.wind_speed() / 10.0).clamp(0.0, MAX_WIND_BONUS);
    let type_bonus = match zone.pollution_type {
        PollutionType::Dust => DUST_BONUS,
        _ => 0.0,
    };

    Some((base + wind_bonus + type_bonus).min(MAX_REDUCTION))
}

/// Estimate the AQI of `zone` after its chosen spray action
pub fn estimate(zone: &ZoneSnapshot) -> Option<ImpactEstimate> {
    let reduction = reduction(zone)?;
    let before = zone.aqi;
    let after = (before * (1.0 - reduction)).round();

    Some(ImpactEstimate {
        before,
        after,
        drop: before - after,
        pct: (reduction * 100.0).round() as u32,
        action: zone.final_action,
    })
}

/// The explanation shown under the before/after figures
pub fn impact_note(zone: &ZoneSnapshot) -> String {
    match estimate(zone) {
        Some(impact) => {
            let wind = zone
                .weather
                .as_ref()
                .and_then(|w| w.wind_speed)
                .map(|w| w.to_string())
                .unwrap_or_else(|| "—".to_string());
            format!(
                "Est. {}% AQI reduction within {} hours at {} m/s wind",
                impact.pct,
                impact.recovery_window(),
                wind
            )
        }
        None if zone.pollution_type == PollutionType::Combustion => {
            "Combustion source — water spray ineffective, skip justified".to_string()
        }
        None => "AQI below threshold — no intervention needed".to_string(),
    }
}
