//! Impact model validation tests

use spray_fleet::simulation::{
    estimate, impact_note, reduction, FinalAction, GeoPoint, PollutionType, ZoneSnapshot,
    MAX_REDUCTION,
};

fn zone(aqi: f64, action: FinalAction, pollution_type: PollutionType) -> ZoneSnapshot {
    ZoneSnapshot::new("Test Zone", GeoPoint::new(28.6, 77.2), aqi)
        .with_action(action)
        .with_pollution_type(pollution_type)
}

#[test]
fn test_high_spray_on_dust_with_strong_wind() {
    let z = zone(300.0, FinalAction::SprayHigh, PollutionType::Dust).with_wind_speed(10.0);

    let r = reduction(&z).expect("dust zone is sprayable");
    assert!((r - 0.33).abs() < 1e-9);

    let impact = estimate(&z).expect("dust zone is sprayable");
    assert_eq!(impact.before, 300.0);
    assert_eq!(impact.after, 201.0);
    assert_eq!(impact.drop, 99.0);
    assert_eq!(impact.pct, 33);
}

#[test]
fn test_combustion_is_never_estimated() {
    for action in [FinalAction::SprayHigh, FinalAction::SprayLow, FinalAction::NoSpray] {
        let z = zone(450.0, action, PollutionType::Combustion).with_wind_speed(5.0);
        assert!(estimate(&z).is_none(), "combustion with {:?}", action);
    }
}

#[test]
fn test_no_spray_is_never_estimated() {
    for pollution_type in [PollutionType::Dust, PollutionType::Mixed, PollutionType::Combustion] {
        let z = zone(450.0, FinalAction::NoSpray, pollution_type);
        assert!(estimate(&z).is_none(), "no_spray on {:?}", pollution_type);
    }
}

#[test]
fn test_low_spray_uses_default_wind() {
    // No weather: 3 m/s, so the wind bonus hits its 0.06 cap
    let z = zone(200.0, FinalAction::SprayLow, PollutionType::Mixed);
    let impact = estimate(&z).expect("mixed zone is sprayable");
    assert_eq!(impact.after, 164.0);
    assert_eq!(impact.drop, 36.0);
    assert_eq!(impact.pct, 18);
}

#[test]
fn test_calm_wind_gives_small_bonus() {
    let z = zone(100.0, FinalAction::SprayHigh, PollutionType::Dust).with_wind_speed(0.2);
    let impact = estimate(&z).expect("dust zone is sprayable");
    assert_eq!(impact.pct, 29);
    assert_eq!(impact.after, 71.0);
}

#[test]
fn test_reported_zero_wind_is_calm_air() {
    let z = zone(300.0, FinalAction::SprayHigh, PollutionType::Mixed).with_wind_speed(0.0);
    let impact = estimate(&z).expect("mixed zone is sprayable");
    assert_eq!(impact.pct, 22);
    assert_eq!(impact.after, 234.0);
    assert_eq!(
        impact_note(&z),
        "Est. 22% AQI reduction within 3–4 hours at 0 m/s wind"
    );
}

#[test]
fn test_reduction_never_exceeds_cap() {
    for wind in [0.0, 0.5, 3.0, 10.0, 40.0] {
        for action in [FinalAction::SprayHigh, FinalAction::SprayLow] {
            for pollution_type in [PollutionType::Dust, PollutionType::Mixed] {
                let z = zone(300.0, action, pollution_type).with_wind_speed(wind);
                let r = reduction(&z).expect("sprayable");
                assert!(r <= MAX_REDUCTION && r > 0.0);
            }
        }
    }
}

#[test]
fn test_recovery_window_by_intensity() {
    let high = estimate(&zone(300.0, FinalAction::SprayHigh, PollutionType::Dust))
        .expect("sprayable");
    let low = estimate(&zone(300.0, FinalAction::SprayLow, PollutionType::Dust))
        .expect("sprayable");
    assert_eq!(high.recovery_window(), "3–4");
    assert_eq!(low.recovery_window(), "4–6");
}

#[test]
fn test_impact_notes() {
    let sprayed = zone(300.0, FinalAction::SprayHigh, PollutionType::Dust).with_wind_speed(4.0);
    assert_eq!(
        impact_note(&sprayed),
        "Est. 33% AQI reduction within 3–4 hours at 4 m/s wind"
    );

    let combustion = zone(300.0, FinalAction::SprayHigh, PollutionType::Combustion);
    assert_eq!(
        impact_note(&combustion),
        "Combustion source — water spray ineffective, skip justified"
    );

    let clean = zone(90.0, FinalAction::NoSpray, PollutionType::Dust);
    assert_eq!(
        impact_note(&clean),
        "AQI below threshold — no intervention needed"
    );
}
