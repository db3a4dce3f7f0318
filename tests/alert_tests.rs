//! Alert cooldown validation tests

use spray_fleet::simulation::{
    AlertKind, AlertSeverity, Clock, CooldownGate, GeoPoint, ManualClock, TrafficAlertMonitor,
    ZoneSnapshot, BENEFIT_WINDOW_MS, CONGESTION_WINDOW_MS,
};

fn spraying_zone(name: &str, aqi: f64, traffic_level: u32, congestion: f64) -> ZoneSnapshot {
    ZoneSnapshot::new(name, GeoPoint::new(28.63, 77.24), aqi)
        .with_truck(true)
        .with_traffic(traffic_level, congestion)
}

#[test]
fn test_gate_window_is_exclusive() {
    let mut gate = CooldownGate::new();
    let t = 1_000;
    assert!(gate.should_fire("Z", t, CONGESTION_WINDOW_MS));
    assert!(!gate.should_fire("Z", t + 119_999, CONGESTION_WINDOW_MS));
    assert!(!gate.should_fire("Z", t + 120_000, CONGESTION_WINDOW_MS));
    assert!(gate.should_fire("Z", t + 120_001, CONGESTION_WINDOW_MS));
    assert_eq!(gate.last_fired("Z"), Some(t + 120_001));
}

#[test]
fn test_gate_keys_are_independent() {
    let mut gate = CooldownGate::new();
    assert!(gate.should_fire("ITO", 0, CONGESTION_WINDOW_MS));
    assert!(gate.should_fire("ITO_benefit", 0, BENEFIT_WINDOW_MS));
    assert!(gate.should_fire("Okhla", 10, CONGESTION_WINDOW_MS));
    assert!(!gate.should_fire("ITO", 10, CONGESTION_WINDOW_MS));

    gate.clear();
    assert!(gate.last_fired("ITO").is_none());
    assert!(gate.should_fire("ITO", 20, CONGESTION_WINDOW_MS));
}

#[test]
fn test_suppressed_call_does_not_extend_window() {
    let mut gate = CooldownGate::new();
    assert!(gate.should_fire("Z", 0, 1_000));
    assert!(!gate.should_fire("Z", 900, 1_000));
    assert!(gate.should_fire("Z", 1_001, 1_000));
}

#[test]
fn test_monitor_fires_both_kinds_then_suppresses() {
    let clock = ManualClock::new(0);
    let mut monitor = TrafficAlertMonitor::new();
    let zones = vec![spraying_zone("ITO", 250.0, 2, 0.7)];

    let events = monitor.check(&zones, clock.now_ms());
    let kinds: Vec<AlertKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![AlertKind::Congestion, AlertKind::Benefit]);
    assert_eq!(events[0].severity, AlertSeverity::Traffic);
    assert_eq!(events[1].severity, AlertSeverity::Dust);

    clock.advance(1_000);
    assert!(monitor.check(&zones, clock.now_ms()).is_empty());

    clock.set(120_001);
    let events = monitor.check(&zones, clock.now_ms());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, AlertKind::Congestion);

    clock.set(180_001);
    let events = monitor.check(&zones, clock.now_ms());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, AlertKind::Benefit);
}

#[test]
fn test_monitor_ignores_zones_without_trucks() {
    let mut monitor = TrafficAlertMonitor::new();
    let zones = vec![spraying_zone("ITO", 300.0, 2, 0.9).with_truck(false)];
    assert!(monitor.check(&zones, 0).is_empty());
}

#[test]
fn test_monitor_disabled_fires_nothing() {
    let mut monitor = TrafficAlertMonitor::new();
    monitor.enabled = false;
    let zones = vec![spraying_zone("ITO", 300.0, 2, 0.9)];
    assert!(monitor.check(&zones, 0).is_empty());
    assert!(monitor.gate().last_fired("ITO").is_none());
}

#[test]
fn test_congestion_index_alone_triggers_warning() {
    let mut monitor = TrafficAlertMonitor::new();
    let zones = vec![spraying_zone("Rohini", 150.0, 1, 0.7)];
    let events = monitor.check(&zones, 0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].zone, "Rohini");
    assert!(events[0].message.contains("congestion 70%"));
    assert!(events[0].message.contains("speed — km/h"));
    assert!(events[0]
        .headline
        .as_deref()
        .is_some_and(|h| h.contains("AQI still 150")));
}

#[test]
fn test_missing_traffic_defaults_to_quiet() {
    let mut monitor = TrafficAlertMonitor::new();
    let zones = vec![ZoneSnapshot::new("Narela", GeoPoint::new(28.85, 77.09), 400.0).with_truck(true)];
    assert!(monitor.check(&zones, 0).is_empty());
}

#[test]
fn test_benefit_message_quotes_improvement() {
    let mut monitor = TrafficAlertMonitor::new();
    let zones = vec![spraying_zone("Okhla", 250.0, 1, 0.4)];
    let events = monitor.check(&zones, 0);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].message,
        "✅ Spray truck in Okhla reducing dust stirred by traffic — AQI 250, est. 45 point improvement"
    );
}

#[test]
fn test_manual_clock_saturates() {
    let clock = ManualClock::new(u64::MAX - 5);
    clock.advance(10);
    assert_eq!(clock.now_ms(), u64::MAX);

    let mut gate = CooldownGate::new();
    assert!(gate.should_fire("ITO", clock.now_ms(), CONGESTION_WINDOW_MS));
    clock.advance(CONGESTION_WINDOW_MS + 1);
    assert!(!gate.should_fire("ITO", clock.now_ms(), CONGESTION_WINDOW_MS));
}
