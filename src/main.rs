use anyhow::{bail, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use spray_fleet::simulation::{
    Clock, Dashboard, DemoFeed, FileFeed, FleetConfig, ManualClock, SnapshotSource, FLEET_SIZE,
};

#[derive(Parser)]
#[command(name = "spray_fleet")]
#[command(about = "Water-spray truck fleet simulation, headless")]
struct Cli {
    /// Number of fleet ticks to run
    #[arg(long, default_value = "120")]
    ticks: u32,

    /// Trucks that may be dispatched
    #[arg(long, default_value_t = FLEET_SIZE)]
    trucks: usize,

    /// Simulated time between fleet ticks, in milliseconds
    #[arg(long, default_value = "1000")]
    tick_interval_ms: u64,

    /// Simulated time between snapshot refreshes, in milliseconds
    #[arg(long, default_value = "30000")]
    refresh_interval_ms: u64,

    /// Seed for the demo feed
    #[arg(long)]
    seed: Option<u64>,

    /// Replay these dashboard JSON files instead of the demo feed (repeatable)
    #[arg(long)]
    snapshot: Vec<PathBuf>,

    /// Force a manual sprinkler override on a demo zone (repeatable)
    #[arg(long)]
    toggle: Vec<String>,

    /// Sleep between ticks so the run follows the wall clock
    #[arg(long)]
    realtime: bool,

    /// Turn off traffic alerts
    #[arg(long)]
    no_traffic_alerts: bool,

    /// Print a summary every N ticks
    #[arg(long, default_value = "10")]
    summary_every: u32,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,spray_fleet=info"),
    )
    .init();

    let cli = Cli::parse();
    if let Err(e) = run_headless(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn build_source(cli: &Cli) -> Result<Box<dyn SnapshotSource>> {
    if !cli.snapshot.is_empty() {
        if !cli.toggle.is_empty() {
            bail!("--toggle only applies to the demo feed");
        }
        return Ok(Box::new(FileFeed::new(cli.snapshot.clone())?));
    }

    let mut feed = DemoFeed::new(cli.seed).with_max_trucks(cli.trucks);
    for zone in &cli.toggle {
        if feed.toggle_sprinkler(zone).is_none() {
            let known: Vec<&str> = feed.zone_names().collect();
            bail!(
                "Unknown zone for --toggle: {} (known zones: {})",
                zone,
                known.join(", ")
            );
        }
    }
    Ok(Box::new(feed))
}

/// Run the dashboard tasks in headless mode
fn run_headless(cli: &Cli) -> Result<()> {
    if cli.tick_interval_ms == 0 {
        bail!("--tick-interval-ms must be greater than zero");
    }

    let mut source = build_source(cli)?;
    let clock = ManualClock::new(0);
    let config = FleetConfig::default();
    let mut dashboard = Dashboard::with_clock(config, clock.clone());
    dashboard.set_truck_count(cli.trucks);
    dashboard.alerts.enabled = !cli.no_traffic_alerts;

    println!("Running spray fleet simulation in headless mode...");
    println!(
        "Ticks: {}, tick every {}ms, refresh every {}ms, trucks: {}",
        cli.ticks, cli.tick_interval_ms, cli.refresh_interval_ms, cli.trucks
    );
    println!();

    let mut next_refresh_ms = 0;
    let mut alerts_fired = 0;
    for tick in 1..=cli.ticks {
        if clock.now_ms() >= next_refresh_ms {
            match source.next_snapshot() {
                Ok(snapshot) => dashboard.refresh(snapshot),
                Err(e) => dashboard.refresh_failed(&e),
            }
            next_refresh_ms = clock.now_ms().saturating_add(cli.refresh_interval_ms);
        }

        let report = dashboard.tick();
        alerts_fired += report.alerts.len();

        if cli.summary_every > 0 && tick % cli.summary_every == 0 {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick,
                clock.now_ms() as f64 / 1000.0
            );
            dashboard.print_summary();
            println!();
        }

        clock.advance(cli.tick_interval_ms);
        if cli.realtime && tick < cli.ticks {
            std::thread::sleep(std::time::Duration::from_millis(cli.tick_interval_ms));
        }
    }

    println!("=== Final State ===");
    dashboard.print_summary();

    let counts = dashboard.fleet.counts();
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", dashboard.ticks);
    info!("Snapshots received: {}", dashboard.refreshes);
    info!("Alerts fired: {}", alerts_fired);
    info!("Trucks spraying: {}", counts.spraying);
    info!("Trucks returning: {}", counts.returning);
    info!("Trucks idle: {}", counts.idle);
    Ok(())
}
