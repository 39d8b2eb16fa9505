//! Run an event list and print one line per processed event.
//!
//! Run with: cargo run -p ride_sim --example event_list_run -- [events.txt] [config.json]
//!
//! Without arguments a small built-in list is used. Set `RUST_LOG=ride_sim=debug`
//! to see dispatcher decisions.

use std::error::Error;
use std::fs;

use ride_sim::input::parse_event_list;
use ride_sim::monitor::{ActivityKind, ActivityLog, ActorKind};
use ride_sim::profiling::EventMetrics;
use ride_sim::runner::run_until_empty_with_hook;
use ride_sim::scenario::{build_simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "\
# t  type           id     origin  destination  patience
0    DriverRequest  Dan    0,0     1
0    DriverRequest  Eve    9,9     2
0    RiderRequest   Ann    0,3     0,5          100
1    RiderRequest   Bo     8,8     1,1          4
2    RiderRequest   Cy     4,4     4,9          3
";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let events = match args.next() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let config = match args.next() {
        Some(path) => SimulationConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };

    let seeds = parse_event_list(&events)?;
    let (mut world, mut schedule) = build_simulation(&config, &seeds)?;
    let mut log = ActivityLog::new();
    let steps = run_until_empty_with_hook(
        &mut world,
        &mut schedule,
        config.max_steps,
        &mut log,
        |world, event| println!("{}", event.describe(world)),
    )?;

    world.resource::<EventMetrics>().log_summary();
    println!("--- {steps} events processed ---");
    println!(
        "rides completed: {}, riders cancelled: {}",
        log.count(ActorKind::Rider, ActivityKind::Dropoff),
        log.count(ActorKind::Rider, ActivityKind::Cancel),
    );
    Ok(())
}
