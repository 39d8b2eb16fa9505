//! Scenario setup: configuration, seeding riders and drivers from an event
//! list, and synthetic event lists for load runs.

mod build;
mod params;

pub use build::{build_simulation, generate_seed_events, insert_core_resources, seed_events};
pub use params::{
    ConfigError, ScenarioParams, SimulationConfig, SimulationEndTime, DEFAULT_MAX_STEPS,
};
