use std::num::NonZeroU64;

use bevy_ecs::prelude::{Entity, Schedule, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::error::EngineFault;
use crate::input::SeedEvent;
use crate::location::Location;
use crate::monitor::PendingActivities;
use crate::profiling::EventMetrics;
use crate::runner::simulation_schedule;
use crate::scenario::params::{ConfigError, ScenarioParams, SimulationConfig};

/// Inserts every resource the systems and runner expect. Existing resources
/// are replaced.
pub fn insert_core_resources(world: &mut World) {
    world.insert_resource(SimulationClock::default());
    world.insert_resource(Dispatcher::default());
    world.insert_resource(PendingActivities::default());
    world.insert_resource(EngineFault::default());
    world.insert_resource(EventMetrics::default());
}

/// Spawns the actors named by `seeds` and schedules their request events.
///
/// Every line gets its own entity, drivers included, so a repeated driver
/// identifier starts a second driver with that line's location and speed.
/// Returns the entity for each seed, in input order. Requires
/// [`insert_core_resources`] to have run.
pub fn seed_events(world: &mut World, seeds: &[SeedEvent]) -> Vec<Entity> {
    let mut entities = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let entity = match seed {
            SeedEvent::RiderRequest {
                timestamp,
                id,
                origin,
                destination,
                patience,
            } => {
                let sequence = world.resource::<SimulationClock>().next_sequence();
                let rider = Rider::new(id.clone(), *patience, *origin, *destination, *timestamp)
                    .with_sequence(sequence);
                let entity = world.spawn(rider).id();
                world.resource_mut::<SimulationClock>().schedule_at(
                    *timestamp,
                    EventKind::RiderRequest,
                    EventSubject::Rider(entity),
                );
                entity
            }
            SeedEvent::DriverRequest {
                timestamp,
                id,
                location,
                speed,
            } => {
                let entity = world.spawn(Driver::new(id.clone(), *location, *speed)).id();
                world.resource_mut::<SimulationClock>().schedule_at(
                    *timestamp,
                    EventKind::DriverRequest,
                    EventSubject::Driver(entity),
                );
                entity
            }
        };
        entities.push(entity);
    }
    entities
}

fn random_location(rng: &mut StdRng, params: &ScenarioParams) -> Location {
    Location::new(
        rng.gen_range(0..params.grid_rows.max(1)),
        rng.gen_range(0..params.grid_cols.max(1)),
    )
}

/// Generates a random event list: every driver makes one request in
/// `[0, driver_spread]` and riders request uniformly over `[0, request_window]`.
/// The list is sorted by timestamp, drivers first within a tie.
pub fn generate_seed_events(params: &ScenarioParams) -> Vec<SeedEvent> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let min_speed = params.min_speed.max(1);
    let max_speed = params.max_speed.max(min_speed);
    let max_patience = params.max_patience.max(params.min_patience);

    let mut seeds = Vec::with_capacity(params.num_drivers + params.num_riders);
    for index in 0..params.num_drivers {
        let speed = rng.gen_range(min_speed..=max_speed);
        seeds.push(SeedEvent::DriverRequest {
            timestamp: rng.gen_range(0..=params.driver_spread),
            id: format!("driver-{index}"),
            location: random_location(&mut rng, params),
            speed: NonZeroU64::new(speed).unwrap_or(NonZeroU64::MIN),
        });
    }
    for index in 0..params.num_riders {
        seeds.push(SeedEvent::RiderRequest {
            timestamp: rng.gen_range(0..=params.request_window),
            id: format!("rider-{index}"),
            origin: random_location(&mut rng, params),
            destination: random_location(&mut rng, params),
            patience: rng.gen_range(params.min_patience..=max_patience),
        });
    }
    seeds.sort_by_key(|seed| (seed.timestamp(), matches!(seed, SeedEvent::RiderRequest { .. })));
    seeds
}

/// Builds a ready-to-run world: core resources, the config's horizon, the
/// seeded actors and their request events, plus the default schedule.
pub fn build_simulation(
    config: &SimulationConfig,
    seeds: &[SeedEvent],
) -> Result<(World, Schedule), ConfigError> {
    config.validate()?;
    let mut world = World::new();
    insert_core_resources(&mut world);
    config.apply(&mut world);
    seed_events(&mut world, seeds);
    let drivers = seeds
        .iter()
        .filter(|seed| matches!(seed, SeedEvent::DriverRequest { .. }))
        .count();
    info!(
        seeds = seeds.len(),
        drivers,
        horizon = ?config.horizon,
        "simulation built"
    );
    Ok((world, simulation_schedule()))
}
