#![allow(dead_code)]

use std::num::NonZeroU64;

use bevy_ecs::prelude::{Entity, World};
use ride_sim::ecs::{Driver, Rider};
use ride_sim::input::SeedEvent;
use ride_sim::location::Location;
use ride_sim::scenario::{insert_core_resources, seed_events, SimulationConfig};

/// Builder for test worlds seeded from request events.
#[derive(Clone, Debug, Default)]
pub struct TestWorldBuilder {
    config: SimulationConfig,
    seeds: Vec<SeedEvent>,
}

impl TestWorldBuilder {
    /// Create a new builder with the default configuration and no actors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the run at `horizon`.
    pub fn with_horizon(mut self, horizon: u64) -> Self {
        self.config = self.config.with_horizon(horizon);
        self
    }

    /// Add a driver request at `timestamp`.
    pub fn driver(mut self, timestamp: u64, id: &str, location: (i64, i64), speed: u64) -> Self {
        self.seeds.push(SeedEvent::DriverRequest {
            timestamp,
            id: id.to_string(),
            location: Location::new(location.0, location.1),
            speed: NonZeroU64::new(speed).expect("positive speed"),
        });
        self
    }

    /// Add a rider request at `timestamp`.
    pub fn rider(
        mut self,
        timestamp: u64,
        id: &str,
        origin: (i64, i64),
        destination: (i64, i64),
        patience: u64,
    ) -> Self {
        self.seeds.push(SeedEvent::RiderRequest {
            timestamp,
            id: id.to_string(),
            origin: Location::new(origin.0, origin.1),
            destination: Location::new(destination.0, destination.1),
            patience,
        });
        self
    }

    /// Add pre-parsed seed events.
    pub fn seeds(mut self, seeds: impl IntoIterator<Item = SeedEvent>) -> Self {
        self.seeds.extend(seeds);
        self
    }

    /// Build the ECS world with core resources and the seeded events.
    pub fn build(self) -> World {
        let mut world = World::new();
        insert_core_resources(&mut world);
        self.config.apply(&mut world);
        seed_events(&mut world, &self.seeds);
        world
    }
}

/// Entity of the (first) rider named `id`.
pub fn rider_entity(world: &mut World, id: &str) -> Entity {
    world
        .query::<(Entity, &Rider)>()
        .iter(world)
        .filter(|(_, rider)| rider.id == id)
        .min_by_key(|(_, rider)| rider.sequence)
        .map(|(entity, _)| entity)
        .expect("rider exists")
}

pub fn rider<'w>(world: &'w mut World, id: &str) -> &'w Rider {
    let entity = rider_entity(world, id);
    world.get::<Rider>(entity).expect("rider component")
}

/// Entity of the (first spawned) driver named `id`.
pub fn driver_entity(world: &mut World, id: &str) -> Entity {
    world
        .query::<(Entity, &Driver)>()
        .iter(world)
        .filter(|(_, driver)| driver.id == id)
        .min_by_key(|(entity, _)| entity.index())
        .map(|(entity, _)| entity)
        .expect("driver exists")
}

pub fn driver<'w>(world: &'w mut World, id: &str) -> &'w Driver {
    let entity = driver_entity(world, id);
    world.get::<Driver>(entity).expect("driver component")
}
