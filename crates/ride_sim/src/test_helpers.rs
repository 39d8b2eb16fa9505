//! Test helpers for common test setup and utilities.
//!
//! Shared by the in-module system tests and, through the `test-helpers`
//! feature, by the integration tests.

use std::num::NonZeroU64;

use bevy_ecs::prelude::{Entity, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, Event, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Driver, Rider};
use crate::location::Location;
use crate::scenario::insert_core_resources;

/// Shorthand for [`Location::new`].
pub fn loc(row: i64, col: i64) -> Location {
    Location::new(row, col)
}

/// Create a world with every resource the systems read.
pub fn create_test_world() -> World {
    let mut world = World::new();
    insert_core_resources(&mut world);
    world
}

/// Spawns a waiting rider whose sequence is taken from the clock.
pub fn spawn_rider(
    world: &mut World,
    id: &str,
    origin: Location,
    destination: Location,
    patience: u64,
    requested_at: u64,
) -> Entity {
    let sequence = world.resource::<SimulationClock>().next_sequence();
    world
        .spawn(Rider::new(id, patience, origin, destination, requested_at).with_sequence(sequence))
        .id()
}

/// Spawns an idle driver. A zero speed is raised to 1.
pub fn spawn_driver(world: &mut World, id: &str, location: Location, speed: u64) -> Entity {
    let speed = NonZeroU64::new(speed).unwrap_or(NonZeroU64::MIN);
    world.spawn(Driver::new(id, location, speed)).id()
}

/// Schedules one event, pops it (advancing the clock) and runs `system`
/// against it. Events already queued at an earlier time are popped first, so
/// callers should start from an empty queue.
pub fn run_single_event<M>(
    world: &mut World,
    timestamp: u64,
    kind: EventKind,
    subject: EventSubject,
    system: impl IntoSystemConfigs<M>,
) -> Event {
    let event = {
        let mut clock = world.resource_mut::<SimulationClock>();
        clock.schedule_at(timestamp, kind, subject);
        clock.pop_next().expect("event was just scheduled")
    };
    world.insert_resource(CurrentEvent(event));

    let mut schedule = Schedule::default();
    schedule.add_systems(system);
    schedule.run(world);
    event
}
