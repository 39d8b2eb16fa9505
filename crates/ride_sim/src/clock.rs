//! Logical clock and the global event queue.
//!
//! Events are totally ordered by `(timestamp, sequence)`. The sequence number
//! is assigned by [`SimulationClock::schedule_at`], so events sharing a
//! timestamp run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use bevy_ecs::prelude::{Entity, Resource, World};

use crate::ecs::{Driver, Rider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    RiderRequest,
    DriverRequest,
    Cancellation,
    Pickup,
    Dropoff,
}

/// Entities an event acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSubject {
    Rider(Entity),
    Driver(Entity),
    /// Cancellation, pickup and dropoff. Only a cancellation may lack a driver.
    Ride {
        rider: Entity,
        driver: Option<Entity>,
    },
}

impl EventSubject {
    pub fn rider(&self) -> Option<Entity> {
        match self {
            EventSubject::Rider(rider) => Some(*rider),
            EventSubject::Ride { rider, .. } => Some(*rider),
            EventSubject::Driver(_) => None,
        }
    }

    pub fn driver(&self) -> Option<Entity> {
        match self {
            EventSubject::Driver(driver) => Some(*driver),
            EventSubject::Ride { driver, .. } => *driver,
            EventSubject::Rider(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    /// Insertion order; breaks timestamp ties.
    pub sequence: u64,
    pub kind: EventKind,
    pub subject: EventSubject,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, sequence).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} #{} at t={}", self.kind, self.sequence, self.timestamp)
    }
}

impl Event {
    /// Renders the event as a log line, resolving rider and driver names through `world`.
    pub fn describe(&self, world: &World) -> String {
        let rider = self
            .subject
            .rider()
            .and_then(|entity| world.get::<Rider>(entity))
            .map_or("?", |rider| rider.id.as_str());
        let driver = self
            .subject
            .driver()
            .and_then(|entity| world.get::<Driver>(entity))
            .map_or("?", |driver| driver.id.as_str());
        let t = self.timestamp;
        match self.kind {
            EventKind::RiderRequest => format!("{t} -- {rider}: Request a driver"),
            EventKind::DriverRequest => format!("{t} -- {driver}: Request a rider"),
            EventKind::Cancellation => format!("{t} -- {rider}: Cancelled"),
            EventKind::Pickup => format!("{t} -- {driver}: Picks up {rider}"),
            EventKind::Dropoff => format!("{t} -- {driver}: Drops off {rider}"),
        }
    }
}

/// The event being processed by the current schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_sequence: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedules an event at an absolute timestamp and returns it.
    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: EventSubject) -> Event {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let event = Event {
            timestamp,
            sequence: self.next_sequence,
            kind,
            subject,
        };
        self.next_sequence += 1;
        self.events.push(event);
        event
    }

    /// Sequence number the next scheduled event will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Schedules an event `delay` minutes after the current time.
    pub fn schedule_in(&mut self, delay: u64, kind: EventKind, subject: EventSubject) -> Event {
        self.schedule_at(self.now.saturating_add(delay), kind, subject)
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn peek(&self) -> Option<&Event> {
        self.events.peek()
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    /// Drops every pending event, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.events.len();
        self.events.clear();
        discarded
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
