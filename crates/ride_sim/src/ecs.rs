//! Rider and driver components and their single-actor transitions.

use std::num::NonZeroU64;

use bevy_ecs::prelude::{Component, Entity};

use crate::error::PreconditionError;
use crate::location::Location;

/// Status of a rider's request. `Cancelled` and `Satisfied` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiderStatus {
    Waiting,
    Cancelled,
    Satisfied,
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Rider {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    /// Minutes the rider waits for a pickup before cancelling.
    pub patience: u64,
    /// Simulation time of the request; first component of the waiting-list key.
    pub requested_at: u64,
    /// Creation order among riders requested at the same time.
    pub sequence: u64,
    /// Where the rider currently is: `origin` until dropped off at `destination`.
    pub(crate) location: Location,
    pub(crate) status: RiderStatus,
}

impl Rider {
    pub fn new(
        id: impl Into<String>,
        patience: u64,
        origin: Location,
        destination: Location,
        requested_at: u64,
    ) -> Self {
        Self {
            id: id.into(),
            origin,
            destination,
            patience,
            requested_at,
            sequence: 0,
            location: origin,
            status: RiderStatus::Waiting,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn status(&self) -> RiderStatus {
        self.status
    }

    pub fn is_waiting(&self) -> bool {
        self.status == RiderStatus::Waiting
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Waiting -> Cancelled. Any other status is left alone; returns whether it changed.
    pub fn mark_cancelled(&mut self) -> bool {
        if self.status != RiderStatus::Waiting {
            return false;
        }
        self.status = RiderStatus::Cancelled;
        true
    }

    /// Waiting -> Satisfied, at pickup.
    pub fn mark_satisfied(&mut self) -> Result<(), PreconditionError> {
        self.ensure_waiting()?;
        self.status = RiderStatus::Satisfied;
        Ok(())
    }

    pub(crate) fn ensure_waiting(&self) -> Result<(), PreconditionError> {
        if self.status == RiderStatus::Waiting {
            Ok(())
        } else {
            Err(PreconditionError::RiderNotWaiting {
                rider: self.id.clone(),
                status: self.status,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Driver {
    pub id: String,
    pub(crate) location: Location,
    /// Grid units per minute.
    pub(crate) speed: NonZeroU64,
    pub(crate) idle: bool,
    /// Rider currently on board. A handle only; the rider entity is owned by the world.
    pub(crate) rider: Option<Entity>,
    pub(crate) destination: Option<Location>,
}

impl Driver {
    pub fn new(id: impl Into<String>, location: Location, speed: NonZeroU64) -> Self {
        Self {
            id: id.into(),
            location,
            speed,
            idle: true,
            rider: None,
            destination: None,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn speed(&self) -> NonZeroU64 {
        self.speed
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn rider(&self) -> Option<Entity> {
        self.rider
    }

    pub fn destination(&self) -> Option<Location> {
        self.destination
    }

    /// Minutes to reach `destination`: distance / speed rounded half-up.
    pub fn travel_time(&self, destination: Location) -> u64 {
        let distance = self.location.distance_to(destination);
        let speed = self.speed.get();
        let (whole, remainder) = (distance / speed, distance % speed);
        // Half-up: round when remainder / speed >= 1/2, without doubling either side.
        if remainder >= speed - remainder {
            whole + 1
        } else {
            whole
        }
    }

    /// Starts driving towards `destination` and returns the travel time.
    /// The driver's location only changes on [`Driver::end_drive`].
    pub fn start_drive(&mut self, destination: Location) -> Result<u64, PreconditionError> {
        self.ensure_idle()?;
        let travel_time = self.travel_time(destination);
        self.idle = false;
        self.destination = Some(destination);
        Ok(travel_time)
    }

    /// Arrives at the current destination and becomes idle.
    pub fn end_drive(&mut self) -> Result<(), PreconditionError> {
        let Some(destination) = self.destination.take() else {
            return Err(PreconditionError::NoDestination {
                driver: self.id.clone(),
            });
        };
        self.location = destination;
        self.idle = true;
        Ok(())
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), PreconditionError> {
        if self.idle {
            Ok(())
        } else {
            Err(PreconditionError::DriverNotIdle {
                driver: self.id.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_at(row: i64, col: i64, speed: u64) -> Driver {
        Driver::new(
            "Dan",
            Location::new(row, col),
            NonZeroU64::new(speed).expect("speed"),
        )
    }

    #[test]
    fn rider_starts_waiting_at_origin() {
        let rider = Rider::new("Ann", 10, Location::new(1, 1), Location::new(4, 4), 3);
        assert_eq!(rider.status(), RiderStatus::Waiting);
        assert_eq!(rider.location(), Location::new(1, 1));
        assert_eq!(rider.requested_at, 3);
    }

    #[test]
    fn cancel_only_applies_to_waiting_riders() {
        let mut rider = Rider::new("Ann", 10, Location::new(0, 0), Location::new(1, 1), 0);
        assert!(rider.mark_cancelled());
        assert_eq!(rider.status(), RiderStatus::Cancelled);
        assert!(!rider.mark_cancelled());

        let mut satisfied = Rider::new("Bo", 10, Location::new(0, 0), Location::new(1, 1), 0);
        satisfied.mark_satisfied().expect("waiting rider");
        assert!(!satisfied.mark_cancelled());
        assert_eq!(satisfied.status(), RiderStatus::Satisfied);
    }

    #[test]
    fn satisfying_a_terminal_rider_fails() {
        let mut rider = Rider::new("Ann", 10, Location::new(0, 0), Location::new(1, 1), 0);
        rider.mark_cancelled();
        assert_eq!(
            rider.mark_satisfied(),
            Err(PreconditionError::RiderNotWaiting {
                rider: "Ann".to_string(),
                status: RiderStatus::Cancelled,
            })
        );
    }

    #[test]
    fn travel_time_rounds_half_up() {
        let destination = |distance: i64| Location::new(0, distance);
        assert_eq!(driver_at(0, 0, 1).travel_time(destination(3)), 3);
        assert_eq!(driver_at(0, 0, 2).travel_time(destination(3)), 2);
        assert_eq!(driver_at(0, 0, 2).travel_time(destination(5)), 3);
        assert_eq!(driver_at(0, 0, 2).travel_time(destination(1)), 1);
        assert_eq!(driver_at(0, 0, 4).travel_time(destination(1)), 0);
        assert_eq!(driver_at(0, 0, 3).travel_time(destination(7)), 2);
        assert_eq!(driver_at(0, 0, 3).travel_time(destination(8)), 3);
        assert_eq!(driver_at(2, 2, 5).travel_time(Location::new(2, 2)), 0);
    }

    #[test]
    fn travel_time_survives_extreme_speeds_and_distances() {
        assert_eq!(driver_at(0, 0, u64::MAX).travel_time(Location::new(0, 3)), 0);
        assert_eq!(
            driver_at(i64::MIN, i64::MIN, 1).travel_time(Location::new(i64::MAX, i64::MAX)),
            u64::MAX
        );
        assert_eq!(
            driver_at(0, 0, u64::MAX).travel_time(Location::new(i64::MAX, i64::MAX)),
            1
        );
        assert_eq!(driver_at(0, 0, 2).travel_time(Location::new(0, i64::MAX)), 1 << 62);
    }

    #[test]
    fn drive_defers_arrival_until_end() {
        let mut driver = driver_at(0, 0, 1);
        let time = driver.start_drive(Location::new(2, 3)).expect("idle driver");
        assert_eq!(time, 5);
        assert!(!driver.is_idle());
        assert_eq!(driver.location(), Location::new(0, 0));
        assert_eq!(driver.destination(), Some(Location::new(2, 3)));

        driver.end_drive().expect("destination set");
        assert!(driver.is_idle());
        assert_eq!(driver.location(), Location::new(2, 3));
        assert_eq!(driver.destination(), None);
    }

    #[test]
    fn drive_preconditions_fail_fast() {
        let mut driver = driver_at(0, 0, 1);
        assert_eq!(
            driver.end_drive(),
            Err(PreconditionError::NoDestination {
                driver: "Dan".to_string()
            })
        );
        driver.start_drive(Location::new(1, 0)).expect("idle driver");
        assert_eq!(
            driver.start_drive(Location::new(5, 5)),
            Err(PreconditionError::DriverNotIdle {
                driver: "Dan".to_string()
            })
        );
        assert_eq!(driver.destination(), Some(Location::new(1, 0)));
    }
}
