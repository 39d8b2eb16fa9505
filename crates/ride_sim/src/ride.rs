//! Transitions that change a driver and a rider together.
//!
//! Both functions check every precondition before touching either value, so a
//! failed transition leaves driver and rider exactly as they were.

use bevy_ecs::prelude::Entity;

use crate::ecs::{Driver, Rider};
use crate::error::PreconditionError;

/// Picks `rider` up at its origin and starts driving to its destination.
/// Returns the ride time.
pub fn start_ride(
    driver: &mut Driver,
    rider_entity: Entity,
    rider: &mut Rider,
) -> Result<u64, PreconditionError> {
    driver.ensure_idle()?;
    rider.ensure_waiting()?;

    driver.location = rider.origin;
    driver.rider = Some(rider_entity);
    rider.mark_satisfied()?;
    driver.start_drive(rider.destination)
}

/// Drops the on-board rider at the driver's destination; the driver becomes idle there.
pub fn end_ride(
    driver: &mut Driver,
    rider_entity: Entity,
    rider: &mut Rider,
) -> Result<(), PreconditionError> {
    if driver.rider != Some(rider_entity) {
        return Err(PreconditionError::RiderNotOnBoard {
            driver: driver.id.clone(),
            rider: rider.id.clone(),
        });
    }
    let Some(destination) = driver.destination else {
        return Err(PreconditionError::NoDestination {
            driver: driver.id.clone(),
        });
    };

    rider.location = destination;
    driver.rider = None;
    driver.end_drive()
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;
    use crate::ecs::RiderStatus;
    use crate::location::Location;

    fn pair() -> (Driver, Rider) {
        let driver = Driver::new("Dan", Location::new(0, 0), NonZeroU64::new(1).expect("speed"));
        let rider = Rider::new("Ann", 100, Location::new(0, 3), Location::new(0, 5), 0);
        (driver, rider)
    }

    #[test]
    fn start_ride_moves_driver_to_origin_and_heads_for_destination() {
        let (mut driver, mut rider) = pair();
        let rider_entity = Entity::from_raw(7);

        let ride_time = start_ride(&mut driver, rider_entity, &mut rider).expect("ride");

        assert_eq!(ride_time, 2);
        assert_eq!(driver.location(), Location::new(0, 3));
        assert_eq!(driver.destination(), Some(Location::new(0, 5)));
        assert_eq!(driver.rider(), Some(rider_entity));
        assert!(!driver.is_idle());
        assert_eq!(rider.status(), RiderStatus::Satisfied);
    }

    #[test]
    fn end_ride_delivers_rider_and_frees_driver() {
        let (mut driver, mut rider) = pair();
        let rider_entity = Entity::from_raw(7);
        start_ride(&mut driver, rider_entity, &mut rider).expect("ride");

        end_ride(&mut driver, rider_entity, &mut rider).expect("end ride");

        assert_eq!(driver.location(), Location::new(0, 5));
        assert_eq!(rider.location(), Location::new(0, 5));
        assert_eq!(driver.rider(), None);
        assert_eq!(driver.destination(), None);
        assert!(driver.is_idle());
    }

    #[test]
    fn failed_start_leaves_both_untouched() {
        let (mut driver, mut rider) = pair();
        rider.mark_cancelled();
        let before = (driver.clone(), rider.clone());

        let result = start_ride(&mut driver, Entity::from_raw(7), &mut rider);

        assert!(matches!(
            result,
            Err(PreconditionError::RiderNotWaiting { .. })
        ));
        assert_eq!((driver, rider), before);
    }

    #[test]
    fn start_ride_requires_idle_driver() {
        let (mut driver, mut rider) = pair();
        driver.start_drive(Location::new(9, 9)).expect("idle driver");

        let result = start_ride(&mut driver, Entity::from_raw(7), &mut rider);

        assert!(matches!(result, Err(PreconditionError::DriverNotIdle { .. })));
        assert_eq!(rider.status(), RiderStatus::Waiting);
    }

    #[test]
    fn end_ride_requires_matching_rider() {
        let (mut driver, mut rider) = pair();
        start_ride(&mut driver, Entity::from_raw(7), &mut rider).expect("ride");

        let result = end_ride(&mut driver, Entity::from_raw(8), &mut rider);

        assert!(matches!(
            result,
            Err(PreconditionError::RiderNotOnBoard { .. })
        ));
        assert_eq!(driver.rider(), Some(Entity::from_raw(7)));
        assert_eq!(rider.location(), Location::new(0, 3));
    }
}
