use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::error::{EngineFault, PreconditionError};
use crate::monitor::{Activity, ActivityKind, ActorKind, PendingActivities};
use crate::ride::start_ride;

/// The driver reaches the rider's origin.
///
/// A rider who is no longer waiting (cancelled at or before this timestamp)
/// is not picked up; the driver just arrives and is idle again. Otherwise the
/// ride starts and the dropoff is scheduled.
pub fn pickup_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut dispatcher: ResMut<Dispatcher>,
    mut activities: ResMut<PendingActivities>,
    mut fault: ResMut<EngineFault>,
    mut riders: Query<&mut Rider>,
    mut drivers: Query<&mut Driver>,
) {
    if event.0.kind != EventKind::Pickup {
        return;
    }
    let now = event.0.timestamp;

    let (Some(rider_entity), Some(driver_entity)) =
        (event.0.subject.rider(), event.0.subject.driver())
    else {
        fault.record(PreconditionError::MissingPayload {
            kind: EventKind::Pickup,
            role: "rider and driver",
        });
        return;
    };
    let Ok(mut rider) = riders.get_mut(rider_entity) else {
        fault.record(PreconditionError::MissingRider(rider_entity));
        return;
    };
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        fault.record(PreconditionError::MissingDriver(driver_entity));
        return;
    };

    // Arrive at the pickup spot.
    if !driver.is_idle() && driver.rider().is_none() {
        if let Err(error) = driver.end_drive() {
            fault.record(error);
            return;
        }
    }

    if !rider.is_waiting() {
        if driver.rider() == Some(rider_entity) {
            driver.rider = None;
        }
        debug!(rider = %rider.id, driver = %driver.id, status = ?rider.status(), "stale pickup ignored");
        return;
    }

    let ride_time = match start_ride(&mut driver, rider_entity, &mut rider) {
        Ok(ride_time) => ride_time,
        Err(error) => {
            fault.record(error);
            return;
        }
    };

    activities.push(Activity::new(
        now,
        ActorKind::Driver,
        ActivityKind::Pickup,
        &driver.id,
        rider.origin,
    ));
    activities.push(Activity::new(
        now,
        ActorKind::Rider,
        ActivityKind::Pickup,
        &rider.id,
        rider.origin,
    ));
    dispatcher.cancel_ride(rider_entity, &mut rider);

    debug!(rider = %rider.id, driver = %driver.id, ride_time, "rider picked up");
    clock.schedule_at(
        now.saturating_add(ride_time),
        EventKind::Dropoff,
        EventSubject::Ride {
            rider: rider_entity,
            driver: Some(driver_entity),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::RiderStatus;
    use crate::test_helpers::{create_test_world, loc, run_single_event, spawn_driver, spawn_rider};

    #[test]
    fn pickup_starts_ride_and_schedules_dropoff() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "Ann", loc(0, 3), loc(0, 5), 100, 0);
        let driver = spawn_driver(&mut world, "Dan", loc(0, 0), 1);
        world
            .get_mut::<Driver>(driver)
            .expect("driver")
            .start_drive(loc(0, 3))
            .expect("idle driver");

        run_single_event(
            &mut world,
            3,
            EventKind::Pickup,
            EventSubject::Ride {
                rider,
                driver: Some(driver),
            },
            pickup_system,
        );

        let driver_state = world.get::<Driver>(driver).expect("driver");
        assert_eq!(driver_state.location(), loc(0, 3));
        assert_eq!(driver_state.destination(), Some(loc(0, 5)));
        assert_eq!(driver_state.rider(), Some(rider));
        assert_eq!(
            world.get::<Rider>(rider).expect("rider").status(),
            RiderStatus::Satisfied
        );

        let dropoff = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("dropoff");
        assert_eq!((dropoff.timestamp, dropoff.kind), (5, EventKind::Dropoff));

        let pending: Vec<_> = world.resource_mut::<PendingActivities>().drain().collect();
        let actors: Vec<_> = pending.iter().map(|a| (a.actor, a.kind)).collect();
        assert_eq!(
            actors,
            vec![
                (ActorKind::Driver, ActivityKind::Pickup),
                (ActorKind::Rider, ActivityKind::Pickup),
            ]
        );
    }

    #[test]
    fn cancelled_rider_is_not_picked_up() {
        let mut world = create_test_world();
        let rider = spawn_rider(&mut world, "Ann", loc(0, 3), loc(0, 5), 2, 0);
        world.get_mut::<Rider>(rider).expect("rider").mark_cancelled();
        let driver = spawn_driver(&mut world, "Dan", loc(0, 0), 1);
        world
            .get_mut::<Driver>(driver)
            .expect("driver")
            .start_drive(loc(0, 3))
            .expect("idle driver");

        run_single_event(
            &mut world,
            3,
            EventKind::Pickup,
            EventSubject::Ride {
                rider,
                driver: Some(driver),
            },
            pickup_system,
        );

        assert_eq!(
            world.get::<Rider>(rider).expect("rider").status(),
            RiderStatus::Cancelled
        );
        let driver_state = world.get::<Driver>(driver).expect("driver");
        assert!(driver_state.is_idle());
        assert_eq!(driver_state.location(), loc(0, 3));
        assert_eq!(driver_state.rider(), None);
        assert!(world.resource::<SimulationClock>().is_empty());
        assert!(world.resource::<PendingActivities>().is_empty());
        assert!(!world.resource::<EngineFault>().is_set());
    }
}
