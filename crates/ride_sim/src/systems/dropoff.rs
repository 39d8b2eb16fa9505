use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Driver, Rider};
use crate::error::{EngineFault, PreconditionError};
use crate::monitor::{Activity, ActivityKind, ActorKind, PendingActivities};
use crate::ride::end_ride;

/// The driver delivers the rider and immediately asks for the next one.
pub fn dropoff_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut activities: ResMut<PendingActivities>,
    mut fault: ResMut<EngineFault>,
    mut riders: Query<&mut Rider>,
    mut drivers: Query<&mut Driver>,
) {
    if event.0.kind != EventKind::Dropoff {
        return;
    }
    let now = event.0.timestamp;

    let (Some(rider_entity), Some(driver_entity)) =
        (event.0.subject.rider(), event.0.subject.driver())
    else {
        fault.record(PreconditionError::MissingPayload {
            kind: EventKind::Dropoff,
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

    if let Err(error) = end_ride(&mut driver, rider_entity, &mut rider) {
        fault.record(error);
        return;
    }

    activities.push(Activity::new(
        now,
        ActorKind::Driver,
        ActivityKind::Dropoff,
        &driver.id,
        rider.destination,
    ));
    activities.push(Activity::new(
        now,
        ActorKind::Rider,
        ActivityKind::Dropoff,
        &rider.id,
        rider.destination,
    ));

    debug!(rider = %rider.id, driver = %driver.id, "rider dropped off");
    clock.schedule_at(now, EventKind::DriverRequest, EventSubject::Driver(driver_entity));
}
