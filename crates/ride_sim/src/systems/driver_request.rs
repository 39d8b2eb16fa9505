use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::dispatcher::Dispatcher;
use crate::ecs::{Driver, Rider};
use crate::error::{EngineFault, PreconditionError};
use crate::monitor::{Activity, ActivityKind, ActorKind, PendingActivities};

/// A driver asks for a rider. If a rider is waiting, the driver heads to it and
/// a pickup is scheduled; otherwise the driver joins the pool. A request from
/// a driver that is still driving is reported but matches nobody.
pub fn driver_request_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut dispatcher: ResMut<Dispatcher>,
    mut activities: ResMut<PendingActivities>,
    mut fault: ResMut<EngineFault>,
    riders: Query<&Rider>,
    mut drivers: Query<&mut Driver>,
) {
    if event.0.kind != EventKind::DriverRequest {
        return;
    }
    let now = event.0.timestamp;

    let Some(driver_entity) = event.0.subject.driver() else {
        fault.record(PreconditionError::MissingPayload {
            kind: EventKind::DriverRequest,
            role: "driver",
        });
        return;
    };
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        fault.record(PreconditionError::MissingDriver(driver_entity));
        return;
    };

    activities.push(Activity::new(
        now,
        ActorKind::Driver,
        ActivityKind::Request,
        &driver.id,
        driver.location(),
    ));

    // A busy driver cannot take a rider; leave the waiting list untouched.
    if !driver.is_idle() {
        debug!(driver = %driver.id, "driver busy, request ignored");
        return;
    }

    let Some(rider_entity) = dispatcher.request_rider(driver_entity) else {
        debug!(driver = %driver.id, "no rider waiting");
        return;
    };
    let Ok(rider) = riders.get(rider_entity) else {
        fault.record(PreconditionError::MissingRider(rider_entity));
        return;
    };

    match driver.start_drive(rider.origin) {
        Ok(travel_time) => {
            debug!(rider = %rider.id, driver = %driver.id, travel_time, "waiting rider matched");
            clock.schedule_at(
                now.saturating_add(travel_time),
                EventKind::Pickup,
                EventSubject::Ride {
                    rider: rider_entity,
                    driver: Some(driver_entity),
                },
            );
        }
        Err(error) => fault.record(error),
    }
}
