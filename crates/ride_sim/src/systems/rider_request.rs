use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::dispatcher::{Dispatcher, WaitingRider};
use crate::ecs::{Driver, Rider};
use crate::error::{EngineFault, PreconditionError};
use crate::monitor::{Activity, ActivityKind, ActorKind, PendingActivities};

/// A rider asks for a driver. Always schedules the rider's cancellation at
/// `t + patience`; when an idle driver is found it starts driving to the rider
/// and a pickup is scheduled for its arrival.
///
/// The cancellation is scheduled first so that it wins a timestamp tie with
/// any pickup of the same rider.
pub fn rider_request_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut dispatcher: ResMut<Dispatcher>,
    mut activities: ResMut<PendingActivities>,
    mut fault: ResMut<EngineFault>,
    riders: Query<&Rider>,
    mut drivers: Query<&mut Driver>,
) {
    if event.0.kind != EventKind::RiderRequest {
        return;
    }
    let now = event.0.timestamp;

    let Some(rider_entity) = event.0.subject.rider() else {
        fault.record(PreconditionError::MissingPayload {
            kind: EventKind::RiderRequest,
            role: "rider",
        });
        return;
    };
    let Ok(rider) = riders.get(rider_entity) else {
        fault.record(PreconditionError::MissingRider(rider_entity));
        return;
    };

    activities.push(Activity::new(
        now,
        ActorKind::Rider,
        ActivityKind::Request,
        &rider.id,
        rider.origin,
    ));

    let driver_entity = dispatcher.request_driver(WaitingRider::new(rider_entity, rider), |candidate| {
        drivers
            .get(candidate)
            .ok()
            .filter(|driver| driver.is_idle())
            .map(|driver| driver.travel_time(rider.origin))
    });

    clock.schedule_at(
        now.saturating_add(rider.patience),
        EventKind::Cancellation,
        EventSubject::Ride {
            rider: rider_entity,
            driver: driver_entity,
        },
    );

    let Some(driver_entity) = driver_entity else {
        return;
    };
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        fault.record(PreconditionError::MissingDriver(driver_entity));
        return;
    };
    match driver.start_drive(rider.origin) {
        Ok(travel_time) => {
            debug!(rider = %rider.id, driver = %driver.id, travel_time, "driver heading to pickup");
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
