use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind};
use crate::dispatcher::Dispatcher;
use crate::ecs::Rider;
use crate::error::{EngineFault, PreconditionError};
use crate::monitor::{Activity, ActivityKind, ActorKind, PendingActivities};

/// The rider's patience ran out. Only a still-waiting rider cancels; a rider
/// already picked up or cancelled makes this a no-op.
pub fn cancellation_system(
    event: Res<CurrentEvent>,
    mut dispatcher: ResMut<Dispatcher>,
    mut activities: ResMut<PendingActivities>,
    mut fault: ResMut<EngineFault>,
    mut riders: Query<&mut Rider>,
) {
    if event.0.kind != EventKind::Cancellation {
        return;
    }

    let Some(rider_entity) = event.0.subject.rider() else {
        fault.record(PreconditionError::MissingPayload {
            kind: EventKind::Cancellation,
            role: "rider",
        });
        return;
    };
    let Ok(mut rider) = riders.get_mut(rider_entity) else {
        fault.record(PreconditionError::MissingRider(rider_entity));
        return;
    };
    if !rider.is_waiting() {
        debug!(rider = %rider.id, status = ?rider.status(), "cancellation ignored");
        return;
    }

    activities.push(Activity::new(
        event.0.timestamp,
        ActorKind::Rider,
        ActivityKind::Cancel,
        &rider.id,
        rider.origin,
    ));
    let was_queued = dispatcher.cancel_ride(rider_entity, &mut rider);
    debug!(rider = %rider.id, was_queued, "rider cancelled");
}
