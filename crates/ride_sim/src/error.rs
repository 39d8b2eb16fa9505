use bevy_ecs::prelude::{Entity, Resource};
use thiserror::Error;
use tracing::warn;

use crate::clock::{Event, EventKind};
use crate::ecs::RiderStatus;

/// A rider or driver transition was invoked outside its legal state.
///
/// These indicate a bug in event handling rather than a domain race; races
/// (late pickups, double cancellations) are absorbed by status checks instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("driver {driver} is not idle")]
    DriverNotIdle { driver: String },

    #[error("driver {driver} has no destination")]
    NoDestination { driver: String },

    #[error("driver {driver} is not carrying rider {rider}")]
    RiderNotOnBoard { driver: String, rider: String },

    #[error("rider {rider} is {status:?}, expected Waiting")]
    RiderNotWaiting { rider: String, status: RiderStatus },

    #[error("entity {0:?} is not a rider")]
    MissingRider(Entity),

    #[error("entity {0:?} is not a driver")]
    MissingDriver(Entity),

    #[error("{kind:?} event carries no {role}")]
    MissingPayload {
        kind: EventKind,
        role: &'static str,
    },
}

/// Failure that stops the run loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("{event} failed: {source}")]
    Precondition {
        event: Event,
        #[source]
        source: PreconditionError,
    },
}

/// First precondition failure raised by a system during the current step.
///
/// Systems cannot return errors, so they record them here; the runner takes
/// the fault after the schedule finishes and aborts the run.
#[derive(Debug, Default, Resource)]
pub struct EngineFault(Option<PreconditionError>);

impl EngineFault {
    pub fn record(&mut self, error: PreconditionError) {
        warn!(%error, "transition precondition violated");
        if self.0.is_none() {
            self.0 = Some(error);
        }
    }

    pub fn take(&mut self) -> Option<PreconditionError> {
        self.0.take()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}
