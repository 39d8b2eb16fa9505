//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Each step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], runs the schedule, forwards the step's notifications to the
//! caller's [Monitor] and surfaces any [EngineFault] as an error.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};
use tracing::{info, warn};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::error::{EngineFault, SimulationError};
use crate::monitor::{Monitor, PendingActivities};
use crate::profiling::EventMetrics;
use crate::scenario::SimulationEndTime;
use crate::systems::{
    cancellation_system, driver_request_system, dropoff_system, pickup_system,
    rider_request_system,
};

fn current_kind_is(event: &Option<Res<CurrentEvent>>, kind: EventKind) -> bool {
    event.as_ref().is_some_and(|e| e.0.kind == kind)
}

fn is_rider_request(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(&event, EventKind::RiderRequest)
}

fn is_driver_request(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(&event, EventKind::DriverRequest)
}

fn is_cancellation(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(&event, EventKind::Cancellation)
}

fn is_pickup(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(&event, EventKind::Pickup)
}

fn is_dropoff(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(&event, EventKind::Dropoff)
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
///
/// Returns `Ok(false)` when the queue is empty, or when the next event is at or
/// past [SimulationEndTime]; in that case every pending event is discarded.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    monitor: &mut dyn Monitor,
    mut hook: F,
) -> Result<bool, SimulationError>
where
    F: FnMut(&World, &Event),
{
    let stop_at = world.get_resource::<SimulationEndTime>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end), Some(ts)) = (stop_at, next_ts) {
        if ts >= end {
            let discarded = world.resource_mut::<SimulationClock>().clear();
            if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
                metrics.record_discarded(discarded);
            }
            warn!(horizon = end, discarded, "horizon reached, discarding pending events");
            return Ok(false);
        }
    }

    let Some(event) = world.resource_mut::<SimulationClock>().pop_next() else {
        return Ok(false);
    };
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }

    schedule.run(world);

    if let Some(mut pending) = world.get_resource_mut::<PendingActivities>() {
        for activity in pending.drain() {
            monitor.notify(activity);
        }
    }
    hook(world, &event);

    let fault = world
        .get_resource_mut::<EngineFault>()
        .and_then(|mut fault| fault.take());
    if let Some(source) = fault {
        warn!(%event, error = %source, "stopping simulation");
        return Err(SimulationError::Precondition { event, source });
    }
    Ok(true)
}

/// Runs one simulation step. See [run_next_event_with_hook].
pub fn run_next_event(
    world: &mut World,
    schedule: &mut Schedule,
    monitor: &mut dyn Monitor,
) -> Result<bool, SimulationError> {
    run_next_event_with_hook(world, schedule, monitor, |_, _| {})
}

/// Runs simulation steps until the event queue is empty, the horizon is
/// reached, or `max_steps` is reached. Returns the number of steps executed.
pub fn run_until_empty(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    monitor: &mut dyn Monitor,
) -> Result<usize, SimulationError> {
    run_until_empty_with_hook(world, schedule, max_steps, monitor, |_, _| {})
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    monitor: &mut dyn Monitor,
    mut hook: F,
) -> Result<usize, SimulationError>
where
    F: FnMut(&World, &Event),
{
    info!(max_steps, "simulation started");
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, monitor, &mut hook)? {
        steps += 1;
    }
    let now = world
        .get_resource::<SimulationClock>()
        .map_or(0, |clock| clock.now());
    info!(steps, now, "simulation finished");
    Ok(steps)
}

/// Builds the default schedule: one system per event kind, each gated on the
/// current event. Runs single-threaded so a step is applied in one pass.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((
        rider_request_system.run_if(is_rider_request),
        driver_request_system.run_if(is_driver_request),
        cancellation_system.run_if(is_cancellation),
        pickup_system.run_if(is_pickup),
        dropoff_system.run_if(is_dropoff),
    ));
    schedule
}
