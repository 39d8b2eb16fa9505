#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use ride_sim::clock::{Event, EventKind};
use ride_sim::error::SimulationError;
use ride_sim::monitor::ActivityLog;
use ride_sim::runner::{run_next_event, run_until_empty, run_until_empty_with_hook, simulation_schedule};

/// Helper that owns a reusable `Schedule` and the activity log it feeds.
pub struct ScheduleRunner {
    schedule: Schedule,
    log: ActivityLog,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
            log: ActivityLog::new(),
        }
    }

    /// Activities reported so far.
    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule, &mut self.log).expect("step")
    }

    /// Run events up to `max_steps`, returning the number of steps executed.
    pub fn try_run(&mut self, world: &mut World, max_steps: usize) -> Result<usize, SimulationError> {
        run_until_empty(world, &mut self.schedule, max_steps, &mut self.log)
    }

    /// Drive the simulation until the event queue is empty.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.try_run(world, usize::MAX).expect("simulation run")
    }

    /// Drive the simulation to completion, calling `hook` after every step.
    pub fn run_full_with_hook<F>(&mut self, world: &mut World, hook: F) -> usize
    where
        F: FnMut(&World, &Event),
    {
        run_until_empty_with_hook(world, &mut self.schedule, usize::MAX, &mut self.log, hook)
            .expect("simulation run")
    }

    /// Drive the simulation to completion and return `(timestamp, kind)` per step.
    pub fn run_recording_order(&mut self, world: &mut World) -> Vec<(u64, EventKind)> {
        let mut order = Vec::new();
        self.run_full_with_hook(world, |_, event| order.push((event.timestamp, event.kind)));
        order
    }
}
