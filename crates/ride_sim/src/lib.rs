pub mod clock;
pub mod dispatcher;
pub mod ecs;
pub mod error;
pub mod input;
pub mod location;
pub mod monitor;
pub mod profiling;
pub mod queue;
pub mod ride;
pub mod runner;
pub mod scenario;
pub mod systems;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
