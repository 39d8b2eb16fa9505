use bevy_ecs::prelude::{Resource, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cap on processed events for one run.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Default grid size for generated scenarios.
const DEFAULT_GRID_SIZE: i64 = 50;

/// Default window for generated rider requests (simulation minutes).
const DEFAULT_REQUEST_WINDOW: u64 = 240;

/// Simulation horizon. When set, the runner stops processing events once the
/// next event would be at or after this timestamp, and discards the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct SimulationEndTime(pub u64);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("max_steps must be positive")]
    ZeroMaxSteps,
}

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Optional horizon; events at or after it are never executed.
    pub horizon: Option<u64>,
    /// Upper bound on processed events.
    pub max_steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_horizon(mut self, horizon: u64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        Ok(())
    }

    /// Inserts (or removes) the horizon resource.
    pub fn apply(&self, world: &mut World) {
        match self.horizon {
            Some(horizon) => world.insert_resource(SimulationEndTime(horizon)),
            None => {
                world.remove_resource::<SimulationEndTime>();
            }
        }
    }
}

/// Parameters for generating a synthetic event list.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub num_riders: usize,
    pub num_drivers: usize,
    /// Random seed for reproducibility (optional; if None, uses entropy).
    pub seed: Option<u64>,
    /// Locations are sampled uniformly from `0..grid_rows` x `0..grid_cols`.
    pub grid_rows: i64,
    pub grid_cols: i64,
    /// Rider request times are uniform in `[0, request_window]`.
    pub request_window: u64,
    /// Driver first-request times are uniform in `[0, driver_spread]`.
    pub driver_spread: u64,
    pub min_patience: u64,
    pub max_patience: u64,
    pub min_speed: u64,
    pub max_speed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_riders: 100,
            num_drivers: 20,
            seed: None,
            grid_rows: DEFAULT_GRID_SIZE,
            grid_cols: DEFAULT_GRID_SIZE,
            request_window: DEFAULT_REQUEST_WINDOW,
            driver_spread: 0,
            min_patience: 5,
            max_patience: 30,
            min_speed: 1,
            max_speed: 5,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_request_window(mut self, minutes: u64) -> Self {
        self.request_window = minutes;
        self
    }

    pub fn with_driver_spread(mut self, minutes: u64) -> Self {
        self.driver_spread = minutes;
        self
    }

    pub fn with_grid(mut self, rows: i64, cols: i64) -> Self {
        self.grid_rows = rows;
        self.grid_cols = cols;
        self
    }

    pub fn with_patience_range(mut self, min: u64, max: u64) -> Self {
        self.min_patience = min;
        self.max_patience = max;
        self
    }

    /// Speeds below 1 are raised to 1.
    pub fn with_speed_range(mut self, min: u64, max: u64) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_apply_to_missing_fields() {
        let config = SimulationConfig::from_json_str(r#"{ "horizon": 60 }"#).expect("config");
        assert_eq!(config.horizon, Some(60));
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);

        let empty = SimulationConfig::from_json_str("{}").expect("config");
        assert_eq!(empty, SimulationConfig::default());
    }

    #[test]
    fn config_rejects_unknown_fields_and_zero_steps() {
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{ "horizn": 60 }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{ "max_steps": 0 }"#),
            Err(ConfigError::ZeroMaxSteps)
        ));
    }

    #[test]
    fn apply_inserts_and_removes_horizon() {
        let mut world = World::new();
        SimulationConfig::default().with_horizon(30).apply(&mut world);
        assert_eq!(
            world.get_resource::<SimulationEndTime>(),
            Some(&SimulationEndTime(30))
        );
        SimulationConfig::default().apply(&mut world);
        assert!(world.get_resource::<SimulationEndTime>().is_none());
    }
}
