//! Tunable parameters of the path reuse decider.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which test a previous path must pass before it is reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseCriterion {
    /// The previous path does not collide with any current static obstacle.
    #[default]
    CollisionFree,
    /// The path is collision free and the nearest stop position has not moved.
    CollisionFreeAndSameStop,
    /// The nearest stop position has not moved.
    SameStopObstacles,
    /// The set of obstacles and their classification has not changed.
    SameObstacles,
}

/// An invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// The parameters of the path reuse decider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReuseConfig {
    /// Whether path reuse is attempted at all.
    pub reuse_path: bool,
    /// The test a previous path must pass to be reused.
    pub criterion: ReuseCriterion,
    /// How far behind the vehicle obstacles and path points are still considered, in m.
    pub s_buffer: f64,
    /// Obstacles with a smaller curvilinear area are ignored, in m<sup>2</sup>.
    pub min_obstacle_area: f64,
    /// The number of path bound points reserved at the tail of a path.
    pub num_extra_tail_bound_points: u32,
    /// The spacing of path bound points, in m.
    pub path_bounds_resolution: f64,
    /// Reuse is re-enabled once the blocking obstacle counter drops below this value.
    pub wait_cycles: i32,
    /// The minimum distance at which a blocking obstacle is ignored, in m.
    pub blocking_s_buffer: f64,
    /// The minimum time headway at which a blocking obstacle is ignored, in s.
    pub blocking_time_buffer: f64,
    /// How much further away a stop position may move and still count as the same, in m.
    pub stop_s_further_tolerance: f64,
    /// How much closer a stop position may move and still count as the same, in m.
    pub stop_s_closer_tolerance: f64,
    /// The stop position assumed when there is nothing to stop for, in m.
    pub default_front_clear_distance: f64,
}

impl Default for ReuseConfig {
    fn default() -> Self {
        Self {
            reuse_path: true,
            criterion: ReuseCriterion::CollisionFree,
            s_buffer: 0.5,
            min_obstacle_area: 1e-4,
            num_extra_tail_bound_points: 20,
            path_bounds_resolution: 0.5,
            wait_cycles: -2,
            blocking_s_buffer: 30.0,
            blocking_time_buffer: 3.0,
            stop_s_further_tolerance: 0.5,
            stop_s_closer_tolerance: 0.1,
            default_front_clear_distance: 300.0,
        }
    }
}

impl ReuseConfig {
    /// Parses and validates a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is within its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("s_buffer", self.s_buffer),
            ("min_obstacle_area", self.min_obstacle_area),
            ("path_bounds_resolution", self.path_bounds_resolution),
            ("blocking_s_buffer", self.blocking_s_buffer),
            ("blocking_time_buffer", self.blocking_time_buffer),
            ("stop_s_further_tolerance", self.stop_s_further_tolerance),
            ("stop_s_closer_tolerance", self.stop_s_closer_tolerance),
        ];
        if let Some(&(field, _)) = non_negative
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(ConfigError::Invalid {
                field,
                reason: "must be finite and non-negative",
            });
        }
        if self.wait_cycles >= 0 {
            return Err(ConfigError::Invalid {
                field: "wait_cycles",
                reason: "must be negative",
            });
        }
        Ok(())
    }

    /// The length of the path tail which is not checked for collisions, in m.
    pub fn tail_reserve(&self) -> f64 {
        self.num_extra_tail_bound_points as f64 * self.path_bounds_resolution
    }
}
