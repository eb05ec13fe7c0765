//! The hysteresis gate that decides, cycle to cycle, whether path reuse is permitted.

use crate::config::ReuseConfig;
use crate::obstacle::{ObstacleId, ObstacleSet};
use log::debug;
use serde::{Deserialize, Serialize};

/// The largest magnitude the blocking obstacle counter reaches.
pub const COUNTER_LIMIT: i32 = 10;

/// The gate's state, persisted from one cycle to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReuseGateState {
    /// Whether the previous path may be reused, subject to validation.
    pub reused_path: bool,
}

/// Tracks how long a static obstacle has blocked the road ahead.
///
/// Maintained by the stage which detects blocking obstacles; the gate only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingObstacleState {
    /// The obstacle currently blocking the vehicle, if any.
    pub front_static_obstacle_id: Option<ObstacleId>,
    /// Positive while an obstacle has blocked the vehicle for that many consecutive cycles,
    /// negative while nothing has blocked it for that many consecutive cycles.
    pub cycle_counter: i32,
}

impl BlockingObstacleState {
    /// Records whether an obstacle blocked the vehicle during the latest cycle.
    pub fn record_cycle(&mut self, blocking: Option<ObstacleId>) {
        self.cycle_counter = match blocking {
            Some(_) => self.cycle_counter.max(0) + 1,
            None => self.cycle_counter.min(0) - 1,
        }
        .clamp(-COUNTER_LIMIT, COUNTER_LIMIT);
        self.front_static_obstacle_id = blocking;
    }
}

/// What the pipeline should do with the previous path this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReuseAction {
    /// The previous path passed validation; trim it and use it.
    ReuseAndTrim,
    /// Reuse was not enabled at the start of the cycle, so nothing was validated.
    ReuseDisabled,
    /// The previous path was rejected, or reuse is switched off.
    FallbackToFullPlanning,
}

impl ReuseAction {
    /// Whether a new path must be generated this cycle.
    pub fn requires_full_planning(&self) -> bool {
        !matches!(self, ReuseAction::ReuseAndTrim)
    }
}

/// Decides whether to reuse the previous path, and whether to allow reuse next cycle.
#[derive(Clone, Copy, Debug)]
pub struct ReuseGate {
    enabled: bool,
    wait_cycles: i32,
}

impl ReuseGate {
    pub fn new(config: &ReuseConfig) -> Self {
        Self {
            enabled: config.reuse_path,
            wait_cycles: config.wait_cycles,
        }
    }

    /// Advances the gate by one cycle.
    ///
    /// # Parameters
    /// * `state` - The gate state carried over from the previous cycle.
    /// * `blocking` - The blocking obstacle status for this cycle.
    /// * `validate` - Checks whether the previous path is still safe to reuse.
    ///   Only called when reuse is currently enabled.
    /// * `is_ignored_blocking` - Checks whether the blocking obstacle is far enough away
    ///   to be ignored. Only called when reuse is disabled and the counter alone
    ///   does not re-enable it.
    pub fn decide(
        &self,
        state: ReuseGateState,
        blocking: &BlockingObstacleState,
        validate: impl FnOnce() -> bool,
        is_ignored_blocking: impl FnOnce() -> bool,
    ) -> (ReuseGateState, ReuseAction) {
        if !self.enabled {
            return (state, ReuseAction::FallbackToFullPlanning);
        }

        if state.reused_path {
            if validate() {
                (state, ReuseAction::ReuseAndTrim)
            } else {
                debug!("Previous path rejected, disabling path reuse");
                let state = ReuseGateState { reused_path: false };
                (state, ReuseAction::FallbackToFullPlanning)
            }
        } else {
            debug!("Blocking obstacle counter: {}", blocking.cycle_counter);
            let enable = blocking.cycle_counter < self.wait_cycles || is_ignored_blocking();
            if enable {
                debug!("Enabling path reuse from the next cycle");
            }
            let state = ReuseGateState {
                reused_path: enable,
            };
            (state, ReuseAction::ReuseDisabled)
        }
    }
}

/// The distance from the vehicle to the start of the blocking obstacle, in m.
///
/// Returns `None` when there is no blocking obstacle, or its ID does not match any
/// current obstacle.
pub fn blocking_obstacle_distance(
    blocking: &BlockingObstacleState,
    obstacles: &ObstacleSet,
    adc_s: f64,
) -> Option<f64> {
    let id = blocking.front_static_obstacle_id.as_ref()?;
    let obstacle = obstacles.get(id)?;
    Some(obstacle.sl_boundary.start_s - adc_s)
}

/// Whether the blocking obstacle is far enough ahead that it need not prevent path reuse.
///
/// The required distance grows with speed. A blocking obstacle which cannot be found is
/// never ignored.
pub fn is_ignored_blocking_obstacle(
    blocking: &BlockingObstacleState,
    obstacles: &ObstacleSet,
    adc_s: f64,
    speed: f64,
    config: &ReuseConfig,
) -> bool {
    let buffer = f64::max(config.blocking_s_buffer, config.blocking_time_buffer * speed);
    match blocking_obstacle_distance(blocking, obstacles, adc_s) {
        Some(distance) => {
            debug!("Blocking obstacle distance: {distance:.2}");
            distance > buffer
        }
        None => false,
    }
}
