//! Alternative tests of whether the world has changed enough to invalidate a previous path.

use crate::config::ReuseConfig;
use crate::frame::{ProjectionError, ReferenceFrame};
use crate::history::HistoryFrame;
use crate::obstacle::{ObstacleSet, StopDecision};
use itertools::Itertools;
use log::debug;

/// Slack when comparing stop positions against their tolerances, in m.
const STOP_S_EPSILON: f64 = 1e-9;

/// Whether a stop position has stayed put between cycles.
///
/// The current stop may be slightly further away than before, or very slightly closer.
pub fn same_stop_s(history_stop_s: f64, current_stop_s: f64, config: &ReuseConfig) -> bool {
    let further = current_stop_s - history_stop_s;
    (further >= 0.0 && further <= config.stop_s_further_tolerance + STOP_S_EPSILON)
        || (further <= 0.0 && -further <= config.stop_s_closer_tolerance + STOP_S_EPSILON)
}

/// The sorted start positions of the obstacles which block the lane.
pub fn current_stop_obstacle_s(obstacles: &ObstacleSet) -> Vec<f64> {
    obstacles
        .iter()
        .filter(|obstacle| obstacle.is_lane_blocking)
        .map(|obstacle| obstacle.sl_boundary.start_s)
        .sorted_by(f64::total_cmp)
        .collect()
}

/// The sorted stop positions of previous stop decisions, measured along the current
/// reference line.
pub fn history_stop_s<'a>(
    frame: &dyn ReferenceFrame,
    decisions: impl IntoIterator<Item = &'a StopDecision>,
) -> Result<Vec<f64>, ProjectionError> {
    let mut stops = decisions
        .into_iter()
        .map(|decision| Ok(frame.xy_to_sl(decision.stop_point)?.s - decision.distance_s))
        .collect::<Result<Vec<_>, ProjectionError>>()?;
    stops.sort_by(f64::total_cmp);
    Ok(stops)
}

/// The first sorted stop position at or ahead of the vehicle, or `default` if there is none.
pub fn nearest_stop_s(sorted_stops: &[f64], adc_s: f64, default: f64) -> f64 {
    sorted_stops
        .iter()
        .copied()
        .find(|s| *s >= adc_s)
        .unwrap_or(default)
}

/// Whether the nearest stop ahead of the vehicle is where it was last cycle.
///
/// Always false without a previous cycle, or if a stop position cannot be projected.
pub fn is_same_stop_obstacles(
    history: Option<&HistoryFrame>,
    obstacles: &ObstacleSet,
    frame: &dyn ReferenceFrame,
    adc_s: f64,
    config: &ReuseConfig,
) -> bool {
    let Some(history) = history else {
        return false;
    };
    let history_stops = match history_stop_s(frame, history.stop_decisions()) {
        Ok(stops) => stops,
        Err(err) => {
            debug!("Failed to project a previous stop position: {err}");
            return false;
        }
    };
    let current_stops = current_stop_obstacle_s(obstacles);

    let default = config.default_front_clear_distance;
    let history_stop = nearest_stop_s(&history_stops, adc_s, default);
    let current_stop = nearest_stop_s(&current_stops, adc_s, default);
    debug!("Nearest stop was {history_stop:.2}, is now {current_stop:.2}");
    same_stop_s(history_stop, current_stop, config)
}

/// Whether the obstacles are the same as last cycle, with the same classification.
///
/// Always false without a previous cycle.
pub fn is_same_obstacles(history: Option<&HistoryFrame>, obstacles: &ObstacleSet) -> bool {
    let Some(history) = history else {
        return false;
    };
    if history.obstacles.len() != obstacles.len() {
        return false;
    }
    obstacles.iter().all(|obstacle| {
        history.obstacles.get(&obstacle.id).map_or(false, |previous| {
            previous.is_static == obstacle.is_static
                && previous.is_lane_blocking == obstacle.is_lane_blocking
        })
    })
}
