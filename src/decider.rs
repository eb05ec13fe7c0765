use crate::collision::CollisionChecker;
use crate::config::{ReuseConfig, ReuseCriterion};
use crate::criteria::{is_same_obstacles, is_same_stop_obstacles};
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::frame::ReferenceFrame;
use crate::gate::{
    is_ignored_blocking_obstacle, BlockingObstacleState, ReuseAction, ReuseGate, ReuseGateState,
};
use crate::history::HistoryStore;
use crate::obstacle::ObstacleSet;
use crate::path::DiscretizedPath;
use crate::trim::{trim_history_path, TrimError};
use crate::vehicle::{Footprint, VehicleState};
use log::{debug, error};

/// Everything the decider reads during one planning cycle.
#[derive(Clone, Copy)]
pub struct PlanningCycle<'a> {
    /// The curvilinear frame of the current reference line.
    /// Must be present; a cycle without one always falls back to full planning.
    pub reference_frame: Option<&'a dyn ReferenceFrame>,
    /// The state of the ego vehicle.
    pub vehicle: VehicleState,
    /// The shape of the ego vehicle.
    pub footprint: &'a dyn Footprint,
    /// The obstacles perceived this cycle.
    pub obstacles: &'a ObstacleSet,
    /// The blocking obstacle status, maintained upstream.
    pub blocking: &'a BlockingObstacleState,
    /// The results of previous cycles.
    pub history: &'a dyn HistoryStore,
}

/// The result of one planning cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ReuseOutcome {
    /// The previous path, trimmed to start at the vehicle, is this cycle's path.
    Reuse(DiscretizedPath),
    /// A new path must be planned from scratch.
    FullPlanning,
}

impl ReuseOutcome {
    /// Whether the previous path was reused.
    pub fn is_reuse(&self) -> bool {
        matches!(self, ReuseOutcome::Reuse(_))
    }
}

/// Decides, cycle after cycle, whether the previously planned path can be reused.
///
/// One decider should be kept per planning session.
pub struct PathReuseDecider {
    /// The configuration.
    config: ReuseConfig,
    /// The reuse gate.
    gate: ReuseGate,
    /// The gate state carried between cycles.
    state: ReuseGateState,
    /// The number of cycles processed.
    total_path_counter: usize,
    /// The number of cycles in which the previous path was reused.
    reusable_path_counter: usize,
    /// Debugging information from the previous cycle.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl PathReuseDecider {
    /// Creates a new decider, which will not reuse a path until the gate first enables it.
    pub fn new(config: ReuseConfig) -> Self {
        Self {
            gate: ReuseGate::new(&config),
            config,
            state: ReuseGateState::default(),
            total_path_counter: 0,
            reusable_path_counter: 0,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Gets the gate state, as left by the most recent cycle.
    pub fn state(&self) -> ReuseGateState {
        self.state
    }

    /// The number of cycles processed.
    pub fn total_path_count(&self) -> usize {
        self.total_path_counter
    }

    /// The number of cycles in which the previous path was reused.
    pub fn reusable_path_count(&self) -> usize {
        self.reusable_path_counter
    }

    /// Gets the debugging information for the previous cycle as a JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Runs the decider for one planning cycle.
    pub fn process(&mut self, cycle: &PlanningCycle) -> ReuseOutcome {
        self.total_path_counter += 1;
        let outcome = self.process_inner(cycle);
        if outcome.is_reuse() {
            self.reusable_path_counter += 1;
        }
        debug!(
            "Reused {} of {} paths",
            self.reusable_path_counter, self.total_path_counter
        );

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        outcome
    }

    fn process_inner(&mut self, cycle: &PlanningCycle) -> ReuseOutcome {
        let Some(frame) = cycle.reference_frame else {
            error!("No reference line for this planning cycle");
            return ReuseOutcome::FullPlanning;
        };
        let position = cycle.vehicle.position;
        let adc_s = frame.xy_to_sl(position).map(|sl| sl.s).ok();
        let history = cycle.history.latest();

        let validate = || match self.config.criterion {
            ReuseCriterion::CollisionFree => self.is_collision_free(cycle, frame),
            ReuseCriterion::CollisionFreeAndSameStop => {
                self.is_collision_free(cycle, frame) && self.is_same_stop(cycle, frame, adc_s)
            }
            ReuseCriterion::SameStopObstacles => self.is_same_stop(cycle, frame, adc_s),
            ReuseCriterion::SameObstacles => is_same_obstacles(history, cycle.obstacles),
        };
        let is_ignored_blocking = || match adc_s {
            Some(adc_s) => is_ignored_blocking_obstacle(
                cycle.blocking,
                cycle.obstacles,
                adc_s,
                cycle.vehicle.speed,
                &self.config,
            ),
            None => false,
        };

        let (state, action) =
            self.gate
                .decide(self.state, cycle.blocking, validate, is_ignored_blocking);
        self.state = state;

        match action {
            ReuseAction::ReuseAndTrim => {
                let result = history
                    .ok_or(TrimError::EmptyPath)
                    .and_then(|prev| trim_history_path(&prev.planned_path, frame, position));
                match result {
                    Ok(path) => ReuseOutcome::Reuse(path),
                    Err(err) => {
                        error!("Failed to trim the previous path: {err}");
                        ReuseOutcome::FullPlanning
                    }
                }
            }
            ReuseAction::ReuseDisabled | ReuseAction::FallbackToFullPlanning => {
                ReuseOutcome::FullPlanning
            }
        }
    }

    fn is_collision_free(&self, cycle: &PlanningCycle, frame: &dyn ReferenceFrame) -> bool {
        let checker = CollisionChecker::new(&self.config, frame, cycle.footprint);
        let path = cycle.history.latest().map(|prev| &prev.planned_path);
        checker.is_collision_free(path, cycle.obstacles, cycle.vehicle.position)
    }

    fn is_same_stop(
        &self,
        cycle: &PlanningCycle,
        frame: &dyn ReferenceFrame,
        adc_s: Option<f64>,
    ) -> bool {
        let Some(adc_s) = adc_s else {
            return false;
        };
        is_same_stop_obstacles(
            cycle.history.latest(),
            cycle.obstacles,
            frame,
            adc_s,
            &self.config,
        )
    }
}
