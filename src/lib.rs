//! Decides, once per planning cycle, whether an autonomous vehicle may keep driving along
//! the path it planned last cycle instead of planning a new one.
//!
//! A [PathReuseDecider] is fed a [PlanningCycle] each cycle. Reuse is gated by a hysteresis
//! on how long a static obstacle has blocked the road, and the previous path is validated
//! against the current obstacles before it is trimmed to start at the vehicle.

pub use cgmath;
pub use collision::CollisionChecker;
pub use config::{ConfigError, ReuseConfig, ReuseCriterion};
pub use decider::{PathReuseDecider, PlanningCycle, ReuseOutcome};
pub use frame::{ProjectionError, ReferenceFrame, ReferenceLine, SlBoundary, SlPoint};
pub use gate::{BlockingObstacleState, ReuseAction, ReuseGate, ReuseGateState};
pub use history::{FrameHistory, HistoryFrame, HistoryStore};
pub use obstacle::{Obstacle, ObstacleId, ObstacleSet, StopDecision};
pub use path::{DiscretizedPath, PathPoint};
pub use trim::{trim_history_path, TrimError};
pub use util::Interval;
pub use vehicle::{Footprint, VehicleParams, VehicleState};

mod collision;
mod config;
pub mod criteria;
mod debug;
mod decider;
mod frame;
pub mod gate;
mod history;
pub mod math;
mod obstacle;
mod path;
mod trim;
mod util;
mod vehicle;

#[cfg(feature = "debug")]
pub use debug::take_debug_frame;
