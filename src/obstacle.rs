use crate::frame::SlBoundary;
use crate::math::Point2d;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique ID of an [Obstacle], stable across planning cycles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(String);

impl ObstacleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for ObstacleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decision to stop the vehicle before an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopDecision {
    /// The world space point at which the vehicle was told to stop.
    pub stop_point: Point2d,
    /// The distance between the obstacle and the stop point, in m.
    pub distance_s: f64,
}

/// A perceived object, as seen during one planning cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// The obstacle ID.
    pub id: ObstacleId,
    /// Whether the obstacle is not moving.
    pub is_static: bool,
    /// Whether the obstacle is a marker, such as a stop line, rather than a physical object.
    pub is_virtual: bool,
    /// Whether the obstacle obstructs the current driving lane.
    pub is_lane_blocking: bool,
    /// The extents of the obstacle in the curvilinear frame.
    pub sl_boundary: SlBoundary,
    /// The stop decision made for this obstacle, if there is one.
    #[serde(default)]
    pub stop: Option<StopDecision>,
}

impl Obstacle {
    /// Creates a static, physical obstacle which does not block the lane.
    pub fn new_static(id: impl Into<String>, sl_boundary: SlBoundary) -> Self {
        Self {
            id: ObstacleId::new(id),
            is_static: true,
            is_virtual: false,
            is_lane_blocking: false,
            sl_boundary,
            stop: None,
        }
    }

    /// Sets whether the obstacle blocks the driving lane.
    pub fn lane_blocking(mut self, blocking: bool) -> Self {
        self.is_lane_blocking = blocking;
        self
    }

    /// Attaches a stop decision to the obstacle.
    pub fn with_stop(mut self, stop: StopDecision) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// The obstacles of one planning cycle, in insertion order and indexed by ID.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
    index: HashMap<ObstacleId, usize>,
}

impl ObstacleSet {
    /// Creates an empty obstacle set.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an obstacle to the set, replacing any obstacle with the same ID.
    pub fn insert(&mut self, obstacle: Obstacle) {
        match self.index.get(&obstacle.id) {
            Some(idx) => self.obstacles[*idx] = obstacle,
            None => {
                self.index.insert(obstacle.id.clone(), self.obstacles.len());
                self.obstacles.push(obstacle);
            }
        }
    }

    /// Gets the obstacle with the given ID.
    pub fn get(&self, id: &ObstacleId) -> Option<&Obstacle> {
        self.index.get(id).map(|idx| &self.obstacles[*idx])
    }

    /// Returns an iterator over the obstacles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// The number of obstacles in the set.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl FromIterator<Obstacle> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        let mut set = Self::new();
        for obstacle in iter {
            set.insert(obstacle);
        }
        set
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let set: ObstacleSet = [
            Obstacle::new_static("a", SlBoundary::new(10.0, 12.0, -1.0, 1.0)),
            Obstacle::new_static("b", SlBoundary::new(20.0, 22.0, -1.0, 1.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&"b".into()).map(|o| o.sl_boundary.start_s), Some(20.0));
        assert!(set.get(&"c".into()).is_none());
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut set = ObstacleSet::new();
        set.insert(Obstacle::new_static("a", SlBoundary::new(10.0, 12.0, -1.0, 1.0)));
        set.insert(Obstacle::new_static("a", SlBoundary::new(15.0, 17.0, -1.0, 1.0)).lane_blocking(true));
        assert_eq!(set.len(), 1);
        let a = set.get(&"a".into()).unwrap();
        assert!(a.is_lane_blocking);
        assert_eq!(a.sl_boundary.start_s, 15.0);
    }
}
