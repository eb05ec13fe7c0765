use crate::math::{heading_vector, rot90, Point2d};
use crate::path::PathPoint;
use serde::{Deserialize, Serialize};

/// The state of the ego vehicle at the start of a planning cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// The world space position of the vehicle's reference point, in m.
    pub position: Point2d,
    /// The heading, in radians anti-clockwise from the x-axis.
    pub heading: f64,
    /// The vehicle's speed in m/s.
    pub speed: f64,
}

impl VehicleState {
    pub fn new(position: Point2d, heading: f64, speed: f64) -> Self {
        Self {
            position,
            heading,
            speed,
        }
    }
}

/// Maps a pose along a path to the space the vehicle occupies there.
pub trait Footprint {
    /// The four corners of the vehicle's bounding box when placed at `pose`.
    fn corners(&self, pose: &PathPoint) -> [Point2d; 4];
}

/// The dimensions of a rectangular vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
    /// Distance from the rear edge of the vehicle to its reference point, in m.
    pub back_edge_to_center: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            length: 4.933,
            width: 2.11,
            back_edge_to_center: 1.043,
        }
    }
}

impl Footprint for VehicleParams {
    fn corners(&self, pose: &PathPoint) -> [Point2d; 4] {
        let dir = heading_vector(pose.theta);
        let perp = rot90(dir);
        let half_wid = 0.5 * self.width;
        let front = self.length - self.back_edge_to_center;
        let rear = -self.back_edge_to_center;
        [
            pose.pos + dir * front + perp * half_wid,
            pose.pos + dir * rear + perp * half_wid,
            pose.pos + dir * rear - perp * half_wid,
            pose.pos + dir * front - perp * half_wid,
        ]
    }
}

impl<T: Footprint + ?Sized> Footprint for &T {
    fn corners(&self, pose: &PathPoint) -> [Point2d; 4] {
        (**self).corners(pose)
    }
}
