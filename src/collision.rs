//! Checks a previously planned path against the current static obstacles.

use crate::config::ReuseConfig;
use crate::debug::{debug_point, debug_polygon};
use crate::frame::{ProjectionError, ReferenceFrame};
use crate::math::{Point2d, Polygon2d};
use crate::obstacle::{Obstacle, ObstacleSet};
use crate::path::DiscretizedPath;
use crate::vehicle::Footprint;
use log::{debug, error};

/// Sweeps the vehicle's footprint along a path and tests it against obstacles,
/// with all geometry compared in the curvilinear frame.
pub struct CollisionChecker<'a> {
    config: &'a ReuseConfig,
    frame: &'a dyn ReferenceFrame,
    footprint: &'a dyn Footprint,
}

impl<'a> CollisionChecker<'a> {
    pub fn new(
        config: &'a ReuseConfig,
        frame: &'a dyn ReferenceFrame,
        footprint: &'a dyn Footprint,
    ) -> Self {
        Self {
            config,
            frame,
            footprint,
        }
    }

    /// Determines whether the vehicle can drive along `path` without touching any of the
    /// current static obstacles.
    ///
    /// Any failure to project a point onto the reference line counts as a collision,
    /// as does a missing path when there are obstacles to avoid.
    pub fn is_collision_free(
        &self,
        path: Option<&DiscretizedPath>,
        obstacles: &ObstacleSet,
        adc_position: Point2d,
    ) -> bool {
        match self.check(path, obstacles, adc_position) {
            Ok(collision_free) => collision_free,
            Err(err) => {
                error!("Failed to get the projection from point onto reference line: {err}");
                false
            }
        }
    }

    /// Builds the curvilinear polygons of the obstacles the path must avoid.
    ///
    /// Moving and virtual obstacles are skipped, as are obstacles which end behind
    /// the vehicle and obstacles too small to be real.
    pub fn obstacle_polygons(&self, obstacles: &ObstacleSet, adc_s: f64) -> Vec<Polygon2d> {
        obstacles
            .iter()
            .filter(|obstacle| self.is_relevant(obstacle, adc_s))
            .map(|obstacle| obstacle.sl_boundary.to_polygon())
            .collect()
    }

    fn is_relevant(&self, obstacle: &Obstacle, adc_s: f64) -> bool {
        if !obstacle.is_static {
            debug!("Skipping dynamic obstacle {}", obstacle.id);
            return false;
        }
        if obstacle.is_virtual {
            debug!("Skipping virtual obstacle {}", obstacle.id);
            return false;
        }
        let boundary = &obstacle.sl_boundary;
        boundary.end_s >= adc_s - self.config.s_buffer
            && boundary.area() >= self.config.min_obstacle_area
    }

    fn check(
        &self,
        path: Option<&DiscretizedPath>,
        obstacles: &ObstacleSet,
        adc_position: Point2d,
    ) -> Result<bool, ProjectionError> {
        let adc_s = self.frame.xy_to_sl(adc_position)?.s;

        let polygons = self.obstacle_polygons(obstacles, adc_s);
        if polygons.is_empty() {
            return Ok(true);
        }
        for polygon in &polygons {
            debug_polygon("obstacle", polygon.points());
        }

        let Some((path, last)) = path.and_then(|path| Some((path, path.last()?))) else {
            debug!("No previous path to check against {} obstacles", polygons.len());
            return Ok(false);
        };
        let path_end_s = self.frame.xy_to_sl(last.pos)?.s;
        let tail_reserve = self.config.tail_reserve();
        let min_s = adc_s - self.config.s_buffer;

        for point in path.iter() {
            let point_s = self.frame.xy_to_sl(point.pos)?.s;
            if path_end_s - point_s < tail_reserve {
                break;
            }
            if point_s < min_s {
                continue;
            }
            for corner in self.footprint.corners(point) {
                let corner_sl = self.frame.xy_to_sl(corner)?;
                let corner_sl = corner_sl.as_plane_point();
                if polygons.iter().any(|polygon| polygon.contains_point(corner_sl)) {
                    debug!(
                        "Collision at (s, l) = ({:.2}, {:.2}), {:.2} m from the path end",
                        corner_sl.x,
                        corner_sl.y,
                        path_end_s - point_s
                    );
                    debug_point("collision", corner_sl);
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}
