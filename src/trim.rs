//! Re-anchors a previously planned path to the vehicle's current position.

use crate::frame::{ProjectionError, ReferenceFrame};
use crate::math::Point2d;
use crate::path::DiscretizedPath;
use thiserror::Error;

/// The reason a path could not be trimmed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TrimError {
    #[error("there is no previous path to trim")]
    EmptyPath,
    #[error("the vehicle has already driven past all {count} path points")]
    FullyTraversed { count: usize },
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Drops the points of `path` that the vehicle at `adc_position` has already passed,
/// and rebases the arc length of the rest so it is measured from the last passed point.
///
/// The first remaining point is also prepended to the result with its original arc
/// length, giving downstream stitching a reference point at the join.
pub fn trim_history_path(
    path: &DiscretizedPath,
    frame: &dyn ReferenceFrame,
    adc_position: Point2d,
) -> Result<DiscretizedPath, TrimError> {
    if path.is_empty() {
        return Err(TrimError::EmptyPath);
    }
    let adc_s = frame.xy_to_sl(adc_position)?.s;

    let mut path_start_s = 0.0;
    let mut path_start_index = 0;
    for point in path.iter() {
        if frame.xy_to_sl(point.pos)?.s >= adc_s {
            break;
        }
        path_start_s = point.s;
        path_start_index += 1;
    }

    let remaining = &path.points()[path_start_index..];
    let Some(anchor) = remaining.first().copied() else {
        return Err(TrimError::FullyTraversed { count: path.len() });
    };

    let rebased = remaining.iter().map(|point| {
        let mut point = *point;
        point.s -= path_start_s;
        point
    });
    Ok(std::iter::once(anchor).chain(rebased).collect())
}
