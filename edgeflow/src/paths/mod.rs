//! Path kernels, one per edge style.
//!
//! Every kernel takes two anchors and their facing directions and returns
//! the SVG path data together with the point where the label belongs. They
//! hold no state and never produce non-finite numbers.

pub mod bezier;
pub mod self_loop;
pub mod simple_bezier;
pub mod smooth_step;
pub mod straight;

pub use bezier::{bezier_center, bezier_path, DEFAULT_CURVATURE};
pub use simple_bezier::{simple_bezier_center, simple_bezier_path};
pub use smooth_step::{smooth_step_path, step_path, StepOptions};
pub use straight::straight_path;

use crate::geometry::limits::clamp_coord;
use crate::geometry::tolerance::{approx_eq, EPS_POS};
use crate::model::{Position, Vec2};

/// Anchors and facings of one edge. Also the resolved geometry handed to
/// edge components each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathParams {
    pub source_x: f32,
    pub source_y: f32,
    pub source_position: Position,
    pub target_x: f32,
    pub target_y: f32,
    pub target_position: Position,
}

impl PathParams {
    pub fn new(
        source_x: f32,
        source_y: f32,
        source_position: Position,
        target_x: f32,
        target_y: f32,
        target_position: Position,
    ) -> Self {
        PathParams {
            source_x,
            source_y,
            source_position,
            target_x,
            target_y,
            target_position,
        }
    }

    pub fn source(&self) -> Vec2 {
        Vec2::new(self.source_x, self.source_y)
    }

    pub fn target(&self) -> Vec2 {
        Vec2::new(self.target_x, self.target_y)
    }

    /// Copy with every coordinate finite and inside the coordinate bounds.
    pub(crate) fn sanitized(&self) -> PathParams {
        PathParams {
            source_x: clamp_coord(self.source_x),
            source_y: clamp_coord(self.source_y),
            target_x: clamp_coord(self.target_x),
            target_y: clamp_coord(self.target_y),
            ..*self
        }
    }

    pub(crate) fn anchors_coincide(&self) -> bool {
        approx_eq(self.source_x, self.target_x, EPS_POS) && approx_eq(self.source_y, self.target_y, EPS_POS)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
    pub path: String,
    pub label_x: f32,
    pub label_y: f32,
}

/// Midpoint of the two anchors plus half the horizontal and vertical span.
pub fn edge_center(source_x: f32, source_y: f32, target_x: f32, target_y: f32) -> (f32, f32, f32, f32) {
    let x_offset = (target_x - source_x).abs() / 2.0;
    let center_x = if target_x < source_x { target_x + x_offset } else { target_x - x_offset };

    let y_offset = (target_y - source_y).abs() / 2.0;
    let center_y = if target_y < source_y { target_y + y_offset } else { target_y - y_offset };

    (center_x, center_y, x_offset, y_offset)
}
