use super::self_loop::self_loop_path;
use super::{EdgePath, PathParams};
use crate::geometry::cubic::CubicBezier;
use crate::geometry::limits::{clamp_coord, clamp_curvature};
use crate::model::{Position, Vec2};

pub const DEFAULT_CURVATURE: f32 = 0.25;

fn control_point(pos: Position, anchor: Vec2, offset: f32) -> Vec2 {
    let d = pos.direction();
    Vec2::new(anchor.x + d.x * offset, anchor.y + d.y * offset)
}

/// Control points pushed out along each facing by `curvature * distance`.
fn curve(p: &PathParams, curvature: Option<f32>) -> CubicBezier {
    let c = clamp_curvature(curvature.unwrap_or(DEFAULT_CURVATURE), DEFAULT_CURVATURE);
    let (s, t) = (p.source(), p.target());
    let offset = clamp_coord(c * s.distance(t));
    CubicBezier::new(
        s,
        control_point(p.source_position, s, offset),
        control_point(p.target_position, t, offset),
        t,
    )
}

pub fn bezier_path(params: &PathParams, curvature: Option<f32>) -> EdgePath {
    let p = params.sanitized();
    if p.anchors_coincide() {
        return self_loop_path(p.source_x, p.source_y, p.source_position);
    }
    let c = curve(&p, curvature);
    let label = c.midpoint();
    EdgePath {
        path: c.to_path(),
        label_x: label.x,
        label_y: label.y,
    }
}

/// Label point (curve at t = 0.5) and its offset from the source anchor.
pub fn bezier_center(params: &PathParams, curvature: Option<f32>) -> (f32, f32, f32, f32) {
    let p = params.sanitized();
    let path = bezier_path(&p, curvature);
    (
        path.label_x,
        path.label_y,
        (path.label_x - p.source_x).abs(),
        (path.label_y - p.source_y).abs(),
    )
}
