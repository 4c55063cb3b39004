use super::self_loop::self_loop_path;
use super::{EdgePath, PathParams};
use crate::geometry::cubic::CubicBezier;
use crate::model::{Position, Vec2};

// Control point sits halfway to the other anchor, on the facing's axis only.
fn control_point(pos: Position, from: Vec2, to: Vec2) -> Vec2 {
    if pos.is_horizontal() {
        Vec2::new(0.5 * (from.x + to.x), from.y)
    } else {
        Vec2::new(from.x, 0.5 * (from.y + to.y))
    }
}

fn curve(p: &PathParams) -> CubicBezier {
    let (s, t) = (p.source(), p.target());
    CubicBezier::new(
        s,
        control_point(p.source_position, s, t),
        control_point(p.target_position, t, s),
        t,
    )
}

pub fn simple_bezier_path(params: &PathParams) -> EdgePath {
    let p = params.sanitized();
    if p.anchors_coincide() {
        return self_loop_path(p.source_x, p.source_y, p.source_position);
    }
    let c = curve(&p);
    let label = c.midpoint();
    EdgePath {
        path: c.to_path(),
        label_x: label.x,
        label_y: label.y,
    }
}

pub fn simple_bezier_center(params: &PathParams) -> (f32, f32, f32, f32) {
    let p = params.sanitized();
    let path = simple_bezier_path(&p);
    (
        path.label_x,
        path.label_y,
        (path.label_x - p.source_x).abs(),
        (path.label_y - p.source_y).abs(),
    )
}
