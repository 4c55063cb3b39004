use super::self_loop::self_loop_path;
use super::{EdgePath, PathParams};
use crate::svg::PathData;

/// Direct segment; the label sits on its midpoint.
pub fn straight_path(params: &PathParams) -> EdgePath {
    let p = params.sanitized();
    if p.anchors_coincide() {
        return self_loop_path(p.source_x, p.source_y, p.source_position);
    }
    let mut d = PathData::new();
    d.move_to(p.source());
    d.line_to(p.target());
    EdgePath {
        path: d.finish(),
        label_x: (p.source_x + p.target_x) * 0.5,
        label_y: (p.source_y + p.target_y) * 0.5,
    }
}
