use super::EdgePath;
use crate::geometry::cubic::CubicBezier;
use crate::geometry::tolerance::SELF_LOOP_SIZE;
use crate::model::{Position, Vec2};

/// Teardrop loop leaving `(x, y)` along `facing` and returning to it.
///
/// Used by every style when both anchors coincide, where the regular
/// construction would collapse into a zero-length path.
pub fn self_loop_path(x: f32, y: f32, facing: Position) -> EdgePath {
    let d = facing.direction();
    let n = Vec2::new(-d.y, d.x);
    let s = SELF_LOOP_SIZE;
    let p = Vec2::new(x, y);
    let curve = CubicBezier::new(
        p,
        Vec2::new(x + d.x * s + n.x * s, y + d.y * s + n.y * s),
        Vec2::new(x + d.x * s - n.x * s, y + d.y * s - n.y * s),
        p,
    );
    let label = curve.midpoint();
    EdgePath {
        path: curve.to_path(),
        label_x: label.x,
        label_y: label.y,
    }
}
