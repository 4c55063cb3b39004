use crate::model::{HandleBounds, Position, Rect, Vec2};
use crate::paths::PathParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeAnchors {
    pub source_x: f32,
    pub source_y: f32,
    pub target_x: f32,
    pub target_y: f32,
}

impl EdgeAnchors {
    pub fn with_positions(self, source_position: Position, target_position: Position) -> PathParams {
        PathParams::new(
            self.source_x,
            self.source_y,
            source_position,
            self.target_x,
            self.target_y,
            target_position,
        )
    }
}

/// Absolute anchor of one edge end.
///
/// With a handle the anchor is the center of the handle glyph. Without one
/// it is the midpoint of the node side named by `position`.
pub fn handle_anchor(rect: &Rect, handle: Option<&HandleBounds>, position: Position) -> Vec2 {
    match handle {
        Some(h) => Vec2::new(rect.x + h.x + h.width / 2.0, rect.y + h.y + h.height / 2.0),
        None => match position {
            Position::Top => Vec2::new(rect.x + rect.width / 2.0, rect.y),
            Position::Right => Vec2::new(rect.x + rect.width, rect.y + rect.height / 2.0),
            Position::Bottom => Vec2::new(rect.x + rect.width / 2.0, rect.y + rect.height),
            Position::Left => Vec2::new(rect.x, rect.y + rect.height / 2.0),
        },
    }
}

pub fn edge_positions(
    source_rect: &Rect,
    source_handle: Option<&HandleBounds>,
    source_position: Position,
    target_rect: &Rect,
    target_handle: Option<&HandleBounds>,
    target_position: Position,
) -> EdgeAnchors {
    let s = handle_anchor(source_rect, source_handle, source_position);
    let t = handle_anchor(target_rect, target_handle, target_position);
    EdgeAnchors {
        source_x: s.x,
        source_y: s.y,
        target_x: t.x,
        target_y: t.y,
    }
}
