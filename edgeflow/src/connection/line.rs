//! Live preview line from the dragged handle to the pointer.

use crate::edges::handles::{normalize_handle_id, resolve_handle};
use crate::edges::positions::handle_anchor;
use crate::model::{
    ConnectionDrag, ConnectionLineType, ConnectionMode, HandleBounds, HandleKind, NodeInternals, Position, Vec2,
};
use crate::paths::{bezier_path, simple_bezier_path, smooth_step_path, step_path, straight_path};
use crate::paths::{EdgePath, PathParams, StepOptions};
use crate::store::FlowStore;
use crate::svg::escape_attr;

/// Everything a connection line component needs for one frame.
#[derive(Clone, Debug)]
pub struct ConnectionLineProps<'a> {
    pub drag: &'a ConnectionDrag,
    pub from_node: &'a NodeInternals,
    pub from_handle: Option<&'a HandleBounds>,
    /// Source side is the originating handle, target side is the pointer in
    /// flow coordinates.
    pub params: PathParams,
    pub line_type: ConnectionLineType,
    pub style: Option<&'a str>,
}

/// Replaces the built-in connection line markup.
pub trait ConnectionLineComponent {
    fn render(&self, props: &ConnectionLineProps<'_>) -> String;
}

/// Side of a point at `from` that faces `toward`, by the dominant axis.
pub fn facing_toward(from: Vec2, toward: Vec2) -> Position {
    let (dx, dy) = (toward.x - from.x, toward.y - from.y);
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            Position::Right
        } else {
            Position::Left
        }
    } else if dy >= 0.0 {
        Position::Bottom
    } else {
        Position::Top
    }
}

fn originating_handle<'a>(node: &'a NodeInternals, drag: &ConnectionDrag, mode: ConnectionMode) -> Option<&'a HandleBounds> {
    let bounds = node.handle_bounds.as_ref()?;
    let id = normalize_handle_id(drag.handle_id.as_deref());
    let found = resolve_handle(Some(bounds.of_kind(drag.handle_kind)), id);
    match (found, mode) {
        (None, ConnectionMode::Loose) => resolve_handle(Some(bounds.of_kind(drag.handle_kind.opposite())), id),
        _ => found,
    }
}

/// Geometry of the preview line for `drag`. None when the originating node
/// is gone.
pub fn connection_line_props<'a>(store: &'a FlowStore, drag: &'a ConnectionDrag) -> Option<ConnectionLineProps<'a>> {
    let node = store.node(&drag.node_id)?;
    let config = store.config();
    let handle = originating_handle(node, drag, config.connection_mode);

    let (from, from_position) = match handle {
        Some(h) => (handle_anchor(&node.rect(), Some(h), h.position), h.position),
        None => {
            let facing = Position::default_for(HandleKind::Source);
            (handle_anchor(&node.rect(), None, facing), facing)
        }
    };
    let to = store.viewport().to_flow(drag.pointer);

    Some(ConnectionLineProps {
        drag,
        from_node: node,
        from_handle: handle,
        params: PathParams::new(from.x, from.y, from_position, to.x, to.y, facing_toward(to, from)),
        line_type: config.connection_line_type,
        style: config.connection_line_style.as_deref(),
    })
}

pub fn connection_path(params: &PathParams, line_type: ConnectionLineType) -> EdgePath {
    match line_type {
        ConnectionLineType::Bezier => bezier_path(params, None),
        ConnectionLineType::SimpleBezier => simple_bezier_path(params),
        ConnectionLineType::Step => step_path(params, &StepOptions::default()),
        ConnectionLineType::SmoothStep => smooth_step_path(params, &StepOptions::default()),
        ConnectionLineType::Straight => straight_path(params),
    }
}

fn default_markup(props: &ConnectionLineProps<'_>) -> String {
    let path = connection_path(&props.params, props.line_type);
    let style = props
        .style
        .map(|s| format!(" style=\"{}\"", escape_attr(s)))
        .unwrap_or_default();
    format!(
        "<g class=\"edgeflow__connection\"><path class=\"edgeflow__connection-path\" fill=\"none\" d=\"{}\"{}/></g>",
        path.path, style
    )
}

/// Markup for the active drag, if any. Nothing is drawn while nodes are not
/// connectable.
pub fn render_connection_line(store: &FlowStore, custom: Option<&dyn ConnectionLineComponent>) -> Option<String> {
    if !store.config().nodes_connectable {
        return None;
    }
    let drag = store.connection_drag()?;
    let Some(props) = connection_line_props(store, drag) else {
        log::trace!("connection line skipped: node {} not found", drag.node_id);
        return None;
    };
    Some(match custom {
        Some(c) => c.render(&props),
        None => default_markup(&props),
    })
}
