use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Side of a node a handle protrudes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Right,
    Bottom,
    Left,
}

impl Position {
    /// Facing used when an endpoint has no measured handle.
    pub fn default_for(kind: HandleKind) -> Position {
        match kind {
            HandleKind::Source => Position::Bottom,
            HandleKind::Target => Position::Top,
        }
    }

    /// Unit vector pointing away from the node.
    pub fn direction(self) -> Vec2 {
        match self {
            Position::Top => Vec2::new(0.0, -1.0),
            Position::Right => Vec2::new(1.0, 0.0),
            Position::Bottom => Vec2::new(0.0, 1.0),
            Position::Left => Vec2::new(-1.0, 0.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Position::Left | Position::Right)
    }

    pub fn opposite(self) -> Position {
        match self {
            Position::Top => Position::Bottom,
            Position::Right => Position::Left,
            Position::Bottom => Position::Top,
            Position::Left => Position::Right,
        }
    }

    /// Mirror across the main diagonal (x <-> y).
    pub(crate) fn transposed(self) -> Position {
        match self {
            Position::Top => Position::Left,
            Position::Left => Position::Top,
            Position::Bottom => Position::Right,
            Position::Right => Position::Bottom,
        }
    }

    pub fn parse(s: &str) -> Option<Position> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Some(Position::Top),
            "right" => Some(Position::Right),
            "bottom" => Some(Position::Bottom),
            "left" => Some(Position::Left),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Source,
    Target,
}

impl HandleKind {
    pub fn opposite(self) -> HandleKind {
        match self {
            HandleKind::Source => HandleKind::Target,
            HandleKind::Target => HandleKind::Source,
        }
    }

    pub fn parse(s: &str) -> Option<HandleKind> {
        match s {
            "source" => Some(HandleKind::Source),
            "target" => Some(HandleKind::Target),
            _ => None,
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Source => f.write_str("source"),
            HandleKind::Target => f.write_str("target"),
        }
    }
}

/// Measured bounds of one handle, relative to its node's origin.
/// `id == None` marks the node's default handle of that kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandleBounds {
    #[serde(default)]
    pub id: Option<String>,
    pub position: Position,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HandleBounds {
    pub fn new(id: Option<&str>, position: Position, x: f32, y: f32, width: f32, height: f32) -> Self {
        HandleBounds {
            id: id.map(str::to_string),
            position,
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeHandleBounds {
    #[serde(default)]
    pub source: Vec<HandleBounds>,
    #[serde(default)]
    pub target: Vec<HandleBounds>,
}

impl NodeHandleBounds {
    pub fn of_kind(&self, kind: HandleKind) -> &[HandleBounds] {
        match kind {
            HandleKind::Source => &self.source,
            HandleKind::Target => &self.target,
        }
    }

    pub(crate) fn of_kind_mut(&mut self, kind: HandleKind) -> &mut Vec<HandleBounds> {
        match kind {
            HandleKind::Source => &mut self.source,
            HandleKind::Target => &mut self.target,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }
}

/// Store-side record of a mounted node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInternals {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub z: i32,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub dragging: bool,
    #[serde(default)]
    pub handle_bounds: Option<NodeHandleBounds>,
}

impl NodeInternals {
    pub fn new(id: impl Into<String>, x: f32, y: f32) -> Self {
        NodeInternals {
            id: id.into(),
            x,
            y,
            width: None,
            height: None,
            z: 0,
            selected: false,
            dragging: false,
            handle_bounds: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_handles(mut self, bounds: NodeHandleBounds) -> Self {
        self.handle_bounds = Some(bounds);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width.unwrap_or(0.0),
            height: self.height.unwrap_or(0.0),
        }
    }

    /// Measured, positioned and carrying handle bounds. Edges touching a node
    /// that is not ready are left out of the frame.
    pub fn is_ready(&self) -> bool {
        let measured = matches!((self.width, self.height), (Some(w), Some(h)) if w > 0.0 && h > 0.0);
        measured && self.x.is_finite() && self.y.is_finite() && self.handle_bounds.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EdgeLabel {
    /// Plain text, escaped on output.
    Text(String),
    /// Caller-provided markup, emitted verbatim into the label portal.
    Custom(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    Arrow,
    ArrowClosed,
}

impl MarkerType {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerType::Arrow => "arrow",
            MarkerType::ArrowClosed => "arrowclosed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub stroke_width: Option<f32>,
    #[serde(default)]
    pub orient: Option<String>,
    #[serde(default)]
    pub marker_units: Option<String>,
}

impl MarkerSpec {
    pub fn new(marker_type: MarkerType) -> Self {
        MarkerSpec {
            marker_type,
            color: None,
            width: None,
            height: None,
            stroke_width: None,
            orient: None,
            marker_units: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeMarker {
    /// Id of a marker the host defines itself.
    Named(String),
    Spec(MarkerSpec),
}

/// Per-edge overrides for the path styles that take extra parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathOptions {
    pub curvature: Option<f32>,
    pub border_radius: Option<f32>,
    pub offset: Option<f32>,
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
}

fn default_label_bg_padding() -> (f32, f32) {
    (2.0, 4.0)
}

fn default_label_bg_border_radius() -> f32 {
    2.0
}

/// `id`, `source` and `target` are required when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default)]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub label: Option<EdgeLabel>,
    #[serde(default)]
    pub label_style: Option<String>,
    #[serde(default)]
    pub label_show_bg: bool,
    #[serde(default)]
    pub label_bg_style: Option<String>,
    #[serde(default = "default_label_bg_padding")]
    pub label_bg_padding: (f32, f32),
    #[serde(default = "default_label_bg_border_radius")]
    pub label_bg_border_radius: f32,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub marker_start: Option<EdgeMarker>,
    #[serde(default)]
    pub marker_end: Option<EdgeMarker>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub path_options: PathOptions,
}

impl Default for Edge {
    fn default() -> Self {
        Edge {
            id: String::new(),
            source: String::new(),
            target: String::new(),
            source_handle: None,
            target_handle: None,
            edge_type: None,
            label: None,
            label_style: None,
            label_show_bg: false,
            label_bg_style: None,
            label_bg_padding: default_label_bg_padding(),
            label_bg_border_radius: default_label_bg_border_radius(),
            style: None,
            class_name: None,
            marker_start: None,
            marker_end: None,
            selected: false,
            animated: false,
            hidden: false,
            z_index: None,
            path_options: PathOptions::default(),
        }
    }
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, edge_type: &str) -> Self {
        self.edge_type = Some(edge_type.to_string());
        self
    }

    pub fn with_handles(mut self, source_handle: Option<&str>, target_handle: Option<&str>) -> Self {
        self.source_handle = source_handle.map(str::to_string);
        self.target_handle = target_handle.map(str::to_string);
        self
    }

    pub fn with_label(mut self, label: EdgeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Source handles connect only to target handles.
    #[default]
    Strict,
    /// Any handle may end a connection.
    Loose,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionLineType {
    #[default]
    Bezier,
    Straight,
    Step,
    SmoothStep,
    SimpleBezier,
}

/// Endpoint pair produced by a finished connect or edge-update gesture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

/// Edge whose end is being dragged to a new handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeUpdate {
    pub edge_id: String,
    /// The end that follows the pointer.
    pub moving_end: HandleKind,
}

/// In-progress connect gesture. `pointer` is in screen coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDrag {
    pub node_id: String,
    pub handle_kind: HandleKind,
    pub handle_id: Option<String>,
    pub pointer: Vec2,
    #[serde(default)]
    pub updating: Option<EdgeUpdate>,
}

/// Pan/zoom transform of the pane plus its size in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport {
            width,
            height,
            ..Default::default()
        }
    }

    fn safe_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    /// Screen point to flow coordinates.
    pub fn to_flow(&self, p: Vec2) -> Vec2 {
        let k = self.safe_zoom();
        Vec2::new((p.x - self.x) / k, (p.y - self.y) / k)
    }

    /// Visible area in flow coordinates.
    pub fn flow_rect(&self) -> Rect {
        let k = self.safe_zoom();
        Rect {
            x: -self.x / k,
            y: -self.y / k,
            width: self.width / k,
            height: self.height / k,
        }
    }
}
