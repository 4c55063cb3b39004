use crate::interop::{arr_f32, new_obj, set_kv, to_js};
use crate::Flow;
use edgeflow::{
    Connection, ConnectionMode, Edge, FlowConfig, FlowError, GestureOutcome, HandleBounds, HandleKind, HandleTarget,
    NodeHandleBounds, NodeInternals, PathParams, Position, StepOptions, Vec2, Viewport,
};
use js_sys::{Float32Array, Function};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use crate::error;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `log` records to the browser console. `level` is one of
/// error/warn/info/debug/trace and defaults to warn.
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) -> bool {
    let level = level
        .as_deref()
        .and_then(|l| l.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Warn);
    set_panic_hook();
    console_log::init_with_level(level).is_ok()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DropTarget {
    node_id: String,
    handle_kind: HandleKind,
    #[serde(default)]
    handle_id: Option<String>,
}

fn read<T: for<'de> Deserialize<'de>>(param: &str, v: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(v).map_err(|e| error::invalid_input(param, e))
}

fn parse_kind(param: &str, s: &str) -> Result<HandleKind, JsValue> {
    HandleKind::parse(s).ok_or_else(|| error::invalid_value(param, s))
}

fn parse_position(param: &str, s: &str) -> Result<Position, JsValue> {
    Position::parse(s).ok_or_else(|| error::invalid_value(param, s))
}

fn check_finite(pairs: &[(&'static str, f32)]) -> Result<(), JsValue> {
    match pairs.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, _)) => Err(error::non_finite(name)),
        None => Ok(()),
    }
}

fn outcome_value(out: &GestureOutcome) -> JsValue {
    let o = new_obj();
    match out {
        GestureOutcome::Connected { connection, edge_id } => {
            set_kv(&o, "kind", &JsValue::from_str("connected"));
            set_kv(&o, "edgeId", &edge_id.as_deref().map_or(JsValue::NULL, JsValue::from_str));
            set_kv(&o, "connection", &to_js(connection));
        }
        GestureOutcome::Updated { edge_id, connection } => {
            set_kv(&o, "kind", &JsValue::from_str("updated"));
            set_kv(&o, "edgeId", &JsValue::from_str(edge_id));
            set_kv(&o, "connection", &to_js(connection));
        }
        GestureOutcome::Cancelled => set_kv(&o, "kind", &JsValue::from_str("cancelled")),
    }
    o.into()
}

#[wasm_bindgen]
impl Flow {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Flow {
        crate::Flow::rs_new(FlowConfig::default())
    }
    pub fn version(&self) -> u64 {
        self.rs_version()
    }

    // Config
    pub fn get_config(&self) -> JsValue {
        to_js(self.store.config())
    }
    pub fn set_config_res(&mut self, config: JsValue) -> JsValue {
        let config: FlowConfig = match serde_wasm_bindgen::from_value(config) {
            Ok(c) => c,
            Err(e) => return error::err("invalid_config", format!("invalid configuration: {}", e), None),
        };
        error::from_result(self.store.set_config(config).map(|_| JsValue::TRUE))
    }
    pub fn set_connection_mode_res(&mut self, mode: &str) -> JsValue {
        let mode = match mode {
            "strict" => ConnectionMode::Strict,
            "loose" => ConnectionMode::Loose,
            other => return error::invalid_value("mode", other),
        };
        self.store.set_connection_mode(mode);
        error::ok(JsValue::TRUE)
    }

    // Viewport
    pub fn set_viewport(&mut self, x: f32, y: f32, zoom: f32, width: f32, height: f32) -> bool {
        self.store.set_viewport(Viewport { x, y, zoom, width, height }).is_ok()
    }
    pub fn set_viewport_res(&mut self, x: f32, y: f32, zoom: f32, width: f32, height: f32) -> JsValue {
        error::from_result(self.store.set_viewport(Viewport { x, y, zoom, width, height }).map(|_| JsValue::TRUE))
    }

    // Nodes
    pub fn add_node(&mut self, id: &str, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.store.upsert_node(NodeInternals::new(id, x, y).with_size(width, height)).is_ok()
    }
    pub fn upsert_node_res(&mut self, node: JsValue) -> JsValue {
        let node: NodeInternals = match read("node", node) {
            Ok(n) => n,
            Err(e) => return e,
        };
        error::from_result(self.store.upsert_node(node).map(|_| JsValue::TRUE))
    }
    pub fn get_node(&self, id: &str) -> JsValue {
        self.store.node(id).map_or(JsValue::NULL, to_js)
    }
    pub fn remove_node_res(&mut self, id: &str) -> JsValue {
        error::from_result(self.store.remove_node(id).map(|n| to_js(&n)))
    }
    pub fn move_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.store.move_node(id, x, y).is_ok()
    }
    pub fn move_node_res(&mut self, id: &str, x: f32, y: f32) -> JsValue {
        if let Err(e) = check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        error::from_result(self.store.move_node(id, x, y).map(|_| JsValue::TRUE))
    }
    pub fn set_node_dimensions_res(&mut self, id: &str, width: f32, height: f32) -> JsValue {
        error::from_result(self.store.set_node_dimensions(id, width, height).map(|_| JsValue::TRUE))
    }
    pub fn set_node_dragging(&mut self, id: &str, dragging: bool) -> bool {
        self.store.set_node_dragging(id, dragging).is_ok()
    }
    pub fn set_node_selected(&mut self, id: &str, selected: bool) -> bool {
        self.store.set_node_selected(id, selected).is_ok()
    }

    // Handles
    #[allow(clippy::too_many_arguments)]
    pub fn register_handle_res(
        &mut self,
        node_id: &str,
        kind: &str,
        handle_id: Option<String>,
        position: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> JsValue {
        let kind = match parse_kind("kind", kind) {
            Ok(k) => k,
            Err(e) => return e,
        };
        let position = match parse_position("position", position) {
            Ok(p) => p,
            Err(e) => return e,
        };
        if let Err(e) = check_finite(&[("x", x), ("y", y), ("width", width), ("height", height)]) {
            return e;
        }
        let handle = HandleBounds::new(handle_id.as_deref(), position, x, y, width, height);
        error::from_result(self.store.register_handle(node_id, kind, handle).map(|_| JsValue::TRUE))
    }
    pub fn set_handle_bounds_res(&mut self, node_id: &str, bounds: JsValue) -> JsValue {
        let bounds: NodeHandleBounds = match read("bounds", bounds) {
            Ok(b) => b,
            Err(e) => return e,
        };
        error::from_result(self.store.set_handle_bounds(node_id, bounds).map(|_| JsValue::TRUE))
    }

    // Edges
    pub fn add_edge(&mut self, id: &str, source: &str, target: &str) -> bool {
        self.store.add_edge(Edge::new(id, source, target)).is_ok()
    }
    pub fn add_edge_res(&mut self, edge: JsValue) -> JsValue {
        let edge: Edge = match read("edge", edge) {
            Ok(e) => e,
            Err(e) => return e,
        };
        let id = JsValue::from_str(&edge.id);
        error::from_result(self.store.add_edge(edge).map(|_| id))
    }
    pub fn set_edges_res(&mut self, edges: JsValue) -> JsValue {
        let edges: Vec<Edge> = match read("edges", edges) {
            Ok(e) => e,
            Err(e) => return e,
        };
        error::from_result(self.store.set_edges(edges).map(|_| JsValue::TRUE))
    }
    pub fn get_edges(&self) -> JsValue {
        to_js(self.store.edges())
    }
    pub fn get_edge(&self, id: &str) -> JsValue {
        self.store.edge(id).map_or(JsValue::NULL, to_js)
    }
    pub fn remove_edge_res(&mut self, id: &str) -> JsValue {
        error::from_result(self.store.remove_edge(id).map(|e| to_js(&e)))
    }
    pub fn connect(&mut self, connection: JsValue) -> JsValue {
        let connection: Connection = match read("connection", connection) {
            Ok(c) => c,
            Err(e) => return e,
        };
        error::ok(self.store.connect(connection).map_or(JsValue::NULL, |id| JsValue::from_str(&id)))
    }
    pub fn update_edge_res(&mut self, edge_id: &str, connection: JsValue) -> JsValue {
        let connection: Connection = match read("connection", connection) {
            Ok(c) => c,
            Err(e) => return e,
        };
        error::from_result(self.store.update_edge(edge_id, connection).map(|_| JsValue::TRUE))
    }
    pub fn select_edges_res(&mut self, ids: JsValue) -> JsValue {
        let ids: Vec<String> = match read("ids", ids) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        error::from_result(self.store.select_edges(&refs).map(|_| JsValue::TRUE))
    }
    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    // Rendering
    /// `{svg, html, edgeCount, connecting, warnings}` for the current state.
    pub fn render(&self) -> JsValue {
        let frame = self.renderer.render(&self.store);
        let o = new_obj();
        set_kv(&o, "svg", &JsValue::from_str(&frame.to_svg()));
        set_kv(&o, "html", &JsValue::from_str(&frame.to_html()));
        set_kv(&o, "edgeCount", &JsValue::from_f64(frame.edge_count() as f64));
        set_kv(&o, "connecting", &JsValue::from_bool(frame.connection_line.is_some()));
        set_kv(&o, "warnings", &to_js(&self.renderer.diagnostics()));
        o.into()
    }
    pub fn render_svg(&self) -> String {
        self.renderer.render(&self.store).to_svg()
    }
    pub fn render_labels_html(&self) -> String {
        self.renderer.render(&self.store).to_html()
    }
    pub fn diagnostics(&self) -> JsValue {
        to_js(&self.renderer.diagnostics())
    }

    // Connect gesture
    /// Host callbacks receiving pane-relative `(x, y)` while a drag is live:
    /// `clientX`/`clientY` minus the origin given to `set_pane_origin`.
    pub fn set_pointer_callbacks(&mut self, on_move: Option<Function>, on_up: Option<Function>) {
        self.gesture.listeners_mut().set_callbacks(on_move, on_up);
    }
    /// Client-space top-left of the pane, e.g. from `getBoundingClientRect()`.
    pub fn set_pane_origin(&mut self, x: f64, y: f64) {
        self.gesture.listeners_mut().set_pane_origin(x, y);
    }
    /// Optional veto called with each candidate connection; falsy rejects.
    pub fn set_connection_validator(&mut self, validator: Option<Function>) {
        let validator = validator.map(|f| {
            Box::new(move |c: &Connection| match f.call1(&JsValue::NULL, &to_js(c)) {
                Ok(v) => v.is_truthy(),
                Err(e) => {
                    log::warn!("connection validator threw: {:?}", e);
                    false
                }
            }) as edgeflow::connection::gesture::ConnectionValidator
        });
        self.gesture.set_validator(validator);
    }
    pub fn is_connecting(&self) -> bool {
        self.gesture.is_dragging()
    }
    pub fn start_connection_res(&mut self, node_id: &str, kind: &str, handle_id: Option<String>, x: f32, y: f32) -> JsValue {
        let kind = match parse_kind("kind", kind) {
            Ok(k) => k,
            Err(e) => return e,
        };
        if let Err(e) = check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        if self.store.node(node_id).is_none() {
            return error::flow_error(&FlowError::NodeNotFound(node_id.to_string()));
        }
        let origin = HandleTarget::new(node_id, kind, handle_id.as_deref());
        let started = self.gesture.start_connect(&mut self.store, origin, Vec2::new(x, y));
        error::ok(JsValue::from_bool(started))
    }
    pub fn start_edge_update_res(&mut self, edge_id: &str, moving_end: &str, x: f32, y: f32) -> JsValue {
        let moving_end = match parse_kind("movingEnd", moving_end) {
            Ok(k) => k,
            Err(e) => return e,
        };
        if let Err(e) = check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        let r = self.gesture.start_edge_update(&mut self.store, edge_id, moving_end, Vec2::new(x, y));
        error::from_result(r.map(|_| JsValue::TRUE))
    }
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.gesture.pointer_move(&mut self.store, Vec2::new(x, y))
    }
    /// Ends the drag. `target` is `null` or `{nodeId, handleKind, handleId?}`.
    pub fn release_res(&mut self, target: JsValue) -> JsValue {
        let target = if target.is_null() || target.is_undefined() {
            None
        } else {
            match read::<DropTarget>("target", target) {
                Ok(t) => Some(HandleTarget::new(t.node_id, t.handle_kind, t.handle_id.as_deref())),
                Err(e) => return e,
            }
        };
        let out = self.gesture.release(&mut self.store, target.as_ref());
        error::ok(outcome_value(&out))
    }
    pub fn cancel_connection(&mut self) {
        self.gesture.cancel(&mut self.store);
    }
}

impl Default for Flow {
    fn default() -> Self {
        Flow::new()
    }
}

// Path helpers. Positions are "top" | "right" | "bottom" | "left"; an
// unknown position yields null.

fn params(sx: f32, sy: f32, sp: &str, tx: f32, ty: f32, tp: &str) -> Option<PathParams> {
    Some(PathParams::new(sx, sy, Position::parse(sp)?, tx, ty, Position::parse(tp)?))
}

fn path_value(p: &edgeflow::EdgePath) -> JsValue {
    let o = new_obj();
    set_kv(&o, "path", &JsValue::from_str(&p.path));
    set_kv(&o, "labelX", &JsValue::from_f64(p.label_x as f64));
    set_kv(&o, "labelY", &JsValue::from_f64(p.label_y as f64));
    o.into()
}

fn step_options(border_radius: Option<f32>, offset: Option<f32>) -> StepOptions {
    let d = StepOptions::default();
    StepOptions {
        border_radius: border_radius.unwrap_or(d.border_radius),
        offset: offset.unwrap_or(d.offset),
        ..d
    }
}

fn center_arr(c: (f32, f32, f32, f32)) -> Float32Array {
    arr_f32(&[c.0, c.1, c.2, c.3])
}

#[wasm_bindgen]
pub fn bezier_path(sx: f32, sy: f32, sp: &str, tx: f32, ty: f32, tp: &str, curvature: Option<f32>) -> JsValue {
    params(sx, sy, sp, tx, ty, tp).map_or(JsValue::NULL, |p| path_value(&edgeflow::bezier_path(&p, curvature)))
}

#[wasm_bindgen]
pub fn simple_bezier_path(sx: f32, sy: f32, sp: &str, tx: f32, ty: f32, tp: &str) -> JsValue {
    params(sx, sy, sp, tx, ty, tp).map_or(JsValue::NULL, |p| path_value(&edgeflow::simple_bezier_path(&p)))
}

#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn smooth_step_path(
    sx: f32,
    sy: f32,
    sp: &str,
    tx: f32,
    ty: f32,
    tp: &str,
    border_radius: Option<f32>,
    offset: Option<f32>,
) -> JsValue {
    let o = step_options(border_radius, offset);
    params(sx, sy, sp, tx, ty, tp).map_or(JsValue::NULL, |p| path_value(&edgeflow::smooth_step_path(&p, &o)))
}

#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn step_path(sx: f32, sy: f32, sp: &str, tx: f32, ty: f32, tp: &str, offset: Option<f32>) -> JsValue {
    let o = step_options(None, offset);
    params(sx, sy, sp, tx, ty, tp).map_or(JsValue::NULL, |p| path_value(&edgeflow::step_path(&p, &o)))
}

#[wasm_bindgen]
pub fn straight_path(sx: f32, sy: f32, tx: f32, ty: f32) -> JsValue {
    let p = PathParams::new(sx, sy, Position::Bottom, tx, ty, Position::Top);
    path_value(&edgeflow::straight_path(&p))
}

/// `[centerX, centerY, offsetX, offsetY]`.
#[wasm_bindgen]
pub fn edge_center(sx: f32, sy: f32, tx: f32, ty: f32) -> Float32Array {
    center_arr(edgeflow::edge_center(sx, sy, tx, ty))
}

#[wasm_bindgen]
pub fn bezier_center(sx: f32, sy: f32, sp: &str, tx: f32, ty: f32, tp: &str, curvature: Option<f32>) -> JsValue {
    params(sx, sy, sp, tx, ty, tp).map_or(JsValue::NULL, |p| center_arr(edgeflow::bezier_center(&p, curvature)).into())
}

#[wasm_bindgen]
pub fn simple_bezier_center(sx: f32, sy: f32, sp: &str, tx: f32, ty: f32, tp: &str) -> JsValue {
    params(sx, sy, sp, tx, ty, tp).map_or(JsValue::NULL, |p| center_arr(edgeflow::simple_bezier_center(&p)).into())
}
