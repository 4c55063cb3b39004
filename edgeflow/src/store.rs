//! Owned graph state read by the renderer and written by the host and by
//! finished gestures.
//!
//! Every successful mutation bumps [`FlowStore::version`] and then calls the
//! subscribers, so a subscriber always observes the completed change.

use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use crate::geometry::tolerance::EPS_POS;
use crate::model::{
    Connection, ConnectionDrag, ConnectionMode, Edge, HandleBounds, HandleKind, NodeHandleBounds, NodeInternals,
    Vec2, Viewport,
};
use std::collections::{HashMap, HashSet};
use std::fmt;

pub type SubscriptionId = u64;
type Subscriber = Box<dyn FnMut(&FlowStore)>;

pub struct FlowStore {
    nodes: HashMap<String, NodeInternals>,
    edges: Vec<Edge>,
    connection_drag: Option<ConnectionDrag>,
    viewport: Viewport,
    config: FlowConfig,
    version: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for FlowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowStore")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("connection_drag", &self.connection_drag)
            .field("viewport", &self.viewport)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for FlowStore {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

fn finite(param: &'static str, v: f32) -> FlowResult<f32> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FlowError::NonFinite { param })
    }
}

fn check_unique_handles(node: &str, kind: HandleKind, handles: &[HandleBounds]) -> FlowResult<()> {
    let mut seen: HashSet<Option<&str>> = HashSet::new();
    for h in handles {
        if !seen.insert(h.id.as_deref()) {
            return Err(FlowError::DuplicateHandle {
                node: node.to_string(),
                kind,
                id: h.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_handle_bounds(node: &str, bounds: &NodeHandleBounds) -> FlowResult<()> {
    check_unique_handles(node, HandleKind::Source, &bounds.source)?;
    check_unique_handles(node, HandleKind::Target, &bounds.target)
}

/// Id given to edges created from a connection.
pub fn connection_edge_id(c: &Connection) -> String {
    format!(
        "edgeflow__edge-{}{}-{}{}",
        c.source,
        c.source_handle.as_deref().unwrap_or(""),
        c.target,
        c.target_handle.as_deref().unwrap_or("")
    )
}

impl FlowStore {
    pub fn new(config: FlowConfig) -> Self {
        FlowStore {
            nodes: HashMap::new(),
            edges: Vec::new(),
            connection_drag: None,
            viewport: Viewport::default(),
            config,
            version: 1,
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version += 1;
        let mut subs = std::mem::take(&mut self.subscribers);
        for (_, f) in subs.iter_mut() {
            f(self);
        }
        self.subscribers = subs;
    }

    /// Calls `f` after every mutation.
    pub fn subscribe(&mut self, f: impl FnMut(&FlowStore) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    // Settings

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FlowConfig) -> FlowResult<()> {
        config.validate()?;
        self.config = config;
        self.bump();
        Ok(())
    }

    pub fn connection_mode(&self) -> ConnectionMode {
        self.config.connection_mode
    }

    pub fn set_connection_mode(&mut self, mode: ConnectionMode) {
        if self.config.connection_mode != mode {
            self.config.connection_mode = mode;
            self.bump();
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> FlowResult<()> {
        finite("x", viewport.x)?;
        finite("y", viewport.y)?;
        finite("width", viewport.width)?;
        finite("height", viewport.height)?;
        if !(finite("zoom", viewport.zoom)? > 0.0) {
            return Err(FlowError::InvalidValue {
                param: "zoom",
                reason: format!("expected a positive zoom, got {}", viewport.zoom),
            });
        }
        if viewport.width < 0.0 || viewport.height < 0.0 {
            return Err(FlowError::InvalidValue {
                param: "width",
                reason: "pane size must not be negative".to_string(),
            });
        }
        self.viewport = viewport;
        self.bump();
        Ok(())
    }

    // Nodes

    pub fn nodes(&self) -> &HashMap<String, NodeInternals> {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&NodeInternals> {
        self.nodes.get(id)
    }

    pub fn is_node_dragging(&self, id: &str) -> bool {
        self.nodes.get(id).map_or(false, |n| n.dragging)
    }

    fn node_mut(&mut self, id: &str) -> FlowResult<&mut NodeInternals> {
        self.nodes.get_mut(id).ok_or_else(|| FlowError::NodeNotFound(id.to_string()))
    }

    /// Inserts or replaces a node. Handle bounds already registered for the
    /// node survive a replacement that carries none.
    pub fn upsert_node(&mut self, mut node: NodeInternals) -> FlowResult<()> {
        finite("x", node.x)?;
        finite("y", node.y)?;
        if let Some(w) = node.width {
            finite("width", w)?;
        }
        if let Some(h) = node.height {
            finite("height", h)?;
        }
        if let Some(bounds) = &node.handle_bounds {
            check_handle_bounds(&node.id, bounds)?;
        }
        if node.handle_bounds.is_none() {
            node.handle_bounds = self.nodes.get(&node.id).and_then(|n| n.handle_bounds.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        self.bump();
        Ok(())
    }

    /// Removes a node. Its edges stay in the store and are left out of
    /// frames until a node with that id comes back.
    pub fn remove_node(&mut self, id: &str) -> FlowResult<NodeInternals> {
        let node = self.nodes.remove(id).ok_or_else(|| FlowError::NodeNotFound(id.to_string()))?;
        self.bump();
        Ok(node)
    }

    pub fn move_node(&mut self, id: &str, x: f32, y: f32) -> FlowResult<()> {
        let (x, y) = (finite("x", x)?, finite("y", y)?);
        let node = self.node_mut(id)?;
        let (dx, dy) = (x - node.x, y - node.y);
        if dx * dx + dy * dy <= EPS_POS * EPS_POS {
            return Ok(());
        }
        node.x = x;
        node.y = y;
        self.bump();
        Ok(())
    }

    pub fn set_node_dimensions(&mut self, id: &str, width: f32, height: f32) -> FlowResult<()> {
        let (width, height) = (finite("width", width)?, finite("height", height)?);
        if width < 0.0 || height < 0.0 {
            return Err(FlowError::InvalidValue {
                param: "width",
                reason: format!("node size must not be negative, got {}x{}", width, height),
            });
        }
        let node = self.node_mut(id)?;
        node.width = Some(width);
        node.height = Some(height);
        self.bump();
        Ok(())
    }

    pub fn set_node_dragging(&mut self, id: &str, dragging: bool) -> FlowResult<()> {
        let node = self.node_mut(id)?;
        if node.dragging != dragging {
            node.dragging = dragging;
            self.bump();
        }
        Ok(())
    }

    pub fn set_node_selected(&mut self, id: &str, selected: bool) -> FlowResult<()> {
        let node = self.node_mut(id)?;
        if node.selected != selected {
            node.selected = selected;
            self.bump();
        }
        Ok(())
    }

    /// Replaces every handle bound of a node at once.
    pub fn set_handle_bounds(&mut self, id: &str, bounds: NodeHandleBounds) -> FlowResult<()> {
        check_handle_bounds(id, &bounds)?;
        self.node_mut(id)?.handle_bounds = Some(bounds);
        self.bump();
        Ok(())
    }

    /// Appends one handle, keeping registration order.
    pub fn register_handle(&mut self, id: &str, kind: HandleKind, handle: HandleBounds) -> FlowResult<()> {
        finite("x", handle.x)?;
        finite("y", handle.y)?;
        finite("width", handle.width)?;
        finite("height", handle.height)?;
        let node = self.node_mut(id)?;
        let bounds = node.handle_bounds.get_or_insert_with(NodeHandleBounds::default);
        if bounds.of_kind(kind).iter().any(|h| h.id == handle.id) {
            return Err(FlowError::DuplicateHandle {
                node: id.to_string(),
                kind,
                id: handle.id,
            });
        }
        bounds.of_kind_mut(kind).push(handle);
        self.bump();
        Ok(())
    }

    // Edges

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn edge_mut(&mut self, id: &str) -> FlowResult<&mut Edge> {
        self.edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| FlowError::EdgeNotFound(id.to_string()))
    }

    pub fn add_edge(&mut self, edge: Edge) -> FlowResult<()> {
        if self.edge(&edge.id).is_some() {
            return Err(FlowError::DuplicateEdge(edge.id));
        }
        self.edges.push(edge);
        self.bump();
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) -> FlowResult<Edge> {
        let idx = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| FlowError::EdgeNotFound(id.to_string()))?;
        let edge = self.edges.remove(idx);
        self.bump();
        Ok(edge)
    }

    /// Replaces the whole edge list. Ids must be unique.
    pub fn set_edges(&mut self, edges: Vec<Edge>) -> FlowResult<()> {
        let mut seen = HashSet::new();
        for e in &edges {
            if !seen.insert(e.id.as_str()) {
                return Err(FlowError::DuplicateEdge(e.id.clone()));
            }
        }
        self.edges = edges;
        self.bump();
        Ok(())
    }

    fn connection_exists(&self, c: &Connection) -> bool {
        self.edges.iter().any(|e| {
            e.source == c.source
                && e.target == c.target
                && e.source_handle == c.source_handle
                && e.target_handle == c.target_handle
        })
    }

    /// Adds an edge for a finished connect gesture and returns its id.
    /// Connections that already exist, or that name a missing node, are
    /// ignored.
    pub fn connect(&mut self, connection: Connection) -> Option<String> {
        if !self.nodes.contains_key(&connection.source) || !self.nodes.contains_key(&connection.target) {
            log::debug!("connect ignored: unknown endpoint in {:?}", connection);
            return None;
        }
        if self.connection_exists(&connection) {
            log::debug!("connect ignored: {:?} already exists", connection);
            return None;
        }
        let id = connection_edge_id(&connection);
        if self.edge(&id).is_some() {
            return None;
        }
        let edge = Edge {
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            ..Edge::new(id.clone(), connection.source, connection.target)
        };
        self.edges.push(edge);
        self.bump();
        Some(id)
    }

    /// Points an existing edge at new endpoints. The edge keeps its id and
    /// every other field.
    pub fn update_edge(&mut self, edge_id: &str, connection: Connection) -> FlowResult<()> {
        for node in [&connection.source, &connection.target] {
            if !self.nodes.contains_key(node.as_str()) {
                return Err(FlowError::NodeNotFound(node.clone()));
            }
        }
        let edge = self.edge_mut(edge_id)?;
        edge.source = connection.source;
        edge.target = connection.target;
        edge.source_handle = connection.source_handle;
        edge.target_handle = connection.target_handle;
        self.bump();
        Ok(())
    }

    /// Makes exactly `ids` the selected edges.
    pub fn select_edges(&mut self, ids: &[&str]) -> FlowResult<()> {
        if let Some(missing) = ids.iter().find(|id| self.edge(id).is_none()) {
            return Err(FlowError::EdgeNotFound(missing.to_string()));
        }
        for e in self.edges.iter_mut() {
            e.selected = ids.contains(&e.id.as_str());
        }
        self.bump();
        Ok(())
    }

    /// Deselects every edge and node.
    pub fn clear_selection(&mut self) {
        for e in self.edges.iter_mut() {
            e.selected = false;
        }
        for n in self.nodes.values_mut() {
            n.selected = false;
        }
        self.bump();
    }

    // Connection drag

    pub fn connection_drag(&self) -> Option<&ConnectionDrag> {
        self.connection_drag.as_ref()
    }

    pub fn set_connection_drag(&mut self, drag: Option<ConnectionDrag>) {
        self.connection_drag = drag;
        self.bump();
    }

    /// Moves the pointer of the active drag. Returns false when no drag is
    /// active or the point is not finite.
    pub fn update_connection_pointer(&mut self, pointer: Vec2) -> bool {
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return false;
        }
        match self.connection_drag.as_mut() {
            Some(drag) => {
                drag.pointer = pointer;
                self.bump();
                true
            }
            None => false,
        }
    }
}
