//! Connect and edge-update gestures.
//!
//! A gesture is either idle or dragging. Entering `Dragging` publishes a
//! [`ConnectionDrag`] to the store and attaches pointer listeners; every way
//! out (release, cancel, drop) clears the drag and detaches them again.

use crate::error::{FlowError, FlowResult};
use crate::model::{Connection, ConnectionDrag, ConnectionMode, EdgeUpdate, HandleKind, Vec2};
use crate::store::FlowStore;

/// Document-level pointer subscriptions held for the length of a drag.
pub trait PointerListeners {
    fn attach(&mut self);
    fn detach(&mut self);
}

/// For hosts that deliver pointer events themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListeners;

impl PointerListeners for NoopListeners {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
}

/// A handle under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandleTarget {
    pub node_id: String,
    pub handle_kind: HandleKind,
    pub handle_id: Option<String>,
}

impl HandleTarget {
    pub fn new(node_id: impl Into<String>, handle_kind: HandleKind, handle_id: Option<&str>) -> Self {
        HandleTarget {
            node_id: node_id.into(),
            handle_kind,
            handle_id: handle_id.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// `edge_id` is None when the connection already existed.
    Connected { connection: Connection, edge_id: Option<String> },
    Updated { edge_id: String, connection: Connection },
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
enum GestureState {
    Idle,
    Dragging { origin: HandleTarget, updating: Option<EdgeUpdate> },
}

pub type ConnectionValidator = Box<dyn Fn(&Connection) -> bool>;

pub struct ConnectionGesture<L: PointerListeners> {
    state: GestureState,
    listeners: L,
    validator: Option<ConnectionValidator>,
}

impl<L: PointerListeners> ConnectionGesture<L> {
    pub fn new(listeners: L) -> Self {
        ConnectionGesture {
            state: GestureState::Idle,
            listeners,
            validator: None,
        }
    }

    /// Extra check run on every candidate connection before it is applied.
    pub fn set_validator(&mut self, validator: Option<ConnectionValidator>) {
        self.validator = validator;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn listeners(&self) -> &L {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut L {
        &mut self.listeners
    }

    fn enter(&mut self, store: &mut FlowStore, origin: HandleTarget, updating: Option<EdgeUpdate>, pointer: Vec2) {
        if self.is_dragging() {
            self.cancel(store);
        }
        log::debug!(
            "gesture start: {} {} handle {:?} (update: {:?})",
            origin.node_id,
            origin.handle_kind,
            origin.handle_id,
            updating
        );
        store.set_connection_drag(Some(ConnectionDrag {
            node_id: origin.node_id.clone(),
            handle_kind: origin.handle_kind,
            handle_id: origin.handle_id.clone(),
            pointer,
            updating: updating.clone(),
        }));
        self.listeners.attach();
        self.state = GestureState::Dragging { origin, updating };
    }

    fn leave(&mut self, store: &mut FlowStore) -> Option<(HandleTarget, Option<EdgeUpdate>)> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => None,
            GestureState::Dragging { origin, updating } => {
                store.set_connection_drag(None);
                self.listeners.detach();
                Some((origin, updating))
            }
        }
    }

    /// Starts dragging a new connection out of `origin`. Returns false when
    /// nodes are not connectable or the node does not exist.
    pub fn start_connect(&mut self, store: &mut FlowStore, origin: HandleTarget, pointer: Vec2) -> bool {
        if !store.config().nodes_connectable || store.node(&origin.node_id).is_none() {
            return false;
        }
        self.enter(store, origin, None, pointer);
        true
    }

    /// Starts moving one end of an existing edge. The drag is anchored at
    /// the end that stays put.
    pub fn start_edge_update(
        &mut self,
        store: &mut FlowStore,
        edge_id: &str,
        moving_end: HandleKind,
        pointer: Vec2,
    ) -> FlowResult<()> {
        let edge = store.edge(edge_id).ok_or_else(|| FlowError::EdgeNotFound(edge_id.to_string()))?;
        let origin = match moving_end {
            HandleKind::Source => HandleTarget::new(&edge.target, HandleKind::Target, edge.target_handle.as_deref()),
            HandleKind::Target => HandleTarget::new(&edge.source, HandleKind::Source, edge.source_handle.as_deref()),
        };
        let updating = EdgeUpdate {
            edge_id: edge_id.to_string(),
            moving_end,
        };
        self.enter(store, origin, Some(updating), pointer);
        Ok(())
    }

    pub fn pointer_move(&mut self, store: &mut FlowStore, pointer: Vec2) -> bool {
        self.is_dragging() && store.update_connection_pointer(pointer)
    }

    fn connection(origin: &HandleTarget, target: &HandleTarget) -> Connection {
        let (source, dest) = match origin.handle_kind {
            HandleKind::Source => (origin, target),
            HandleKind::Target => (target, origin),
        };
        Connection {
            source: source.node_id.clone(),
            target: dest.node_id.clone(),
            source_handle: source.handle_id.clone(),
            target_handle: dest.handle_id.clone(),
        }
    }

    fn is_valid(&self, mode: ConnectionMode, origin: &HandleTarget, target: &HandleTarget, c: &Connection) -> bool {
        if origin == target {
            return false;
        }
        if mode == ConnectionMode::Strict && target.handle_kind == origin.handle_kind {
            return false;
        }
        self.validator.as_ref().map_or(true, |v| v(c))
    }

    /// Ends the drag over `target` (or over nothing). A valid target creates
    /// an edge, or re-points the edge being updated; anything else leaves the
    /// store's edges untouched.
    pub fn release(&mut self, store: &mut FlowStore, target: Option<&HandleTarget>) -> GestureOutcome {
        let Some((origin, updating)) = self.leave(store) else {
            return GestureOutcome::Cancelled;
        };
        let Some(target) = target else {
            log::debug!("gesture released over empty space");
            return GestureOutcome::Cancelled;
        };
        let connection = Self::connection(&origin, target);
        if !self.is_valid(store.connection_mode(), &origin, target, &connection) {
            log::debug!("gesture released over invalid handle {:?}", target);
            return GestureOutcome::Cancelled;
        }

        match updating {
            Some(update) => match store.update_edge(&update.edge_id, connection.clone()) {
                Ok(()) => {
                    log::debug!("edge {} updated to {:?}", update.edge_id, connection);
                    GestureOutcome::Updated {
                        edge_id: update.edge_id,
                        connection,
                    }
                }
                Err(e) => {
                    log::debug!("edge update dropped: {}", e);
                    GestureOutcome::Cancelled
                }
            },
            None => {
                let edge_id = store.connect(connection.clone());
                log::debug!("connected {:?} as {:?}", connection, edge_id);
                GestureOutcome::Connected { connection, edge_id }
            }
        }
    }

    pub fn cancel(&mut self, store: &mut FlowStore) -> GestureOutcome {
        if self.leave(store).is_some() {
            log::debug!("gesture cancelled");
        }
        GestureOutcome::Cancelled
    }

    /// Tears the gesture down, clearing any live drag from `store`.
    pub fn finish(mut self, store: &mut FlowStore) {
        self.cancel(store);
    }
}

// The store is out of reach here, so a live preview stays in
// `connection_drag` unless the owner calls `finish` or `cancel` first.
impl<L: PointerListeners> Drop for ConnectionGesture<L> {
    fn drop(&mut self) {
        if self.is_dragging() {
            self.listeners.detach();
        }
    }
}
