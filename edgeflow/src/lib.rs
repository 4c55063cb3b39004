//! Edge geometry and connection handling for node-graph editors.
//!
//! [`FlowStore`] owns nodes, edges and the drag state. [`EdgeRenderer`]
//! turns a store snapshot into layered SVG plus an HTML label overlay, and
//! [`ConnectionGesture`] drives the drag-to-connect and reconnect
//! interactions that write back into the store.

pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod store;
pub mod svg;
pub mod geometry {
    pub mod cubic;
    pub mod limits;
    pub mod path_length;
    pub mod tolerance;
}
pub mod edges {
    pub mod components;
    pub mod handles;
    pub mod labels;
    pub mod markers;
    pub mod memo;
    pub mod positions;
    pub mod registry;
    pub mod renderer;
    pub mod visible;
}
pub mod connection {
    pub mod gesture;
    pub mod line;
}

pub use config::FlowConfig;
pub use connection::gesture::{ConnectionGesture, GestureOutcome, HandleTarget, NoopListeners, PointerListeners};
pub use connection::line::{ConnectionLineComponent, ConnectionLineProps};
pub use edges::components::{EdgeComponent, EdgeProps, RenderContext};
pub use edges::registry::EdgeTypeRegistry;
pub use edges::renderer::{EdgeRenderer, RenderedFrame};
pub use error::{FlowError, FlowResult};
pub use model::{
    Connection, ConnectionLineType, ConnectionMode, Edge, EdgeLabel, EdgeMarker, HandleBounds, HandleKind, MarkerSpec,
    MarkerType, NodeHandleBounds, NodeInternals, Position, Vec2, Viewport,
};
pub use paths::{
    bezier_center, bezier_path, edge_center, simple_bezier_center, simple_bezier_path, smooth_step_path, step_path,
    straight_path, EdgePath, PathParams, StepOptions,
};
pub use store::FlowStore;
