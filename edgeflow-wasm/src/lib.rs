use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod listeners;

pub use api::{
    bezier_center, bezier_path, edge_center, init_logging, set_panic_hook, simple_bezier_center, simple_bezier_path,
    smooth_step_path, step_path, straight_path,
};
pub use listeners::WindowListeners;

/// JS handle over a store, its renderer and the connect gesture.
#[wasm_bindgen]
pub struct Flow {
    pub(crate) store: edgeflow::FlowStore,
    pub(crate) renderer: edgeflow::EdgeRenderer,
    pub(crate) gesture: edgeflow::ConnectionGesture<WindowListeners>,
}

impl Flow {
    pub fn rs_new(config: edgeflow::FlowConfig) -> Flow {
        Flow {
            store: edgeflow::FlowStore::new(config),
            renderer: edgeflow::EdgeRenderer::default(),
            gesture: edgeflow::ConnectionGesture::new(WindowListeners::default()),
        }
    }
    pub fn rs_version(&self) -> u64 {
        self.store.version()
    }
}
