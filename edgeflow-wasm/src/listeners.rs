//! Window-level pointer listeners for the connect gesture.
//!
//! The listeners cannot borrow the `Flow` (JS owns it), so they forward
//! pane-relative `(x, y)` to host callbacks which in turn call
//! `Flow.pointer_move` and `Flow.release_res`. The pane origin is
//! subtracted from `clientX`/`clientY` before forwarding.

use edgeflow::PointerListeners;
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;

#[derive(Default)]
pub struct WindowListeners {
    on_move: Option<Function>,
    on_up: Option<Function>,
    pane_origin: (f64, f64),
    active: Vec<(&'static str, MouseClosure)>,
}

impl WindowListeners {
    pub fn set_callbacks(&mut self, on_move: Option<Function>, on_up: Option<Function>) {
        self.on_move = on_move;
        self.on_up = on_up;
    }

    /// Client-space position of the pane's top-left corner. Read when a
    /// drag starts.
    pub fn set_pane_origin(&mut self, x: f64, y: f64) {
        self.pane_origin = (x, y);
    }

    pub fn pane_point(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.pane_origin.0, client_y - self.pane_origin.1)
    }

    pub fn is_attached(&self) -> bool {
        !self.active.is_empty()
    }

    fn forward(f: Function, origin: (f64, f64)) -> MouseClosure {
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let x = JsValue::from_f64(e.client_x() as f64 - origin.0);
            let y = JsValue::from_f64(e.client_y() as f64 - origin.1);
            if let Err(err) = f.call2(&JsValue::NULL, &x, &y) {
                log::warn!("pointer callback threw: {:?}", err);
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    }
}

impl PointerListeners for WindowListeners {
    fn attach(&mut self) {
        let Some(window) = web_sys::window() else {
            log::debug!("no window; pointer listeners not attached");
            return;
        };
        let wanted = [("mousemove", self.on_move.clone()), ("mouseup", self.on_up.clone())];
        for (event, f) in wanted {
            let Some(f) = f else { continue };
            let cb = Self::forward(f, self.pane_origin);
            match window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
                Ok(()) => self.active.push((event, cb)),
                Err(e) => log::warn!("could not listen for {}: {:?}", event, e),
            }
        }
    }

    fn detach(&mut self) {
        let window = web_sys::window();
        for (event, cb) in self.active.drain(..) {
            if let Some(w) = &window {
                let _ = w.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
            }
        }
    }
}
