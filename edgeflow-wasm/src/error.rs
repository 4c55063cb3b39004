use crate::interop::{new_obj, set_kv};
use edgeflow::FlowError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_value(param: &str, got: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_value", format!("invalid value for '{}'", param), Some(d.into()))
}

#[inline]
pub fn invalid_input(param: &str, reason: impl std::fmt::Display) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_input", format!("could not read '{}': {}", param, reason), Some(d.into()))
}

/// Maps a core error onto the `{ok: false, error}` shape, keyed by its code.
pub fn flow_error(e: &FlowError) -> JsValue {
    let d = new_obj();
    match e {
        FlowError::NodeNotFound(id) => {
            set_kv(&d, "kind", &JsValue::from_str("node"));
            set_kv(&d, "id", &JsValue::from_str(id));
        }
        FlowError::EdgeNotFound(id) => {
            set_kv(&d, "kind", &JsValue::from_str("edge"));
            set_kv(&d, "id", &JsValue::from_str(id));
        }
        FlowError::DuplicateEdge(id) => set_kv(&d, "id", &JsValue::from_str(id)),
        FlowError::DuplicateHandle { node, kind, id } => {
            set_kv(&d, "node", &JsValue::from_str(node));
            set_kv(&d, "kind", &JsValue::from_str(&kind.to_string()));
            let id = id.as_deref().map_or(JsValue::NULL, JsValue::from_str);
            set_kv(&d, "id", &id);
        }
        FlowError::NonFinite { param } | FlowError::InvalidValue { param, .. } => {
            set_kv(&d, "param", &JsValue::from_str(param))
        }
        FlowError::Config(_) => {}
    }
    err(e.code(), e.to_string(), Some(d.into()))
}

pub fn from_result(r: edgeflow::FlowResult<JsValue>) -> JsValue {
    match r {
        Ok(v) => ok(v),
        Err(e) => flow_error(&e),
    }
}
