use js_sys::{Float32Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
/// Serializes plain data for JS; a value serde-wasm-bindgen rejects becomes null.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(v) {
        Ok(js) => js,
        Err(e) => {
            log::error!("serialization to JS failed: {}", e);
            JsValue::NULL
        }
    }
}
