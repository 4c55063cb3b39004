use edgeflow_wasm::Flow;
use js_sys::{Reflect, JSON};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn error_data(v: &JsValue, key: &str) -> Option<String> {
    let err = Reflect::get(v, &JsValue::from_str("error")).ok()?;
    let data = Reflect::get(&err, &JsValue::from_str("data")).ok()?;
    Reflect::get(&data, &JsValue::from_str(key)).ok()?.as_string()
}

#[wasm_bindgen_test]
fn invalid_ids_return_typed_errors() {
    let mut f = Flow::new();
    let ver = f.version();
    let r = f.move_node_res("nope", 0.0, 0.0);
    assert!(is_err(&r, "invalid_id"));
    assert_eq!(error_data(&r, "kind").as_deref(), Some("node"));
    assert_eq!(f.version(), ver, "state mutated on error");

    let r2 = f.remove_edge_res("nope");
    assert!(is_err(&r2, "invalid_id"));
    assert_eq!(error_data(&r2, "kind").as_deref(), Some("edge"));
    assert!(is_err(&f.start_edge_update_res("nope", "target", 0.0, 0.0), "invalid_id"));
    assert!(is_err(&f.start_connection_res("nope", "source", None, 0.0, 0.0), "invalid_id"));
    assert_eq!(f.version(), ver);
}

#[wasm_bindgen_test]
fn non_finite_inputs_are_rejected() {
    let mut f = Flow::new();
    assert!(f.add_node("a", 0.0, 0.0, 10.0, 10.0));
    let r = f.move_node_res("a", f32::NAN, 0.0);
    assert!(is_err(&r, "non_finite"));
    assert_eq!(error_data(&r, "param").as_deref(), Some("x"));
    assert!(is_err(&f.set_viewport_res(0.0, f32::INFINITY, 1.0, 100.0, 100.0), "non_finite"));
    assert!(is_err(&f.register_handle_res("a", "source", None, "top", 0.0, 0.0, f32::NAN, 1.0), "non_finite"));
}

#[wasm_bindgen_test]
fn bad_enums_are_invalid_values() {
    let mut f = Flow::new();
    assert!(f.add_node("a", 0.0, 0.0, 10.0, 10.0));
    assert!(is_err(&f.set_connection_mode_res("sometimes"), "invalid_value"));
    assert!(is_err(&f.register_handle_res("a", "middle", None, "top", 0.0, 0.0, 1.0, 1.0), "invalid_value"));
    assert!(is_err(&f.register_handle_res("a", "source", None, "up", 0.0, 0.0, 1.0, 1.0), "invalid_value"));
    assert!(is_err(&f.start_connection_res("a", "both", None, 0.0, 0.0), "invalid_value"));
}

#[wasm_bindgen_test]
fn duplicates_are_reported() {
    let mut f = Flow::new();
    assert!(f.add_node("a", 0.0, 0.0, 10.0, 10.0));
    assert!(f.add_node("b", 50.0, 0.0, 10.0, 10.0));
    assert!(f.add_edge("e1", "a", "b"));
    let dup = f.add_edge_res(JSON::parse(r#"{"id":"e1","source":"b","target":"a"}"#).unwrap());
    assert!(is_err(&dup, "duplicate_edge"));

    assert!(!is_err(&f.register_handle_res("a", "source", Some("h".into()), "right", 8.0, 3.0, 4.0, 4.0), "duplicate_handle"));
    let again = f.register_handle_res("a", "source", Some("h".into()), "right", 8.0, 3.0, 4.0, 4.0);
    assert!(is_err(&again, "duplicate_handle"));
    assert!(is_err(&f.select_edges_res(JSON::parse(r#"["e1","zz"]"#).unwrap()), "invalid_id"));
}

#[wasm_bindgen_test]
fn malformed_objects_are_invalid_input() {
    let mut f = Flow::new();
    assert!(is_err(&f.upsert_node_res(JsValue::from_str("not a node")), "invalid_input"));
    assert!(is_err(&f.set_config_res(JSON::parse(r#"{"connectionMode":7}"#).unwrap()), "invalid_config"));
    assert!(is_err(&f.set_config_res(JSON::parse(r#"{"edgeUpdaterRadius":-1}"#).unwrap()), "invalid_value"));
    assert!(is_err(&f.release_res(JSON::parse(r#"{"nodeId":1}"#).unwrap()), "invalid_input"));
    let anonymous = f.add_edge_res(JSON::parse(r#"{"source":"a","target":"b"}"#).unwrap());
    assert!(is_err(&anonymous, "invalid_input"));
    assert_eq!(error_data(&anonymous, "param").as_deref(), Some("edge"));
}
