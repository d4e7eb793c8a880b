use common::WidgetError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

/// Human-readable text of a thrown JS value
pub fn js_detail(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return exception.message();
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn js_error_name(value: &JsValue) -> Option<String> {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return Some(exception.name());
    }
    value
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.name()))
}

/// Maps a `getUserMedia`/`MediaRecorder` failure to a permission or device error.
pub fn classify_media_error(value: JsValue) -> WidgetError {
    let name = js_error_name(&value).unwrap_or_default();
    classify_by_name(&name, js_detail(&value))
}

pub fn classify_by_name(name: &str, detail: String) -> WidgetError {
    match name {
        "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => WidgetError::Permission(detail),
        _ => WidgetError::Device(detail),
    }
}

pub fn network_error(value: JsValue) -> WidgetError {
    WidgetError::Network(js_detail(&value))
}

pub fn platform_error(value: JsValue) -> WidgetError {
    WidgetError::Platform(js_detail(&value))
}
