//! Browser recording widget: record from the microphone, preview and save
//! the take, upload an existing file, or delete the stored recording.
//!
//! Build with `wasm-pack build client --target web`, then from the page:
//!
//! ```js
//! import init, { mount } from "./pkg/readaloud_client.js";
//! await init();
//! mount();
//! ```

use std::cell::RefCell;
use std::str::FromStr;
use std::sync::Once;

use common::WidgetConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod dom;
pub mod widget;

static LOGGER: Once = Once::new();

fn init_logging(level: &str) {
    LOGGER.call_once(|| {
        let level = log::Level::from_str(level).unwrap_or(log::Level::Info);
        wasm_logger::init(wasm_logger::Config::new(level));
    });
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

/// Mounts the widgets with the default element ids and endpoints.
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    mount_with_config(JsValue::UNDEFINED)
}

/// Mounts the widgets with a partial configuration object, e.g.
/// `{ endpoints: { save: "/api/save" }, elements: { timer: "clock" } }`.
/// When the document is still loading, mounting waits for `DOMContentLoaded`.
#[wasm_bindgen]
pub fn mount_with_config(config: JsValue) -> Result<(), JsValue> {
    let config: WidgetConfig = if config.is_undefined() || config.is_null() {
        WidgetConfig::default()
    } else {
        WidgetConfig::deserialize_from(serde_wasm_bindgen::Deserializer::from(config))
            .map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    init_logging(&config.log_level);

    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    if document.ready_state() != "loading" {
        return dom::mount::mount_all(&document, config);
    }

    log::debug!("[Mount] Document still loading, deferring");
    let pending = RefCell::new(Some(config));
    let ready_document = document.clone();
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(config) = pending.borrow_mut().take() {
            if let Err(e) = dom::mount::mount_all(&ready_document, config) {
                log::error!("[Mount] Failed: {:?}", e);
            }
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
