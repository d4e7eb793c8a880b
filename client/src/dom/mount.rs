use std::cell::Cell;
use std::rc::Rc;

use common::WidgetConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget};

use crate::dom::{BrowserMicrophone, BrowserPage, FetchTransport, RecordingDom, UploadDom};
use crate::widget::{DeleteWidget, RecordingWidget, UploadWidget};

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Runs `bind` unless an earlier call already bound successfully. A failed
/// bind leaves the page unmounted so `mount()` can be called again.
fn mount_once<E>(bind: impl FnOnce() -> Result<(), E>) -> Result<bool, E> {
    if MOUNTED.with(Cell::get) {
        return Ok(false);
    }
    bind()?;
    MOUNTED.with(|mounted| mounted.set(true));
    Ok(true)
}

/// Binds every widget whose elements are on the page. Widgets and their
/// listeners live for the rest of the page's lifetime.
pub fn mount_all(document: &Document, config: WidgetConfig) -> Result<(), JsValue> {
    let mounted = mount_once(|| -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let page = BrowserPage::new(window);
        let config = Rc::new(config);

        let recording = mount_recording(document, &config, &page)?;
        let upload = mount_upload(document, &config, &page)?;
        let delete = mount_delete(document, &config, &page)?;

        log::info!(
            "[Mount] recording={} upload={} delete={}",
            recording,
            upload,
            delete
        );
        Ok(())
    })?;
    if !mounted {
        log::warn!("[Mount] Widgets already mounted, ignoring");
    }
    Ok(())
}

fn mount_recording(
    document: &Document,
    config: &Rc<WidgetConfig>,
    page: &BrowserPage,
) -> Result<bool, JsValue> {
    let Some(dom) = RecordingDom::find(document, &config.elements) else {
        log::debug!("[Mount] Recording controls not found, skipping");
        return Ok(false);
    };

    let start_button = dom.start_button.clone();
    let stop_button = dom.stop_button.clone();
    let save_button = dom.save_button.clone();
    let widget = RecordingWidget::new(
        Rc::clone(config),
        BrowserMicrophone,
        FetchTransport,
        page.clone(),
        dom,
    );

    let on_start = Rc::clone(&widget);
    listen(&start_button, "click", move |_event| {
        let widget = Rc::clone(&on_start);
        spawn_local(async move { widget.start().await });
    })?;

    let on_stop = Rc::clone(&widget);
    listen(&stop_button, "click", move |_event| {
        let widget = Rc::clone(&on_stop);
        spawn_local(async move { widget.stop().await });
    })?;

    if let Some(save_button) = save_button {
        let on_save = Rc::clone(&widget);
        listen(&save_button, "click", move |_event| {
            let widget = Rc::clone(&on_save);
            spawn_local(async move { widget.save().await });
        })?;
    }

    Ok(true)
}

fn mount_upload(
    document: &Document,
    config: &Rc<WidgetConfig>,
    page: &BrowserPage,
) -> Result<bool, JsValue> {
    let Some(dom) = UploadDom::find(document, &config.elements) else {
        log::debug!("[Mount] Upload form not found, skipping");
        return Ok(false);
    };

    let form = dom.form.clone();
    let widget = UploadWidget::new(Rc::clone(config), dom, FetchTransport, page.clone());

    listen(&form, "submit", move |event| {
        event.prevent_default();
        let widget = Rc::clone(&widget);
        spawn_local(async move { widget.submit().await });
    })?;

    Ok(true)
}

fn mount_delete(
    document: &Document,
    config: &Rc<WidgetConfig>,
    page: &BrowserPage,
) -> Result<bool, JsValue> {
    let Some(button) = document.get_element_by_id(&config.elements.delete_button) else {
        log::debug!("[Mount] Delete button not found, skipping");
        return Ok(false);
    };

    let widget = DeleteWidget::new(Rc::clone(config), FetchTransport, page.clone());

    listen(&button, "click", move |_event| {
        let widget = Rc::clone(&widget);
        spawn_local(async move { widget.trigger().await });
    })?;

    Ok(true)
}
