use std::cell::RefCell;

use common::{ElementIds, Status, WidgetError};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, File, HtmlAudioElement, HtmlButtonElement, HtmlElement, HtmlFormElement,
    HtmlInputElement, Url,
};

use crate::dom::error::platform_error;
use crate::widget::capabilities::{RecordingView, UploadView};

pub fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn set_shown(element: &HtmlElement, shown: bool) {
    let display = if shown { "block" } else { "none" };
    if let Err(e) = element.style().set_property("display", display) {
        log::warn!("[Ui] Failed to set display on #{}: {:?}", element.id(), e);
    }
}

fn render_status(region: Option<&Element>, status: Option<&Status>) {
    if let Some(region) = region {
        region.set_inner_html(&status.map(Status::to_html).unwrap_or_default());
    }
}

/// Elements of the record/save flow. Only the start and stop buttons are
/// required; every other region is updated when present.
pub struct RecordingDom {
    pub start_button: HtmlButtonElement,
    pub stop_button: HtmlButtonElement,
    pub save_button: Option<HtmlElement>,
    save_container: Option<HtmlElement>,
    preview: Option<HtmlAudioElement>,
    indicator: Option<HtmlElement>,
    status: Option<Element>,
    timer: Option<HtmlElement>,
}

impl RecordingDom {
    pub fn find(document: &Document, ids: &ElementIds) -> Option<Self> {
        let start_button = element(document, &ids.start_button)?;
        let stop_button = element(document, &ids.stop_button)?;
        Some(Self {
            start_button,
            stop_button,
            save_button: element(document, &ids.save_button),
            save_container: element(document, &ids.save_container),
            preview: element(document, &ids.recorded_audio),
            indicator: element(document, &ids.recording_indicator),
            status: document.get_element_by_id(&ids.recording_status),
            timer: element(document, &ids.timer),
        })
    }

    fn set_recording_controls(&self, recording: bool) {
        self.start_button.set_disabled(recording);
        self.stop_button.set_disabled(!recording);
        if let Some(indicator) = &self.indicator {
            set_shown(indicator, recording);
        }
        if let Some(timer) = &self.timer {
            set_shown(timer, recording);
        }
    }
}

impl RecordingView for RecordingDom {
    fn show_recording(&self) {
        self.set_recording_controls(true);
        render_status(self.status.as_ref(), None);
        if let Some(preview) = &self.preview {
            set_shown(preview, false);
        }
        if let Some(container) = &self.save_container {
            set_shown(container, false);
        }
    }

    fn show_stopped(&self, preview_url: &str) {
        if let Some(preview) = &self.preview {
            preview.set_src(preview_url);
            set_shown(preview, true);
        }
        if let Some(container) = &self.save_container {
            set_shown(container, true);
        }
        self.set_recording_controls(false);
    }

    fn show_idle(&self) {
        self.set_recording_controls(false);
    }

    fn set_timer(&self, text: &str) {
        if let Some(timer) = &self.timer {
            timer.set_text_content(Some(text));
        }
    }

    fn show_status(&self, status: &Status) {
        render_status(self.status.as_ref(), Some(status));
    }
}

/// Elements of the upload flow. The file input is looked up on every
/// submission, like the form's own fields.
pub struct UploadDom {
    pub form: HtmlFormElement,
    document: Document,
    file_input_id: String,
    status: Option<Element>,
    preview: Option<HtmlAudioElement>,
    preview_url: RefCell<Option<String>>,
}

impl UploadDom {
    pub fn find(document: &Document, ids: &ElementIds) -> Option<Self> {
        let form = element(document, &ids.upload_form)?;
        Some(Self {
            form,
            document: document.clone(),
            file_input_id: ids.upload_file.clone(),
            status: document.get_element_by_id(&ids.upload_status),
            preview: element(document, &ids.uploaded_audio),
            preview_url: RefCell::new(None),
        })
    }
}

impl UploadView for UploadDom {
    type File = File;
    type Form = HtmlFormElement;

    fn selected_file(&self) -> Option<File> {
        element::<HtmlInputElement>(&self.document, &self.file_input_id)?
            .files()?
            .get(0)
    }

    fn form(&self) -> HtmlFormElement {
        self.form.clone()
    }

    fn show_preview(&self, file: &File) -> Result<(), WidgetError> {
        let url = Url::create_object_url_with_blob(file).map_err(platform_error)?;
        if let Some(preview) = &self.preview {
            preview.set_src(&url);
            set_shown(preview, true);
        }
        if let Some(stale) = self.preview_url.replace(Some(url)) {
            let _ = Url::revoke_object_url(&stale);
        }
        Ok(())
    }

    fn show_status(&self, status: &Status) {
        render_status(self.status.as_ref(), Some(status));
    }
}
