use std::rc::Rc;

use common::{Status, WidgetConfig, WidgetError};

use crate::widget::capabilities::{Page, Transport, UploadView};
use crate::widget::settle;

/// Upload of a file picked from disk. The preview is shown before the
/// request goes out and stays regardless of how the request ends.
pub struct UploadWidget<V, T, P> {
    config: Rc<WidgetConfig>,
    view: V,
    transport: T,
    page: P,
}

impl<V, T, P> UploadWidget<V, T, P>
where
    V: UploadView,
    T: Transport<Form = V::Form>,
    P: Page,
{
    pub fn new(config: Rc<WidgetConfig>, view: V, transport: T, page: P) -> Rc<Self> {
        Rc::new(Self {
            config,
            view,
            transport,
            page,
        })
    }

    pub async fn submit(&self) {
        let Some(file) = self.view.selected_file() else {
            let err = WidgetError::Validation(self.config.messages.no_file_selected.clone());
            log::warn!("[Upload] {}", err);
            self.view.show_status(&Status::danger(err.detail()));
            return;
        };

        if let Err(e) = self.view.show_preview(&file) {
            log::warn!("[Upload] Preview unavailable: {}", e);
        }

        let form = self.view.form();
        let outcome = self
            .transport
            .post_form(&self.config.endpoints.upload, &form)
            .await;

        match settle(
            outcome,
            &self.config.messages.upload_failed,
            &self.config.messages.server_error_fallback,
        ) {
            Ok(message) => {
                log::info!("[Upload] Upload accepted");
                self.view.show_status(&Status::success(message));
                self.page.reload_after(self.config.timing.reload_delay_ms);
            }
            Err(text) => {
                log::warn!("[Upload] Upload failed: {}", text);
                self.view.show_status(&Status::danger(text));
            }
        }
    }
}
