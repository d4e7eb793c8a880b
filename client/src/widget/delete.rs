use std::rc::Rc;

use common::WidgetConfig;

use crate::widget::capabilities::{Page, Transport};
use crate::widget::settle;

/// Confirm-then-delete of the stored recording. Results go to a blocking
/// alert rather than a status region.
pub struct DeleteWidget<T, P> {
    config: Rc<WidgetConfig>,
    transport: T,
    page: P,
}

impl<T: Transport, P: Page> DeleteWidget<T, P> {
    pub fn new(config: Rc<WidgetConfig>, transport: T, page: P) -> Rc<Self> {
        Rc::new(Self {
            config,
            transport,
            page,
        })
    }

    pub async fn trigger(&self) {
        if !self.page.confirm(&self.config.messages.delete_confirm) {
            log::debug!("[Delete] Declined");
            return;
        }

        let outcome = self.transport.post_empty(&self.config.endpoints.delete).await;

        match settle(
            outcome,
            &self.config.messages.delete_failed,
            &self.config.messages.server_error_fallback,
        ) {
            Ok(message) => {
                log::info!("[Delete] Recording deleted");
                self.page.alert(&message);
                self.page.reload();
            }
            Err(text) => {
                log::warn!("[Delete] Delete failed: {}", text);
                self.page.alert(&text);
            }
        }
    }
}
