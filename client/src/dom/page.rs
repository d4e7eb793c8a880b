use gloo_timers::callback::{Interval, Timeout};
use web_sys::Window;

use crate::widget::capabilities::Page;

#[derive(Debug, Clone)]
pub struct BrowserPage {
    window: Window,
}

impl BrowserPage {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Page for BrowserPage {
    type Ticker = Interval;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, tick)
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            log::error!("[Page] Reload failed: {:?}", e);
        }
    }

    fn reload_after(&self, delay_ms: u32) {
        let location = self.window.location();
        Timeout::new(delay_ms, move || {
            if let Err(e) = location.reload() {
                log::error!("[Page] Reload failed: {:?}", e);
            }
        })
        .forget();
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.window.confirm_with_message(prompt).unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            log::warn!("[Page] Alert failed: {:?}", e);
        }
    }
}
