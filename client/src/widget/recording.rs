use std::cell::RefCell;
use std::rc::Rc;

use common::{
    format_elapsed, recording_filename, AudioConstraints, Status, WidgetConfig, WidgetError,
    AUDIO_DATA_FIELD, RECORDING_MIME,
};

use crate::widget::capabilities::{Capture, Microphone, Page, RecordingView, Transport};
use crate::widget::session::{ChunkBuffer, RecorderPhase, RecordingSession};
use crate::widget::settle;

struct RecorderState<M: Microphone, P: Page> {
    phase: RecorderPhase,
    session: Option<RecordingSession<M, P>>,
}

/// Record, stop, preview and save flow.
///
/// State lives in a `RefCell` that is only borrowed between await points,
/// so button handlers spawned on the event loop can interleave freely.
pub struct RecordingWidget<M: Microphone, T, P: Page, V> {
    config: Rc<WidgetConfig>,
    microphone: M,
    transport: T,
    page: P,
    view: V,
    state: RefCell<RecorderState<M, P>>,
}

impl<M, T, P, V> RecordingWidget<M, T, P, V>
where
    M: Microphone + 'static,
    T: Transport<File = M::Recording> + 'static,
    P: Page + 'static,
    V: RecordingView + 'static,
{
    pub fn new(config: Rc<WidgetConfig>, microphone: M, transport: T, page: P, view: V) -> Rc<Self> {
        Rc::new(Self {
            config,
            microphone,
            transport,
            page,
            view,
            state: RefCell::new(RecorderState {
                phase: RecorderPhase::Idle,
                session: None,
            }),
        })
    }

    pub fn phase(&self) -> RecorderPhase {
        self.state.borrow().phase
    }

    pub fn elapsed_seconds(&self) -> Option<u32> {
        self.state
            .borrow()
            .session
            .as_ref()
            .map(RecordingSession::elapsed_seconds)
    }

    pub fn has_recording(&self) -> bool {
        self.state
            .borrow()
            .session
            .as_ref()
            .is_some_and(|session| session.final_blob.is_some())
    }

    pub async fn start(self: &Rc<Self>) {
        let previous = {
            let mut state = self.state.borrow_mut();
            if !state.phase.can_start() {
                log::debug!("[Recorder] Start ignored while {:?}", state.phase);
                return;
            }
            let previous = state.phase;
            state.phase = RecorderPhase::Requesting;
            previous
        };

        let chunks = ChunkBuffer::new();
        let opened = self
            .microphone
            .open(
                &AudioConstraints::default(),
                self.config.timing.chunk_interval_ms,
                chunks.clone(),
            )
            .await;

        let capture = match opened {
            Ok(capture) => capture,
            Err(e) => {
                log::error!("[Recorder] Recording failed: {}", e);
                self.state.borrow_mut().phase = previous;
                self.view.show_status(&Status::danger(format!(
                    "{}{}",
                    self.config.messages.recording_failed,
                    e.detail()
                )));
                return;
            }
        };

        let weak = Rc::downgrade(self);
        let ticker = self.page.every(
            self.config.timing.tick_interval_ms,
            Box::new(move || {
                if let Some(widget) = weak.upgrade() {
                    widget.tick();
                }
            }),
        );

        let stale_url = {
            let mut state = self.state.borrow_mut();
            let replaced = state
                .session
                .replace(RecordingSession::new(chunks, capture, ticker));
            state.phase = RecorderPhase::Recording;
            replaced.and_then(|session| session.preview_url)
        };
        if let Some(url) = stale_url {
            self.microphone.release_url(&url);
        }

        self.view.show_recording();
        self.view.set_timer(&format_elapsed(0));
        log::info!("[Recorder] Recording started");
    }

    /// Advances the on-screen timer by one second while recording.
    pub fn tick(&self) {
        let elapsed = {
            let mut state = self.state.borrow_mut();
            if state.phase != RecorderPhase::Recording {
                return;
            }
            match state.session.as_mut().and_then(|session| session.timer.advance()) {
                Some(elapsed) => elapsed,
                None => return,
            }
        };
        self.view.set_timer(&format_elapsed(elapsed));
    }

    /// No-op unless a capture is running.
    pub async fn stop(&self) {
        let mut capture = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if !state.phase.can_stop() {
                log::debug!("[Recorder] Stop ignored: no active capture");
                return;
            }
            let Some(capture) = state.session.as_mut().and_then(|session| session.capture.take())
            else {
                return;
            };
            state.phase = RecorderPhase::Finalizing;
            capture
        };

        let halted = capture.halt().await;
        capture.release_tracks();
        drop(capture);

        let finished = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            match state.session.as_mut() {
                Some(session) => {
                    session.timer.cancel();
                    let elapsed = session.elapsed_seconds();
                    let assembled = halted
                        .and_then(|()| {
                            let chunks = session.chunks.drain();
                            log::debug!("[Recorder] Assembling {} chunks", chunks.len());
                            self.microphone.assemble(&chunks, RECORDING_MIME)
                        })
                        .and_then(|blob| {
                            let url = self.microphone.preview_url(&blob)?;
                            Ok((blob, url))
                        });
                    match assembled {
                        Ok((blob, url)) => {
                            session.final_blob = Some(blob);
                            session.preview_url = Some(url.clone());
                            state.phase = RecorderPhase::Stopped;
                            Ok((url, elapsed))
                        }
                        Err(e) => {
                            state.phase = RecorderPhase::Idle;
                            Err(e)
                        }
                    }
                }
                None => {
                    state.phase = RecorderPhase::Idle;
                    Err(WidgetError::Platform("recording session vanished".to_string()))
                }
            }
        };

        match finished {
            Ok((url, elapsed)) => {
                self.view.show_stopped(&url);
                self.view
                    .show_status(&Status::success(self.config.messages.recording_done.as_str()));
                log::info!("[Recorder] Recording stopped after {}", format_elapsed(elapsed));
            }
            Err(e) => {
                log::error!("[Recorder] Stopping failed: {}", e);
                self.view.show_idle();
                self.view.show_status(&Status::danger(format!(
                    "{}{}",
                    self.config.messages.recording_failed,
                    e.detail()
                )));
            }
        }
    }

    /// Uploads the last finished take; reloads the page once the server
    /// accepts it.
    pub async fn save(&self) {
        let blob = self
            .state
            .borrow()
            .session
            .as_ref()
            .and_then(|session| session.final_blob.clone());

        let Some(blob) = blob else {
            let err = WidgetError::Validation(self.config.messages.nothing_to_save.clone());
            log::warn!("[Recorder] {}", err);
            self.view.show_status(&Status::danger(err.detail()));
            return;
        };

        let outcome = self
            .transport
            .post_file(
                &self.config.endpoints.save,
                AUDIO_DATA_FIELD,
                &blob,
                &recording_filename(),
            )
            .await;

        match settle(
            outcome,
            &self.config.messages.save_failed,
            &self.config.messages.server_error_fallback,
        ) {
            Ok(message) => {
                log::info!("[Recorder] Recording saved");
                self.view.show_status(&Status::success(message));
                self.page.reload_after(self.config.timing.reload_delay_ms);
            }
            Err(text) => {
                log::warn!("[Recorder] Save failed: {}", text);
                self.view.show_status(&Status::danger(text));
            }
        }
    }
}
