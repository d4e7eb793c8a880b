//! In-memory capability fakes for the widget tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ops::Deref;
use std::rc::Rc;

use async_trait::async_trait;
use common::{AudioConstraints, ServerReply, Status, WidgetError};
use futures::channel::oneshot;

use crate::widget::capabilities::*;
use crate::widget::session::ChunkBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeChunk(pub u64);

impl AudioChunk for FakeChunk {
    fn byte_len(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRecording {
    pub chunks: Vec<FakeChunk>,
    pub mime: String,
}

impl FakeRecording {
    pub fn bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.0).sum()
    }
}

#[derive(Default)]
pub struct MicState {
    fail_with: RefCell<Option<WidgetError>>,
    pub opened: Cell<usize>,
    pub constraints: RefCell<Vec<AudioConstraints>>,
    pub timeslices: RefCell<Vec<u32>>,
    sinks: RefCell<Vec<ChunkBuffer<FakeChunk>>>,
    /// Streams whose tracks have not been stopped yet
    pub live_streams: Cell<usize>,
    /// Size of the chunk flushed when the capture halts; 0 flushes nothing
    pub tail_chunk: Cell<u64>,
    pub halt_error: RefCell<Option<WidgetError>>,
    open_gate: RefCell<Option<oneshot::Receiver<()>>>,
    halt_gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub assembled: RefCell<Vec<FakeRecording>>,
    urls_made: Cell<usize>,
    pub revoked: RefCell<Vec<String>>,
}

#[derive(Clone, Default)]
pub struct FakeMicrophone {
    inner: Rc<MicState>,
}

impl Deref for FakeMicrophone {
    type Target = MicState;

    fn deref(&self) -> &MicState {
        &self.inner
    }
}

impl FakeMicrophone {
    /// The next `open` fails with `err`; later ones succeed.
    pub fn fail_next(&self, err: WidgetError) {
        self.fail_with.replace(Some(err));
    }

    /// The next `open` waits until the returned sender fires or drops.
    pub fn hold_open(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.open_gate.replace(Some(rx));
        tx
    }

    /// The next `halt` waits until the returned sender fires or drops.
    pub fn hold_halt(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.halt_gate.replace(Some(rx));
        tx
    }

    /// Delivers a chunk from the most recently opened capture.
    pub fn emit(&self, bytes: u64) {
        if let Some(sink) = self.sinks.borrow().last() {
            sink.push(FakeChunk(bytes));
        }
    }
}

pub struct FakeCapture {
    mic: Rc<MicState>,
    sink: ChunkBuffer<FakeChunk>,
    released: bool,
}

#[async_trait(?Send)]
impl Capture for FakeCapture {
    async fn halt(&mut self) -> Result<(), WidgetError> {
        let gate = self.mic.halt_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(err) = self.mic.halt_error.borrow_mut().take() {
            return Err(err);
        }
        let tail = self.mic.tail_chunk.get();
        if tail > 0 {
            self.sink.push(FakeChunk(tail));
        }
        Ok(())
    }

    fn release_tracks(&mut self) {
        if !self.released {
            self.released = true;
            self.mic.live_streams.set(self.mic.live_streams.get() - 1);
        }
    }
}

#[async_trait(?Send)]
impl Microphone for FakeMicrophone {
    type Chunk = FakeChunk;
    type Capture = FakeCapture;
    type Recording = FakeRecording;

    async fn open(
        &self,
        constraints: &AudioConstraints,
        timeslice_ms: u32,
        sink: ChunkBuffer<FakeChunk>,
    ) -> Result<FakeCapture, WidgetError> {
        let gate = self.open_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(err) = self.fail_with.borrow_mut().take() {
            return Err(err);
        }
        self.opened.set(self.opened.get() + 1);
        self.live_streams.set(self.live_streams.get() + 1);
        self.constraints.borrow_mut().push(*constraints);
        self.timeslices.borrow_mut().push(timeslice_ms);
        self.sinks.borrow_mut().push(sink.clone());
        Ok(FakeCapture {
            mic: Rc::clone(&self.inner),
            sink,
            released: false,
        })
    }

    fn assemble(&self, chunks: &[FakeChunk], mime: &str) -> Result<FakeRecording, WidgetError> {
        let recording = FakeRecording {
            chunks: chunks.to_vec(),
            mime: mime.to_string(),
        };
        self.assembled.borrow_mut().push(recording.clone());
        Ok(recording)
    }

    fn preview_url(&self, _recording: &FakeRecording) -> Result<String, WidgetError> {
        let n = self.urls_made.get() + 1;
        self.urls_made.set(n);
        Ok(format!("blob:fake/{}", n))
    }

    fn release_url(&self, url: &str) {
        self.revoked.borrow_mut().push(url.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeForm(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    File {
        endpoint: String,
        field: String,
        filename: String,
        bytes: u64,
    },
    Form {
        endpoint: String,
        form: FakeForm,
    },
    Empty {
        endpoint: String,
    },
}

#[derive(Default)]
pub struct TransportState {
    replies: RefCell<VecDeque<Result<ServerReply, WidgetError>>>,
    requests: RefCell<Vec<Request>>,
}

/// Records every request and answers from a queue of canned replies.
/// An empty queue answers with an accepted reply.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Rc<TransportState>,
}

impl FakeTransport {
    pub fn reply(&self, reply: Result<ServerReply, WidgetError>) {
        self.inner.replies.borrow_mut().push_back(reply);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner.requests.borrow().clone()
    }

    fn answer(&self, request: Request) -> Result<ServerReply, WidgetError> {
        self.inner.requests.borrow_mut().push(request);
        self.inner
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ServerReply::accepted("ok")))
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    type File = FakeRecording;
    type Form = FakeForm;

    async fn post_file(
        &self,
        endpoint: &str,
        field: &str,
        file: &FakeRecording,
        filename: &str,
    ) -> Result<ServerReply, WidgetError> {
        self.answer(Request::File {
            endpoint: endpoint.to_string(),
            field: field.to_string(),
            filename: filename.to_string(),
            bytes: file.bytes(),
        })
    }

    async fn post_form(&self, endpoint: &str, form: &FakeForm) -> Result<ServerReply, WidgetError> {
        self.answer(Request::Form {
            endpoint: endpoint.to_string(),
            form: form.clone(),
        })
    }

    async fn post_empty(&self, endpoint: &str) -> Result<ServerReply, WidgetError> {
        self.answer(Request::Empty {
            endpoint: endpoint.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    Now,
    After(u32),
}

struct TickEntry {
    alive: Rc<Cell<bool>>,
    period_ms: u32,
    tick: Box<dyn FnMut()>,
}

#[derive(Default)]
pub struct PageState {
    tickers: RefCell<Vec<TickEntry>>,
    reloads: RefCell<Vec<Reload>>,
    confirm_answer: Cell<bool>,
    pub prompts: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
}

/// Timers only fire when the test calls `fire_ticks`.
#[derive(Clone, Default)]
pub struct FakePage {
    inner: Rc<PageState>,
}

impl Deref for FakePage {
    type Target = PageState;

    fn deref(&self) -> &PageState {
        &self.inner
    }
}

pub struct FakeTicker(Rc<Cell<bool>>);

impl Drop for FakeTicker {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl FakePage {
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn fire_ticks(&self, count: usize) {
        let mut tickers = self.tickers.borrow_mut();
        for _ in 0..count {
            for entry in tickers.iter_mut() {
                if entry.alive.get() {
                    (entry.tick)();
                }
            }
        }
    }

    pub fn active_tickers(&self) -> usize {
        self.tickers.borrow().iter().filter(|e| e.alive.get()).count()
    }

    pub fn ticker_periods(&self) -> Vec<u32> {
        self.tickers.borrow().iter().map(|e| e.period_ms).collect()
    }

    pub fn reloads(&self) -> Vec<Reload> {
        self.reloads.borrow().clone()
    }
}

impl Page for FakePage {
    type Ticker = FakeTicker;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> FakeTicker {
        let alive = Rc::new(Cell::new(true));
        self.tickers.borrow_mut().push(TickEntry {
            alive: Rc::clone(&alive),
            period_ms,
            tick,
        });
        FakeTicker(alive)
    }

    fn reload(&self) {
        self.reloads.borrow_mut().push(Reload::Now);
    }

    fn reload_after(&self, delay_ms: u32) {
        self.reloads.borrow_mut().push(Reload::After(delay_ms));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.confirm_answer.get()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingViewState {
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub indicator_visible: bool,
    pub timer_visible: bool,
    pub timer: String,
    pub preview: Option<String>,
    pub save_visible: bool,
    pub status: Option<Status>,
}

#[derive(Clone)]
pub struct FakeRecordingView {
    state: Rc<RefCell<RecordingViewState>>,
}

impl FakeRecordingView {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(RecordingViewState {
                start_enabled: true,
                stop_enabled: false,
                indicator_visible: false,
                timer_visible: false,
                timer: String::new(),
                preview: None,
                save_visible: false,
                status: None,
            })),
        }
    }

    pub fn snapshot(&self) -> RecordingViewState {
        self.state.borrow().clone()
    }
}

impl RecordingView for FakeRecordingView {
    fn show_recording(&self) {
        let mut s = self.state.borrow_mut();
        s.start_enabled = false;
        s.stop_enabled = true;
        s.indicator_visible = true;
        s.timer_visible = true;
        s.status = None;
        s.preview = None;
        s.save_visible = false;
    }

    fn show_stopped(&self, preview_url: &str) {
        let mut s = self.state.borrow_mut();
        s.preview = Some(preview_url.to_string());
        s.save_visible = true;
        s.indicator_visible = false;
        s.timer_visible = false;
        s.start_enabled = true;
        s.stop_enabled = false;
    }

    fn show_idle(&self) {
        let mut s = self.state.borrow_mut();
        s.indicator_visible = false;
        s.timer_visible = false;
        s.start_enabled = true;
        s.stop_enabled = false;
    }

    fn set_timer(&self, text: &str) {
        self.state.borrow_mut().timer = text.to_string();
    }

    fn show_status(&self, status: &Status) {
        self.state.borrow_mut().status = Some(status.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFile(pub String);

#[derive(Default)]
pub struct UploadViewState {
    pub file: RefCell<Option<FakeFile>>,
    pub previews: RefCell<Vec<String>>,
    pub preview_error: RefCell<Option<WidgetError>>,
    pub status: RefCell<Option<Status>>,
}

#[derive(Clone, Default)]
pub struct FakeUploadView {
    inner: Rc<UploadViewState>,
}

impl Deref for FakeUploadView {
    type Target = UploadViewState;

    fn deref(&self) -> &UploadViewState {
        &self.inner
    }
}

impl FakeUploadView {
    pub fn choose(&self, name: &str) {
        self.file.replace(Some(FakeFile(name.to_string())));
    }

    pub fn status(&self) -> Option<Status> {
        self.status.borrow().clone()
    }
}

impl UploadView for FakeUploadView {
    type File = FakeFile;
    type Form = FakeForm;

    fn selected_file(&self) -> Option<FakeFile> {
        self.file.borrow().clone()
    }

    fn form(&self) -> FakeForm {
        FakeForm("uploadForm".to_string())
    }

    fn show_preview(&self, file: &FakeFile) -> Result<(), WidgetError> {
        if let Some(err) = self.preview_error.borrow_mut().take() {
            return Err(err);
        }
        self.previews.borrow_mut().push(file.0.clone());
        Ok(())
    }

    fn show_status(&self, status: &Status) {
        self.status.replace(Some(status.clone()));
    }
}
