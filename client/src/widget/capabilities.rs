use async_trait::async_trait;
use common::{AudioConstraints, ServerReply, Status, WidgetError};

use crate::widget::session::ChunkBuffer;

/// One fragment emitted by the recorder
pub trait AudioChunk {
    fn byte_len(&self) -> u64;
}

/// Microphone access plus the blob plumbing around a capture.
#[async_trait(?Send)]
pub trait Microphone {
    type Chunk: AudioChunk + 'static;
    type Capture: Capture;
    /// The assembled clip; also what gets uploaded on save
    type Recording: Clone;

    /// Acquires an audio stream and starts emitting a chunk into `sink` every
    /// `timeslice_ms`. Fails with `Permission` or `Device`.
    async fn open(
        &self,
        constraints: &AudioConstraints,
        timeslice_ms: u32,
        sink: ChunkBuffer<Self::Chunk>,
    ) -> Result<Self::Capture, WidgetError>;

    fn assemble(&self, chunks: &[Self::Chunk], mime: &str) -> Result<Self::Recording, WidgetError>;

    /// Locally playable reference to `recording`
    fn preview_url(&self, recording: &Self::Recording) -> Result<String, WidgetError>;

    fn release_url(&self, url: &str);
}

/// A running capture that owns the microphone stream.
#[async_trait(?Send)]
pub trait Capture {
    /// Stops capturing. Resolves once the last chunk has reached the sink.
    async fn halt(&mut self) -> Result<(), WidgetError>;

    /// Stops every track of the underlying stream so the device is released.
    fn release_tracks(&mut self);
}

#[async_trait(?Send)]
pub trait Transport {
    type File;
    type Form;

    /// Multipart POST with a single file part
    async fn post_file(
        &self,
        endpoint: &str,
        field: &str,
        file: &Self::File,
        filename: &str,
    ) -> Result<ServerReply, WidgetError>;

    /// Multipart POST of every field in `form`
    async fn post_form(&self, endpoint: &str, form: &Self::Form) -> Result<ServerReply, WidgetError>;

    async fn post_empty(&self, endpoint: &str) -> Result<ServerReply, WidgetError>;
}

/// Page-level facilities: timers, reloads and modal dialogs.
pub trait Page {
    /// Handle of a repeating tick; dropping it cancels the tick.
    type Ticker;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Ticker;

    fn reload(&self);

    fn reload_after(&self, delay_ms: u32);

    /// Blocks until the user answers
    fn confirm(&self, prompt: &str) -> bool;

    fn alert(&self, message: &str);
}

pub trait RecordingView {
    /// Start disabled, stop enabled, indicator and timer shown, status
    /// cleared, preview and save control hidden.
    fn show_recording(&self);

    /// Preview loaded from `preview_url` and shown, save control shown,
    /// indicator and timer hidden, start enabled, stop disabled.
    fn show_stopped(&self, preview_url: &str);

    /// Controls back to their initial state after a failed stop.
    fn show_idle(&self);

    fn set_timer(&self, text: &str);

    fn show_status(&self, status: &Status);
}

pub trait UploadView {
    type File;
    type Form;

    fn selected_file(&self) -> Option<Self::File>;

    fn form(&self) -> Self::Form;

    /// Shows `file` in the upload preview, replacing an earlier preview.
    fn show_preview(&self, file: &Self::File) -> Result<(), WidgetError>;

    fn show_status(&self, status: &Status);
}
