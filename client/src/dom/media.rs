use async_trait::async_trait;
use common::{AudioConstraints, WidgetError};
use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, MediaRecorder, MediaStream, MediaStreamConstraints, MediaStreamTrack,
    RecordingState, Url,
};

use crate::dom::error::{classify_media_error, platform_error};
use crate::widget::capabilities::{AudioChunk, Capture, Microphone};
use crate::widget::session::ChunkBuffer;

impl AudioChunk for Blob {
    fn byte_len(&self) -> u64 {
        self.size() as u64
    }
}

pub async fn get_microphone_stream(constraints: &AudioConstraints) -> Result<MediaStream, WidgetError> {
    let window = web_sys::window().ok_or_else(|| WidgetError::Device("No window".to_string()))?;
    let media_devices = window.navigator().media_devices().map_err(classify_media_error)?;

    let audio = serde_wasm_bindgen::to_value(constraints)
        .map_err(|e| WidgetError::Platform(e.to_string()))?;
    let request = MediaStreamConstraints::new();
    request.set_audio(&audio);

    let promise = media_devices
        .get_user_media_with_constraints(&request)
        .map_err(classify_media_error)?;
    let stream_js = JsFuture::from(promise).await.map_err(classify_media_error)?;
    stream_js
        .dyn_into::<MediaStream>()
        .map_err(|_| WidgetError::Device("getUserMedia resolved without a stream".to_string()))
}

pub fn stop_stream(stream: &MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        let track = MediaStreamTrack::from(tracks.get(i));
        track.stop();
    }
}

/// Microphone backed by `getUserMedia` and `MediaRecorder`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserMicrophone;

#[async_trait(?Send)]
impl Microphone for BrowserMicrophone {
    type Chunk = Blob;
    type Capture = BrowserCapture;
    type Recording = Blob;

    async fn open(
        &self,
        constraints: &AudioConstraints,
        timeslice_ms: u32,
        sink: ChunkBuffer<Blob>,
    ) -> Result<BrowserCapture, WidgetError> {
        let stream = get_microphone_stream(constraints).await?;
        log::debug!("[Recorder] Microphone stream {} acquired", stream.id());
        BrowserCapture::start(stream, timeslice_ms, sink)
    }

    fn assemble(&self, chunks: &[Blob], mime: &str) -> Result<Blob, WidgetError> {
        let parts = js_sys::Array::new();
        for chunk in chunks {
            parts.push(chunk);
        }
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        Blob::new_with_blob_sequence_and_options(&parts, &options).map_err(platform_error)
    }

    fn preview_url(&self, recording: &Blob) -> Result<String, WidgetError> {
        Url::create_object_url_with_blob(recording).map_err(platform_error)
    }

    fn release_url(&self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            log::warn!("[Recorder] Failed to revoke {}: {:?}", url, e);
        }
    }
}

/// A `MediaRecorder` running over a microphone stream. Chunks go straight
/// into the session's buffer from the `dataavailable` handler.
pub struct BrowserCapture {
    recorder: MediaRecorder,
    stream: MediaStream,
    stopped: Option<oneshot::Receiver<()>>,
    _on_data: Closure<dyn FnMut(web_sys::Event)>,
    _on_stop: Closure<dyn FnMut(web_sys::Event)>,
}

impl BrowserCapture {
    fn start(stream: MediaStream, timeslice_ms: u32, sink: ChunkBuffer<Blob>) -> Result<Self, WidgetError> {
        let recorder = match MediaRecorder::new_with_media_stream(&stream) {
            Ok(recorder) => recorder,
            Err(e) => {
                stop_stream(&stream);
                return Err(classify_media_error(e));
            }
        };

        let on_data = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let data = js_sys::Reflect::get(&event, &"data".into())
                .ok()
                .and_then(|data| data.dyn_into::<Blob>().ok());
            if let Some(blob) = data {
                if !sink.push(blob) {
                    log::trace!("[Recorder] Skipped empty chunk");
                }
            }
        }) as Box<dyn FnMut(_)>);
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));

        let (tx, rx) = oneshot::channel();
        let mut tx = Some(tx);
        let on_stop = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        }) as Box<dyn FnMut(_)>);
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        let capture = Self {
            recorder,
            stream,
            stopped: Some(rx),
            _on_data: on_data,
            _on_stop: on_stop,
        };

        let time_slice = i32::try_from(timeslice_ms).map_err(|_| {
            stop_stream(&capture.stream);
            WidgetError::Config(format!("timeslice {}ms out of range", timeslice_ms))
        })?;
        if let Err(e) = capture.recorder.start_with_time_slice(time_slice) {
            stop_stream(&capture.stream);
            return Err(classify_media_error(e));
        }
        log::debug!(
            "[Recorder] MediaRecorder started ({}, {}ms timeslice)",
            capture.recorder.mime_type(),
            timeslice_ms
        );
        Ok(capture)
    }
}

#[async_trait(?Send)]
impl Capture for BrowserCapture {
    async fn halt(&mut self) -> Result<(), WidgetError> {
        let Some(stopped) = self.stopped.take() else {
            return Ok(());
        };
        if self.recorder.state() == RecordingState::Inactive {
            return Ok(());
        }
        self.recorder.stop().map_err(platform_error)?;
        // the final dataavailable is dispatched before stop
        stopped
            .await
            .map_err(|_| WidgetError::Platform("recorder dropped before stopping".to_string()))
    }

    fn release_tracks(&mut self) {
        stop_stream(&self.stream);
    }
}

impl Drop for BrowserCapture {
    fn drop(&mut self) {
        self.recorder.set_ondataavailable(None);
        self.recorder.set_onstop(None);
    }
}
