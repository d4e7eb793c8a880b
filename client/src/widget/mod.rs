//! The three page flows (record/save, upload, delete), written against the
//! capability traits in [`capabilities`] so they run on the browser backend in
//! `crate::dom` as well as on the in-memory fakes used by the tests.

pub mod capabilities;
pub mod session;
pub mod recording;
pub mod upload;
pub mod delete;

#[cfg(test)]
pub(crate) mod testing;

pub use capabilities::{AudioChunk, Capture, Microphone, Page, RecordingView, Transport, UploadView};
pub use delete::DeleteWidget;
pub use recording::RecordingWidget;
pub use session::{ChunkBuffer, RecorderPhase, RecordingSession, TimerState};
pub use upload::UploadWidget;

use common::{ServerReply, WidgetError};

/// Reduces a request outcome to the text to show: `Ok` for an accepted
/// request, `Err` for a rejected or failed one. Server rejections are shown
/// verbatim; transport failures get `failure_prefix` in front of the detail.
pub(crate) fn settle(
    outcome: Result<ServerReply, WidgetError>,
    failure_prefix: &str,
    fallback: &str,
) -> Result<String, String> {
    match outcome.and_then(|reply| reply.into_result(fallback)) {
        Ok(message) => Ok(message),
        Err(WidgetError::Server(error)) => Err(error),
        Err(other) => Err(format!("{}{}", failure_prefix, other.detail())),
    }
}
