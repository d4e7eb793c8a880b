use serde::{Deserialize, Serialize};
use crate::error::WidgetError;

/// Endpoint that stores a freshly recorded clip
pub const SAVE_ENDPOINT: &str = "/save_recorded_audio";
/// Endpoint that stores a file picked from disk
pub const UPLOAD_ENDPOINT: &str = "/upload_recording";
/// Endpoint that removes the stored recording
pub const DELETE_ENDPOINT: &str = "/delete_recording";

/// Multipart field carrying the recorded clip
pub const AUDIO_DATA_FIELD: &str = "audio_data";
/// File input inside the upload form
pub const UPLOAD_FILE_FIELD: &str = "audioFile";

/// Container the recorder output is tagged with
pub const RECORDING_MIME: &str = "audio/webm";
pub const RECORDING_EXTENSION: &str = "webm";

pub fn recording_filename() -> String {
    format!("recording.{}", RECORDING_EXTENSION)
}

/// Reply shape shared by every endpoint.
///
/// The server answers rejected requests with a 4xx status and a JSON body,
/// so the body is parsed regardless of the HTTP status. A missing `success`
/// field counts as a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerReply {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Turns the reply into the message to show on success, or a
    /// `WidgetError::Server` carrying the server's error text.
    /// `fallback` is used when a rejection carries no error text.
    pub fn into_result(self, fallback: &str) -> Result<String, WidgetError> {
        if self.success {
            Ok(self.message.unwrap_or_default())
        } else {
            Err(WidgetError::Server(
                self.error.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

/// Processing switches requested together with the microphone stream.
/// Serializes to the shape `getUserMedia` expects for its `audio` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}
