use serde::{Deserialize, Serialize};
use crate::error::WidgetError;
use crate::protocol::{DELETE_ENDPOINT, SAVE_ENDPOINT, UPLOAD_ENDPOINT, UPLOAD_FILE_FIELD};

/// Page-supplied widget configuration. Every section falls back to its
/// defaults, so a page only needs to pass the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// DOM ids the widgets bind to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub start_button: String,
    pub stop_button: String,
    pub save_button: String,
    pub save_container: String,
    pub recorded_audio: String,
    pub recording_indicator: String,
    pub recording_status: String,
    pub timer: String,
    pub upload_form: String,
    pub upload_file: String,
    pub upload_status: String,
    pub uploaded_audio: String,
    pub delete_button: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub save: String,
    pub upload: String,
    pub delete: String,
}

/// User-facing texts. Failure prefixes are followed by the error detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub recording_done: String,
    pub recording_failed: String,
    pub nothing_to_save: String,
    pub no_file_selected: String,
    pub save_failed: String,
    pub upload_failed: String,
    pub delete_failed: String,
    pub delete_confirm: String,
    pub server_error_fallback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    /// Recorder timeslice; one chunk is emitted per interval
    pub chunk_interval_ms: u32,
    pub tick_interval_ms: u32,
    /// Pause between a successful save/upload and the page reload
    pub reload_delay_ms: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            endpoints: Endpoints::default(),
            messages: Messages::default(),
            timing: Timing::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            start_button: "startRecordButton".to_string(),
            stop_button: "stopRecordButton".to_string(),
            save_button: "saveRecordingButton".to_string(),
            save_container: "saveRecordingDiv".to_string(),
            recorded_audio: "recordedAudio".to_string(),
            recording_indicator: "recordingIndicator".to_string(),
            recording_status: "recordingStatus".to_string(),
            timer: "timer".to_string(),
            upload_form: "uploadForm".to_string(),
            upload_file: UPLOAD_FILE_FIELD.to_string(),
            upload_status: "uploadStatus".to_string(),
            uploaded_audio: "uploadedAudio".to_string(),
            delete_button: "deleteRecordingButton".to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            save: SAVE_ENDPOINT.to_string(),
            upload: UPLOAD_ENDPOINT.to_string(),
            delete: DELETE_ENDPOINT.to_string(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            recording_done: "錄音完成！".to_string(),
            recording_failed: "錄音失敗: ".to_string(),
            nothing_to_save: "沒有可保存的錄音".to_string(),
            no_file_selected: "請選擇要上傳的音頻文件".to_string(),
            save_failed: "保存失敗: ".to_string(),
            upload_failed: "上傳失敗: ".to_string(),
            delete_failed: "刪除失敗: ".to_string(),
            delete_confirm: "確定要刪除此錄音嗎？".to_string(),
            server_error_fallback: "未知錯誤".to_string(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            chunk_interval_ms: 200,
            tick_interval_ms: 1000,
            reload_delay_ms: 1500,
        }
    }
}

/// Longest MediaRecorder timeslice accepted from a page.
pub const MAX_CHUNK_INTERVAL_MS: u32 = 60_000;

/// Save and upload never reload sooner than this.
pub const MIN_RELOAD_DELAY_MS: u32 = 1500;

impl WidgetConfig {
    /// Reads a page-supplied configuration. Shape errors become
    /// `WidgetError::Config`.
    pub fn deserialize_from<'de, D>(deserializer: D) -> Result<Self, WidgetError>
    where
        D: serde::Deserializer<'de>,
    {
        Self::deserialize(deserializer).map_err(|e| WidgetError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.timing.chunk_interval_ms == 0 {
            return Err(WidgetError::Config("chunk interval must be positive".to_string()));
        }
        if self.timing.chunk_interval_ms > MAX_CHUNK_INTERVAL_MS {
            return Err(WidgetError::Config(format!(
                "chunk interval must be at most {}ms",
                MAX_CHUNK_INTERVAL_MS
            )));
        }
        if self.timing.reload_delay_ms < MIN_RELOAD_DELAY_MS {
            return Err(WidgetError::Config(format!(
                "reload delay must be at least {}ms",
                MIN_RELOAD_DELAY_MS
            )));
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(WidgetError::Config("tick interval must be positive".to_string()));
        }
        for (name, path) in [
            ("save", &self.endpoints.save),
            ("upload", &self.endpoints.upload),
            ("delete", &self.endpoints.delete),
        ] {
            if path.trim().is_empty() {
                return Err(WidgetError::Config(format!("{} endpoint is empty", name)));
            }
        }
        Ok(())
    }
}
