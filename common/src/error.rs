use thiserror::Error;

/// Everything a widget flow can fail with. All of these are handled inside
/// the flow that raised them; none reaches the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Microphone permission denied: {0}")]
    Permission(String),

    #[error("Microphone unavailable: {0}")]
    Device(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server rejected request: {0}")]
    Server(String),

    #[error("Browser call failed: {0}")]
    Platform(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WidgetError {
    /// The bare detail text, without the category prefix used by `Display`.
    pub fn detail(&self) -> &str {
        match self {
            WidgetError::Permission(detail)
            | WidgetError::Device(detail)
            | WidgetError::Validation(detail)
            | WidgetError::Network(detail)
            | WidgetError::Server(detail)
            | WidgetError::Platform(detail)
            | WidgetError::Config(detail) => detail,
        }
    }
}
