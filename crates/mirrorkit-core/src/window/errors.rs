use crate::errors::MirrorError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("No window found for process '{pid}'")]
    NotFound { pid: u32 },

    #[error("No live window for device '{serial}'")]
    NoWindow { serial: String },

    #[error("Window enumeration failed: {message}")]
    EnumerationFailed { message: String },

    #[error("Window API call '{call}' failed: {message}")]
    ApiFailed { call: &'static str, message: String },

    #[error("Window manipulation is not supported on this platform")]
    Unsupported,
}

impl MirrorError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::NotFound { .. } => "WINDOW_NOT_FOUND",
            WindowError::NoWindow { .. } => "WINDOW_NO_WINDOW",
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::ApiFailed { .. } => "WINDOW_API_FAILED",
            WindowError::Unsupported => "WINDOW_UNSUPPORTED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            WindowError::NotFound { .. } | WindowError::NoWindow { .. }
        )
    }
}
