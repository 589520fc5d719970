use crate::errors::MirrorError;

#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    #[error("adb binary not found on PATH or in known SDK locations")]
    AdbUnavailable,

    #[error("adb command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Failed to execute adb: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl MirrorError for AdbError {
    fn error_code(&self) -> &'static str {
        match self {
            AdbError::AdbUnavailable => "ADB_UNAVAILABLE",
            AdbError::CommandFailed { .. } => "ADB_COMMAND_FAILED",
            AdbError::IoError { .. } => "ADB_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, AdbError::AdbUnavailable)
    }
}
