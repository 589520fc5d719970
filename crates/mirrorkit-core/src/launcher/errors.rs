use crate::errors::MirrorError;

#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("scrcpy binary not found on PATH or in known install locations")]
    ScrcpyUnavailable,

    #[error("Failed to spawn '{binary}': {message}")]
    SpawnFailed { binary: String, message: String },
}

impl MirrorError for LauncherError {
    fn error_code(&self) -> &'static str {
        match self {
            LauncherError::ScrcpyUnavailable => "LAUNCHER_SCRCPY_UNAVAILABLE",
            LauncherError::SpawnFailed { .. } => "LAUNCHER_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, LauncherError::ScrcpyUnavailable)
    }
}
