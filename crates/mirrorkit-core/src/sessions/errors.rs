use crate::errors::MirrorError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No active session for device '{serial}'")]
    NoSession { serial: String },

    #[error("Failed to start mirroring: {source}")]
    SpawnFailed {
        #[from]
        source: crate::launcher::errors::LauncherError,
    },

    #[error("Failed to kill process '{pid}': {message}")]
    ProcessKillFailed { pid: u32, message: String },

    #[error("Window operation failed: {source}")]
    WindowError {
        #[from]
        source: crate::window::errors::WindowError,
    },
}

impl MirrorError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NoSession { .. } => "SESSION_NO_SESSION",
            SessionError::SpawnFailed { .. } => "SESSION_SPAWN_FAILED",
            SessionError::ProcessKillFailed { .. } => "SESSION_PROCESS_KILL_FAILED",
            SessionError::WindowError { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            SessionError::NoSession { .. } => true,
            SessionError::SpawnFailed { source } => source.is_user_error(),
            SessionError::ProcessKillFailed { .. } => false,
            SessionError::WindowError { source } => source.is_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowError;

    #[test]
    fn test_no_session_error() {
        let error = SessionError::NoSession {
            serial: "ABC123".to_string(),
        };
        assert_eq!(error.to_string(), "No active session for device 'ABC123'");
        assert_eq!(error.error_code(), "SESSION_NO_SESSION");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_window_error_code_passes_through() {
        let error = SessionError::from(WindowError::NoWindow {
            serial: "ABC123".to_string(),
        });
        assert_eq!(error.error_code(), "WINDOW_NO_WINDOW");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_spawn_failed_from_launcher_error() {
        let error = SessionError::from(crate::launcher::LauncherError::ScrcpyUnavailable);
        assert_eq!(error.error_code(), "SESSION_SPAWN_FAILED");
        assert!(error.is_user_error());
    }
}
