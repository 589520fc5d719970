use serde::{Deserialize, Serialize};

use crate::window::WindowHandle;

/// Resolved window bound to a session.
#[derive(Debug, Clone)]
pub struct WindowAttachment {
    pub handle: WindowHandle,
    pub title: String,
}

/// A live mirroring session.
///
/// Created on launch, destroyed on process exit or explicit stop. Never
/// persisted: window handles cannot be reacquired reliably across
/// application restarts, so session state is process-lifetime only.
#[derive(Debug, Clone)]
pub struct MirroringSession {
    /// Unique session id, distinct from the serial so restarts are
    /// distinguishable in logs.
    pub id: String,
    pub serial: String,
    pub pid: u32,
    /// Process identity captured at spawn, checked before any kill.
    pub process_name: String,
    pub process_start_time: u64,
    /// Resolved window, absent until resolution succeeds or after the
    /// handle went stale.
    pub window: Option<WindowAttachment>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl MirroringSession {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            serial: self.serial.clone(),
            pid: self.pid,
            window_resolved: self.window.is_some(),
            window_title: self.window.as_ref().map(|w| w.title.clone()),
            created_at: self.created_at.clone(),
        }
    }
}

/// Serializable view of a session for listings and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub serial: String,
    pub pid: u32,
    pub window_resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MirroringSession {
        MirroringSession {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            serial: "ABC123".to_string(),
            pid: 4242,
            process_name: "scrcpy".to_string(),
            process_start_time: 1_700_000_000,
            window: None,
            created_at: "2026-08-30T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_summary_without_window() {
        let summary = session().summary();
        assert_eq!(summary.serial, "ABC123");
        assert!(!summary.window_resolved);
        assert!(summary.window_title.is_none());
    }

    #[test]
    fn test_summary_with_window() {
        let mut s = session();
        s.window = Some(WindowAttachment {
            handle: WindowHandle::from_raw(7),
            title: "Pixel 8".to_string(),
        });

        let summary = s.summary();
        assert!(summary.window_resolved);
        assert_eq!(summary.window_title.as_deref(), Some("Pixel 8"));
    }

    #[test]
    fn test_summary_json_omits_missing_title() {
        let json = serde_json::to_string(&session().summary()).unwrap();
        assert!(!json.contains("window_title"));
        assert!(json.contains("\"window_resolved\":false"));
    }
}
