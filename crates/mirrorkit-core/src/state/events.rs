use serde::{Deserialize, Serialize};

use crate::sessions::SessionSummary;
use crate::window::WindowStateKind;

/// Notifications describing what a dispatched command changed.
///
/// Returned to the caller and mirrored onto the notification channel so UI
/// layers can keep their state flags authoritative without polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    MirroringStarted {
        serial: String,
        pid: u32,
        session_id: String,
    },
    MirroringStopped {
        serial: String,
    },
    WindowResolved {
        serial: String,
        title: String,
    },
    WindowStateChanged {
        serial: String,
        kind: WindowStateKind,
        value: bool,
    },
    WindowFocused {
        serial: String,
    },
    WindowMinimized {
        serial: String,
    },
    WindowRestored {
        serial: String,
    },
    SessionsListed {
        sessions: Vec<SessionSummary>,
    },
}
