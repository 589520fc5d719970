/// Commands accepted by the dispatch thread.
///
/// The `SessionExited` and `AttachWindow` variants are internal: background
/// workers post them to marshal their results onto the dispatch thread, and
/// no reply is delivered for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartMirroring { serial: String },
    StopMirroring { serial: String },
    RestartMirroring { serial: String },
    ToggleFullscreen { serial: String },
    ToggleAlwaysOnTop { serial: String },
    ToggleBorderless { serial: String },
    FocusWindow { serial: String },
    MinimizeWindow { serial: String },
    RestoreWindow { serial: String },
    ListSessions,
    /// Posted by the exit watcher when the mirroring child terminates.
    SessionExited { serial: String, pid: u32 },
    /// Posted by a resolution worker once the window is found. The handle
    /// travels as its raw value because OS handle types are not `Send`.
    AttachWindow {
        serial: String,
        handle_raw: isize,
        title: String,
    },
}
