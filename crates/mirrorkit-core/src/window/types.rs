use serde::{Deserialize, Serialize};

// Style bits controlling window chrome. Values are the Win32 WS_* / WS_EX_*
// constants; the fake backend uses the same values so derived-state logic is
// identical on every platform.
pub(crate) const STYLE_CAPTION: u32 = 0x00C0_0000;
pub(crate) const STYLE_THICK_FRAME: u32 = 0x0004_0000;
pub(crate) const STYLE_BORDER: u32 = 0x0080_0000;
pub(crate) const EX_STYLE_CLIENT_EDGE: u32 = 0x0000_0200;
pub(crate) const EX_STYLE_WINDOW_EDGE: u32 = 0x0000_0100;
pub(crate) const EX_STYLE_TOPMOST: u32 = 0x0000_0008;

/// Fallback restore size when a window was altered externally and no saved
/// rect exists to return to.
pub(crate) const DEFAULT_RESTORE_WIDTH: i32 = 1280;
pub(crate) const DEFAULT_RESTORE_HEIGHT: i32 = 720;

/// Opaque handle to a top-level window, stored as the raw OS value so it can
/// cross threads freely. Validity is never assumed; every use re-checks
/// liveness through the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> isize {
        self.0
    }
}

/// Screen-space rectangle in the OS convention (right/bottom exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// A visible top-level window observed during enumeration.
#[derive(Debug, Clone)]
pub struct TopLevelWindow {
    pub handle: WindowHandle,
    pub pid: u32,
    pub title: String,
}

/// Z-order placement for always-on-top toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Topmost,
    Normal,
}

/// Which window-state axis a toggle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStateKind {
    Fullscreen,
    AlwaysOnTop,
    Borderless,
}
