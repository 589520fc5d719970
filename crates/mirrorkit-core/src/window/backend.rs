//! Platform seam for window manipulation.
//!
//! Every OS call the resolver and controller need is expressed on
//! [`WindowBackend`]. Styles are exchanged as raw bit integers so the
//! derived-state rules (caption absent means fullscreen, topmost bit means
//! always-on-top) live in one place above the platform layer.

use std::sync::Arc;

use crate::window::errors::WindowError;
use crate::window::types::{TopLevelWindow, WindowHandle, WindowRect, ZOrder};

pub trait WindowBackend: Send + Sync {
    /// Enumerate all currently visible top-level windows.
    fn enumerate_windows(&self) -> Result<Vec<TopLevelWindow>, WindowError>;

    /// Whether the handle still refers to a live window.
    fn is_live(&self, handle: WindowHandle) -> bool;

    fn style(&self, handle: WindowHandle) -> Result<u32, WindowError>;

    fn set_style(&self, handle: WindowHandle, style: u32) -> Result<(), WindowError>;

    fn extended_style(&self, handle: WindowHandle) -> Result<u32, WindowError>;

    fn set_extended_style(&self, handle: WindowHandle, style: u32) -> Result<(), WindowError>;

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect, WindowError>;

    /// Bounds of the monitor currently containing the window, not the
    /// primary monitor.
    fn monitor_rect(&self, handle: WindowHandle) -> Result<WindowRect, WindowError>;

    /// Move and resize the window, notifying the OS that the frame changed
    /// so stripped or restored chrome takes effect immediately.
    fn set_frame(&self, handle: WindowHandle, rect: WindowRect) -> Result<(), WindowError>;

    /// Force a frame redraw without moving or resizing.
    fn apply_frame_change(&self, handle: WindowHandle) -> Result<(), WindowError>;

    /// Re-position the window in z-order, preserving position and size.
    fn set_z_order(&self, handle: WindowHandle, z_order: ZOrder) -> Result<(), WindowError>;

    fn set_foreground(&self, handle: WindowHandle) -> Result<(), WindowError>;

    fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError>;

    fn restore(&self, handle: WindowHandle) -> Result<(), WindowError>;
}

/// Construct the backend for the current platform.
#[cfg(windows)]
pub fn native_backend() -> Arc<dyn WindowBackend> {
    Arc::new(crate::window::win32::Win32Backend::new())
}

/// Construct the backend for the current platform.
///
/// Window manipulation only exists on Windows; elsewhere every operation
/// reports [`WindowError::Unsupported`] so sessions still launch and stop
/// but window operations fail cleanly.
#[cfg(not(windows))]
pub fn native_backend() -> Arc<dyn WindowBackend> {
    Arc::new(UnsupportedBackend)
}

/// Stub backend for platforms without a window subsystem integration.
pub struct UnsupportedBackend;

impl WindowBackend for UnsupportedBackend {
    fn enumerate_windows(&self) -> Result<Vec<TopLevelWindow>, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn is_live(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn style(&self, _handle: WindowHandle) -> Result<u32, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn set_style(&self, _handle: WindowHandle, _style: u32) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn extended_style(&self, _handle: WindowHandle) -> Result<u32, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn set_extended_style(&self, _handle: WindowHandle, _style: u32) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn window_rect(&self, _handle: WindowHandle) -> Result<WindowRect, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn monitor_rect(&self, _handle: WindowHandle) -> Result<WindowRect, WindowError> {
        Err(WindowError::Unsupported)
    }

    fn set_frame(&self, _handle: WindowHandle, _rect: WindowRect) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn apply_frame_change(&self, _handle: WindowHandle) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn set_z_order(&self, _handle: WindowHandle, _z_order: ZOrder) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn set_foreground(&self, _handle: WindowHandle) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn minimize(&self, _handle: WindowHandle) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }

    fn restore(&self, _handle: WindowHandle) -> Result<(), WindowError> {
        Err(WindowError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_backend_fails_cleanly() {
        let backend = UnsupportedBackend;
        let handle = WindowHandle::from_raw(1);

        assert!(!backend.is_live(handle));
        assert!(matches!(
            backend.enumerate_windows(),
            Err(WindowError::Unsupported)
        ));
        assert!(matches!(backend.style(handle), Err(WindowError::Unsupported)));
        assert!(matches!(
            backend.set_foreground(handle),
            Err(WindowError::Unsupported)
        ));
    }
}
