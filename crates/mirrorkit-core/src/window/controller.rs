//! Idempotent window-state operations over cached handles.
//!
//! The controller owns one cached handle plus restore snapshots per device.
//! State is always derived from the OS style bits at call time, never from a
//! locally remembered flag, so toggles stay correct even when the window is
//! altered externally. Every operation validates handle liveness first; a
//! stale handle is evicted and surfaces as [`WindowError::NoWindow`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::window::backend::WindowBackend;
use crate::window::errors::WindowError;
use crate::window::types::{
    DEFAULT_RESTORE_HEIGHT, DEFAULT_RESTORE_WIDTH, EX_STYLE_CLIENT_EDGE, EX_STYLE_TOPMOST,
    EX_STYLE_WINDOW_EDGE, STYLE_BORDER, STYLE_CAPTION, STYLE_THICK_FRAME, WindowHandle,
    WindowRect, ZOrder,
};

/// OS-observed window state, derived from style bits on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStateFlags {
    pub fullscreen: bool,
    pub always_on_top: bool,
    pub borderless: bool,
}

/// Cached handle and restore snapshots for one device.
///
/// Snapshots are written on entering a transformed state and consumed on
/// restore. Fullscreen saves the rect (style restoration is additive);
/// borderless saves the raw style integer since geometry is untouched.
#[derive(Debug)]
struct CachedWindow {
    handle: WindowHandle,
    fullscreen_rect: Option<WindowRect>,
    borderless_style: Option<u32>,
}

pub struct WindowStateController {
    backend: Arc<dyn WindowBackend>,
    windows: HashMap<String, CachedWindow>,
}

impl WindowStateController {
    pub fn new(backend: Arc<dyn WindowBackend>) -> Self {
        Self {
            backend,
            windows: HashMap::new(),
        }
    }

    /// Cache a freshly resolved handle, discarding any snapshots from a
    /// previous window.
    pub fn attach(&mut self, serial: &str, handle: WindowHandle) {
        debug!(
            event = "core.window.attached",
            serial = serial,
            handle = handle.as_raw()
        );
        self.windows.insert(
            serial.to_string(),
            CachedWindow {
                handle,
                fullscreen_rect: None,
                borderless_style: None,
            },
        );
    }

    /// Drop the cached handle and snapshots for a device.
    pub fn evict(&mut self, serial: &str) {
        if self.windows.remove(serial).is_some() {
            debug!(event = "core.window.evicted", serial = serial);
        }
    }

    pub fn handle(&self, serial: &str) -> Option<WindowHandle> {
        self.windows.get(serial).map(|w| w.handle)
    }

    /// Validated live handle for a device, evicting stale entries.
    fn live_handle(&mut self, serial: &str) -> Result<WindowHandle, WindowError> {
        let handle = self
            .windows
            .get(serial)
            .map(|w| w.handle)
            .ok_or_else(|| WindowError::NoWindow {
                serial: serial.to_string(),
            })?;

        if !self.backend.is_live(handle) {
            warn!(
                event = "core.window.handle_stale",
                serial = serial,
                handle = handle.as_raw()
            );
            self.windows.remove(serial);
            return Err(WindowError::NoWindow {
                serial: serial.to_string(),
            });
        }

        Ok(handle)
    }

    /// Current state flags derived from live style bits.
    pub fn flags(&mut self, serial: &str) -> Result<WindowStateFlags, WindowError> {
        let handle = self.live_handle(serial)?;
        let style = self.backend.style(handle)?;
        let extended = self.backend.extended_style(handle)?;
        Ok(WindowStateFlags {
            fullscreen: style & STYLE_CAPTION == 0,
            always_on_top: extended & EX_STYLE_TOPMOST != 0,
            borderless: style & STYLE_CAPTION == 0,
        })
    }

    /// Toggle borderless fullscreen. Returns the new fullscreen state.
    ///
    /// Entering snapshots the current rect, strips caption/frame/border and
    /// edge styles, and resizes to the monitor the window currently occupies.
    /// Exiting restores the styles and the snapshotted rect, falling back to
    /// a default size when the snapshot is missing.
    pub fn toggle_fullscreen(&mut self, serial: &str) -> Result<bool, WindowError> {
        let handle = self.live_handle(serial)?;
        let style = self.backend.style(handle)?;
        let extended = self.backend.extended_style(handle)?;
        let is_fullscreen = style & STYLE_CAPTION == 0;

        if !is_fullscreen {
            let rect = self.backend.window_rect(handle)?;
            if let Some(cached) = self.windows.get_mut(serial) {
                cached.fullscreen_rect = Some(rect);
            }

            self.backend
                .set_style(handle, style & !(STYLE_CAPTION | STYLE_THICK_FRAME | STYLE_BORDER))?;
            self.backend.set_extended_style(
                handle,
                extended & !(EX_STYLE_CLIENT_EDGE | EX_STYLE_WINDOW_EDGE),
            )?;

            let monitor = self.backend.monitor_rect(handle)?;
            self.backend.set_frame(handle, monitor)?;

            info!(event = "core.window.fullscreen_entered", serial = serial);
            Ok(true)
        } else {
            self.backend
                .set_style(handle, style | STYLE_CAPTION | STYLE_THICK_FRAME | STYLE_BORDER)?;
            self.backend.set_extended_style(
                handle,
                extended | EX_STYLE_CLIENT_EDGE | EX_STYLE_WINDOW_EDGE,
            )?;

            let saved = self.windows.get_mut(serial).and_then(|w| w.fullscreen_rect.take());
            let restore = match saved {
                Some(rect) => rect,
                None => {
                    // Window was altered externally; no snapshot to return to.
                    let current = self.backend.window_rect(handle)?;
                    WindowRect {
                        left: current.left,
                        top: current.top,
                        right: current.left + DEFAULT_RESTORE_WIDTH,
                        bottom: current.top + DEFAULT_RESTORE_HEIGHT,
                    }
                }
            };
            self.backend.set_frame(handle, restore)?;

            info!(event = "core.window.fullscreen_exited", serial = serial);
            Ok(false)
        }
    }

    /// Toggle always-on-top. Returns the new topmost state.
    ///
    /// Z-order-only mutation: position and size are preserved and no style
    /// or snapshot state is touched.
    pub fn toggle_always_on_top(&mut self, serial: &str) -> Result<bool, WindowError> {
        let handle = self.live_handle(serial)?;
        let extended = self.backend.extended_style(handle)?;
        let is_topmost = extended & EX_STYLE_TOPMOST != 0;

        let z_order = if is_topmost {
            ZOrder::Normal
        } else {
            ZOrder::Topmost
        };
        self.backend.set_z_order(handle, z_order)?;

        info!(
            event = "core.window.always_on_top_toggled",
            serial = serial,
            enabled = !is_topmost
        );
        Ok(!is_topmost)
    }

    /// Toggle borderless. Returns the new borderless state.
    ///
    /// Strips or restores only caption and thick-frame bits; extended edge
    /// styles and geometry stay untouched. The pre-strip style integer is
    /// snapshotted so restore reproduces the exact prior chrome.
    pub fn toggle_borderless(&mut self, serial: &str) -> Result<bool, WindowError> {
        let handle = self.live_handle(serial)?;
        let style = self.backend.style(handle)?;
        let is_borderless = style & STYLE_CAPTION == 0;

        if !is_borderless {
            if let Some(cached) = self.windows.get_mut(serial) {
                cached.borderless_style = Some(style);
            }
            self.backend
                .set_style(handle, style & !(STYLE_CAPTION | STYLE_THICK_FRAME))?;
        } else {
            let saved = self.windows.get_mut(serial).and_then(|w| w.borderless_style.take());
            let restored = saved.unwrap_or(style | STYLE_CAPTION | STYLE_THICK_FRAME);
            self.backend.set_style(handle, restored)?;
        }

        self.backend.apply_frame_change(handle)?;

        info!(
            event = "core.window.borderless_toggled",
            serial = serial,
            enabled = !is_borderless
        );
        Ok(!is_borderless)
    }

    /// Bring the window to the foreground.
    pub fn focus(&mut self, serial: &str) -> Result<(), WindowError> {
        let handle = self.live_handle(serial)?;
        self.backend.set_foreground(handle)?;
        debug!(event = "core.window.focused", serial = serial);
        Ok(())
    }

    pub fn minimize(&mut self, serial: &str) -> Result<(), WindowError> {
        let handle = self.live_handle(serial)?;
        self.backend.minimize(handle)?;
        debug!(event = "core.window.minimized", serial = serial);
        Ok(())
    }

    pub fn restore(&mut self, serial: &str) -> Result<(), WindowError> {
        let handle = self.live_handle(serial)?;
        self.backend.restore(handle)?;
        debug!(event = "core.window.restored", serial = serial);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::testing::FakeBackend;

    const SERIAL: &str = "ABC123";

    fn controller_with_window() -> (Arc<FakeBackend>, WindowStateController) {
        let backend = Arc::new(FakeBackend::new());
        let handle = backend.add_window(1, 200, "Pixel 8");
        let mut controller = WindowStateController::new(backend.clone());
        controller.attach(SERIAL, handle);
        (backend, controller)
    }

    #[test]
    fn test_toggle_fullscreen_round_trip_restores_style_and_rect() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);
        let original_style = backend.style(handle).unwrap();
        let original_rect = backend.window_rect(handle).unwrap();

        assert!(controller.toggle_fullscreen(SERIAL).unwrap());
        let monitor = backend.monitor_rect(handle).unwrap();
        assert_eq!(backend.window_rect(handle).unwrap(), monitor);
        assert_eq!(backend.style(handle).unwrap() & STYLE_CAPTION, 0);

        assert!(!controller.toggle_fullscreen(SERIAL).unwrap());
        assert_eq!(backend.style(handle).unwrap(), original_style);
        assert_eq!(backend.window_rect(handle).unwrap(), original_rect);
    }

    #[test]
    fn test_toggle_fullscreen_without_snapshot_uses_default_size() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);

        // Strip the caption externally so the controller sees fullscreen
        // without ever having snapshotted a rect.
        let style = backend.style(handle).unwrap();
        backend.set_style(handle, style & !STYLE_CAPTION).unwrap();

        assert!(!controller.toggle_fullscreen(SERIAL).unwrap());
        let rect = backend.window_rect(handle).unwrap();
        assert_eq!(rect.width(), DEFAULT_RESTORE_WIDTH);
        assert_eq!(rect.height(), DEFAULT_RESTORE_HEIGHT);
    }

    #[test]
    fn test_toggle_always_on_top_round_trip() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);

        assert!(controller.toggle_always_on_top(SERIAL).unwrap());
        assert_ne!(backend.extended_style(handle).unwrap() & EX_STYLE_TOPMOST, 0);

        assert!(!controller.toggle_always_on_top(SERIAL).unwrap());
        assert_eq!(backend.extended_style(handle).unwrap() & EX_STYLE_TOPMOST, 0);
    }

    #[test]
    fn test_toggle_always_on_top_preserves_geometry_and_style() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);
        let original_style = backend.style(handle).unwrap();
        let original_rect = backend.window_rect(handle).unwrap();

        controller.toggle_always_on_top(SERIAL).unwrap();

        assert_eq!(backend.style(handle).unwrap(), original_style);
        assert_eq!(backend.window_rect(handle).unwrap(), original_rect);
    }

    #[test]
    fn test_toggle_borderless_round_trip_restores_exact_style() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);
        let original_style = backend.style(handle).unwrap();
        let original_ex_style = backend.extended_style(handle).unwrap();

        assert!(controller.toggle_borderless(SERIAL).unwrap());
        let style = backend.style(handle).unwrap();
        assert_eq!(style & STYLE_CAPTION, 0);
        assert_eq!(style & STYLE_THICK_FRAME, 0);
        // WS_CAPTION is a composite containing WS_BORDER, so the border bit
        // goes with it.
        assert_eq!(style & STYLE_BORDER, 0);
        assert_eq!(backend.extended_style(handle).unwrap(), original_ex_style);

        // The second toggle restores the exact saved style word, not a
        // reconstruction.
        assert!(!controller.toggle_borderless(SERIAL).unwrap());
        assert_eq!(backend.style(handle).unwrap(), original_style);
        assert_ne!(backend.style(handle).unwrap() & STYLE_BORDER, 0);
    }

    #[test]
    fn test_toggle_borderless_does_not_touch_topmost_bit() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);

        controller.toggle_always_on_top(SERIAL).unwrap();
        controller.toggle_borderless(SERIAL).unwrap();

        assert_ne!(backend.extended_style(handle).unwrap() & EX_STYLE_TOPMOST, 0);
        assert!(controller.flags(SERIAL).unwrap().always_on_top);
    }

    #[test]
    fn test_toggle_always_on_top_does_not_touch_chrome_bits() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);

        controller.toggle_always_on_top(SERIAL).unwrap();

        let style = backend.style(handle).unwrap();
        assert_ne!(style & STYLE_CAPTION, 0);
        assert_ne!(style & STYLE_THICK_FRAME, 0);
        assert!(!controller.flags(SERIAL).unwrap().borderless);
    }

    #[test]
    fn test_operations_on_unattached_serial_return_no_window() {
        let backend = Arc::new(FakeBackend::new());
        let mut controller = WindowStateController::new(backend);

        assert!(matches!(
            controller.toggle_fullscreen("UNKNOWN"),
            Err(WindowError::NoWindow { .. })
        ));
        assert!(matches!(
            controller.focus("UNKNOWN"),
            Err(WindowError::NoWindow { .. })
        ));
    }

    #[test]
    fn test_stale_handle_is_evicted() {
        let (backend, mut controller) = controller_with_window();

        backend.close_window(1);

        assert!(matches!(
            controller.toggle_fullscreen(SERIAL),
            Err(WindowError::NoWindow { .. })
        ));
        // Handle is gone; a second attempt fails the same way without a
        // backend liveness check.
        assert!(controller.handle(SERIAL).is_none());
    }

    #[test]
    fn test_focus_brings_window_to_foreground() {
        let (backend, mut controller) = controller_with_window();

        controller.focus(SERIAL).unwrap();
        assert_eq!(backend.foreground_window(), Some(1));
    }

    #[test]
    fn test_minimize_and_restore() {
        let (backend, mut controller) = controller_with_window();

        controller.minimize(SERIAL).unwrap();
        assert!(backend.is_minimized(1));

        controller.restore(SERIAL).unwrap();
        assert!(!backend.is_minimized(1));
    }

    #[test]
    fn test_attach_resets_snapshots() {
        let (backend, mut controller) = controller_with_window();
        let handle = WindowHandle::from_raw(1);

        controller.toggle_fullscreen(SERIAL).unwrap();

        // Re-attach as if the window was re-resolved; the old rect snapshot
        // must not leak into the new attachment.
        controller.attach(SERIAL, handle);
        assert!(!controller.toggle_fullscreen(SERIAL).unwrap());

        let rect = backend.window_rect(handle).unwrap();
        assert_eq!(rect.width(), DEFAULT_RESTORE_WIDTH);
        assert_eq!(rect.height(), DEFAULT_RESTORE_HEIGHT);
    }
}
