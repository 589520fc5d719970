//! In-memory window backend for unit tests.
//!
//! Models the handful of OS behaviors the controller logic depends on:
//! style bits persist per window, z-order changes flip the topmost extended
//! style bit, and closed windows stop being live.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::window::backend::WindowBackend;
use crate::window::errors::WindowError;
use crate::window::types::{
    EX_STYLE_TOPMOST, EX_STYLE_WINDOW_EDGE, STYLE_BORDER, STYLE_CAPTION, STYLE_THICK_FRAME,
    TopLevelWindow, WindowHandle, WindowRect, ZOrder,
};

const MONITOR: WindowRect = WindowRect {
    left: 0,
    top: 0,
    right: 1920,
    bottom: 1080,
};

#[derive(Debug, Clone)]
struct FakeWindow {
    raw: isize,
    pid: u32,
    title: String,
    style: u32,
    extended_style: u32,
    rect: WindowRect,
    minimized: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    windows: Mutex<Vec<FakeWindow>>,
    foreground: Mutex<Option<isize>>,
    fail_enumeration: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visible top-level window with standard decorated chrome.
    pub fn add_window(&self, raw: isize, pid: u32, title: &str) -> WindowHandle {
        self.windows.lock().unwrap().push(FakeWindow {
            raw,
            pid,
            title: title.to_string(),
            style: STYLE_CAPTION | STYLE_THICK_FRAME | STYLE_BORDER,
            extended_style: EX_STYLE_WINDOW_EDGE,
            rect: WindowRect {
                left: 100,
                top: 100,
                right: 580,
                bottom: 1140,
            },
            minimized: false,
        });
        WindowHandle::from_raw(raw)
    }

    /// Destroy a window, making its handle stale.
    pub fn close_window(&self, raw: isize) {
        self.windows.lock().unwrap().retain(|w| w.raw != raw);
    }

    /// Destroy all windows owned by a PID, as if the process exited.
    pub fn close_windows_for_pid(&self, pid: u32) {
        self.windows.lock().unwrap().retain(|w| w.pid != pid);
    }

    /// Make subsequent enumeration calls fail, as if the OS call errored.
    pub fn fail_enumeration(&self, fail: bool) {
        self.fail_enumeration.store(fail, Ordering::SeqCst);
    }

    pub fn foreground_window(&self) -> Option<isize> {
        *self.foreground.lock().unwrap()
    }

    pub fn is_minimized(&self, raw: isize) -> bool {
        self.with_window(WindowHandle::from_raw(raw), |w| w.minimized)
            .unwrap_or(false)
    }

    fn with_window<T>(
        &self,
        handle: WindowHandle,
        f: impl FnOnce(&mut FakeWindow) -> T,
    ) -> Result<T, WindowError> {
        let mut windows = self.windows.lock().unwrap();
        windows
            .iter_mut()
            .find(|w| w.raw == handle.as_raw())
            .map(f)
            .ok_or(WindowError::ApiFailed {
                call: "FakeBackend",
                message: format!("stale handle {}", handle.as_raw()),
            })
    }
}

impl WindowBackend for FakeBackend {
    fn enumerate_windows(&self) -> Result<Vec<TopLevelWindow>, WindowError> {
        if self.fail_enumeration.load(Ordering::SeqCst) {
            return Err(WindowError::EnumerationFailed {
                message: "injected failure".to_string(),
            });
        }
        Ok(self
            .windows
            .lock()
            .unwrap()
            .iter()
            .map(|w| TopLevelWindow {
                handle: WindowHandle::from_raw(w.raw),
                pid: w.pid,
                title: w.title.clone(),
            })
            .collect())
    }

    fn is_live(&self, handle: WindowHandle) -> bool {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .any(|w| w.raw == handle.as_raw())
    }

    fn style(&self, handle: WindowHandle) -> Result<u32, WindowError> {
        self.with_window(handle, |w| w.style)
    }

    fn set_style(&self, handle: WindowHandle, style: u32) -> Result<(), WindowError> {
        self.with_window(handle, |w| w.style = style)
    }

    fn extended_style(&self, handle: WindowHandle) -> Result<u32, WindowError> {
        self.with_window(handle, |w| w.extended_style)
    }

    fn set_extended_style(&self, handle: WindowHandle, style: u32) -> Result<(), WindowError> {
        self.with_window(handle, |w| w.extended_style = style)
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect, WindowError> {
        self.with_window(handle, |w| w.rect)
    }

    fn monitor_rect(&self, handle: WindowHandle) -> Result<WindowRect, WindowError> {
        self.with_window(handle, |_| MONITOR)
    }

    fn set_frame(&self, handle: WindowHandle, rect: WindowRect) -> Result<(), WindowError> {
        self.with_window(handle, |w| w.rect = rect)
    }

    fn apply_frame_change(&self, handle: WindowHandle) -> Result<(), WindowError> {
        self.with_window(handle, |_| ())
    }

    fn set_z_order(&self, handle: WindowHandle, z_order: ZOrder) -> Result<(), WindowError> {
        self.with_window(handle, |w| match z_order {
            ZOrder::Topmost => w.extended_style |= EX_STYLE_TOPMOST,
            ZOrder::Normal => w.extended_style &= !EX_STYLE_TOPMOST,
        })
    }

    fn set_foreground(&self, handle: WindowHandle) -> Result<(), WindowError> {
        self.with_window(handle, |w| w.minimized = false)?;
        *self.foreground.lock().unwrap() = Some(handle.as_raw());
        Ok(())
    }

    fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        self.with_window(handle, |w| w.minimized = true)
    }

    fn restore(&self, handle: WindowHandle) -> Result<(), WindowError> {
        self.with_window(handle, |w| w.minimized = false)
    }
}
