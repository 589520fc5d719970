//! Win32 implementation of [`WindowBackend`].
//!
//! Thin unsafe wrappers around user32; all policy (which bits to flip, what
//! to snapshot) lives in the platform-neutral controller. Failures from OS
//! calls are mapped to [`WindowError::ApiFailed`] with the call name; raw
//! error codes never reach callers but are preserved in the message for
//! diagnostics.

use core::ffi::c_void;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GWL_EXSTYLE, GWL_STYLE, GetWindowLongW, GetWindowRect, GetWindowTextLengthW,
    GetWindowTextW, GetWindowThreadProcessId, HWND_NOTOPMOST, HWND_TOPMOST, IsWindow,
    IsWindowVisible, SW_MINIMIZE, SW_RESTORE, SWP_FRAMECHANGED, SWP_NOMOVE, SWP_NOSIZE,
    SWP_NOZORDER, SWP_SHOWWINDOW, SetForegroundWindow, SetWindowLongW, SetWindowPos, ShowWindow,
};

use crate::window::backend::WindowBackend;
use crate::window::errors::WindowError;
use crate::window::types::{TopLevelWindow, WindowHandle, WindowRect, ZOrder};

pub struct Win32Backend;

impl Win32Backend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Win32Backend {
    fn default() -> Self {
        Self::new()
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.as_raw() as *mut c_void)
}

fn from_os_rect(rect: RECT) -> WindowRect {
    WindowRect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

/// Collects visible windows with their owning PID and title.
unsafe extern "system" fn enum_windows_callback(window: HWND, lparam: LPARAM) -> BOOL {
    unsafe {
        let windows = &mut *(lparam.0 as *mut Vec<TopLevelWindow>);

        if !IsWindowVisible(window).as_bool() {
            return TRUE;
        }

        let mut pid: u32 = 0;
        GetWindowThreadProcessId(window, Some(&mut pid));
        if pid == 0 {
            return TRUE;
        }

        let title_len = GetWindowTextLengthW(window);
        let title = if title_len > 0 {
            let mut buf: Vec<u16> = vec![0; (title_len + 1) as usize];
            let actual_len = GetWindowTextW(window, &mut buf);
            String::from_utf16_lossy(&buf[..actual_len as usize])
        } else {
            String::new()
        };

        windows.push(TopLevelWindow {
            handle: WindowHandle::from_raw(window.0 as isize),
            pid,
            title,
        });

        TRUE
    }
}

impl WindowBackend for Win32Backend {
    fn enumerate_windows(&self) -> Result<Vec<TopLevelWindow>, WindowError> {
        let mut windows: Vec<TopLevelWindow> = Vec::new();

        unsafe {
            let windows_ptr = &mut windows as *mut Vec<TopLevelWindow>;
            EnumWindows(Some(enum_windows_callback), LPARAM(windows_ptr as isize)).map_err(
                |e| WindowError::EnumerationFailed {
                    message: e.to_string(),
                },
            )?;
        }

        Ok(windows)
    }

    fn is_live(&self, handle: WindowHandle) -> bool {
        if handle.as_raw() == 0 {
            return false;
        }
        unsafe { IsWindow(Some(hwnd(handle))).as_bool() }
    }

    fn style(&self, handle: WindowHandle) -> Result<u32, WindowError> {
        Ok(unsafe { GetWindowLongW(hwnd(handle), GWL_STYLE) } as u32)
    }

    fn set_style(&self, handle: WindowHandle, style: u32) -> Result<(), WindowError> {
        unsafe {
            SetWindowLongW(hwnd(handle), GWL_STYLE, style as i32);
        }
        Ok(())
    }

    fn extended_style(&self, handle: WindowHandle) -> Result<u32, WindowError> {
        Ok(unsafe { GetWindowLongW(hwnd(handle), GWL_EXSTYLE) } as u32)
    }

    fn set_extended_style(&self, handle: WindowHandle, style: u32) -> Result<(), WindowError> {
        unsafe {
            SetWindowLongW(hwnd(handle), GWL_EXSTYLE, style as i32);
        }
        Ok(())
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect, WindowError> {
        let mut rect = RECT::default();
        unsafe {
            GetWindowRect(hwnd(handle), &mut rect).map_err(|e| WindowError::ApiFailed {
                call: "GetWindowRect",
                message: e.to_string(),
            })?;
        }
        Ok(from_os_rect(rect))
    }

    fn monitor_rect(&self, handle: WindowHandle) -> Result<WindowRect, WindowError> {
        unsafe {
            let monitor = MonitorFromWindow(hwnd(handle), MONITOR_DEFAULTTONEAREST);
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if !GetMonitorInfoW(monitor, &mut info).as_bool() {
                return Err(WindowError::ApiFailed {
                    call: "GetMonitorInfoW",
                    message: "no monitor info for window".to_string(),
                });
            }
            Ok(from_os_rect(info.rcMonitor))
        }
    }

    fn set_frame(&self, handle: WindowHandle, rect: WindowRect) -> Result<(), WindowError> {
        unsafe {
            SetWindowPos(
                hwnd(handle),
                None,
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SWP_NOZORDER | SWP_FRAMECHANGED | SWP_SHOWWINDOW,
            )
            .map_err(|e| WindowError::ApiFailed {
                call: "SetWindowPos",
                message: e.to_string(),
            })
        }
    }

    fn apply_frame_change(&self, handle: WindowHandle) -> Result<(), WindowError> {
        unsafe {
            SetWindowPos(
                hwnd(handle),
                None,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_FRAMECHANGED,
            )
            .map_err(|e| WindowError::ApiFailed {
                call: "SetWindowPos",
                message: e.to_string(),
            })
        }
    }

    fn set_z_order(&self, handle: WindowHandle, z_order: ZOrder) -> Result<(), WindowError> {
        let insert_after = match z_order {
            ZOrder::Topmost => HWND_TOPMOST,
            ZOrder::Normal => HWND_NOTOPMOST,
        };
        unsafe {
            SetWindowPos(
                hwnd(handle),
                Some(insert_after),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_SHOWWINDOW,
            )
            .map_err(|e| WindowError::ApiFailed {
                call: "SetWindowPos",
                message: e.to_string(),
            })
        }
    }

    fn set_foreground(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let ok = unsafe { SetForegroundWindow(hwnd(handle)).as_bool() };
        if ok {
            Ok(())
        } else {
            Err(WindowError::ApiFailed {
                call: "SetForegroundWindow",
                message: "request rejected by the OS".to_string(),
            })
        }
    }

    fn minimize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        unsafe {
            let _ = ShowWindow(hwnd(handle), SW_MINIMIZE);
        }
        Ok(())
    }

    fn restore(&self, handle: WindowHandle) -> Result<(), WindowError> {
        unsafe {
            let _ = ShowWindow(hwnd(handle), SW_RESTORE);
        }
        Ok(())
    }
}
