//! Locating a process's main window after spawn.
//!
//! The child creates its window asynchronously, so callers wait a settle
//! delay first and then run a single enumeration pass here. Resolution is
//! never retried internally; a miss returns [`WindowError::NotFound`] and
//! the caller decides when to try again.

use tracing::{debug, info, warn};

use crate::window::backend::WindowBackend;
use crate::window::errors::WindowError;
use crate::window::types::{TopLevelWindow, WindowHandle};

/// Resolve the main window owned by `pid`.
///
/// Filters the enumeration to visible windows owned by the target process
/// and picks the first whose title does not match any exclusion pattern.
/// Title matching is a best-effort heuristic for skipping console and helper
/// windows; if multiple candidates remain, enumeration order decides, which
/// is OS-defined and not guaranteed stable.
pub fn resolve_window(
    backend: &dyn WindowBackend,
    pid: u32,
    excluded_title_patterns: &[String],
) -> Result<(WindowHandle, String), WindowError> {
    debug!(event = "core.window.resolve_started", pid = pid);

    // An OS-level enumeration failure is indistinguishable from "no window
    // yet" for callers, who retry either way.
    let windows = match backend.enumerate_windows() {
        Ok(windows) => windows,
        Err(e) => {
            warn!(event = "core.window.enumeration_failed", pid = pid, error = %e);
            return Err(WindowError::NotFound { pid });
        }
    };
    match select_main_window(&windows, pid, excluded_title_patterns) {
        Some(window) => {
            info!(
                event = "core.window.resolved",
                pid = pid,
                handle = window.handle.as_raw(),
                title = %window.title
            );
            Ok((window.handle, window.title.clone()))
        }
        None => {
            warn!(
                event = "core.window.resolve_not_found",
                pid = pid,
                candidates = windows.iter().filter(|w| w.pid == pid).count()
            );
            Err(WindowError::NotFound { pid })
        }
    }
}

/// First enumerated window owned by `pid` with a usable title.
fn select_main_window<'a>(
    windows: &'a [TopLevelWindow],
    pid: u32,
    excluded_title_patterns: &[String],
) -> Option<&'a TopLevelWindow> {
    windows.iter().find(|window| {
        window.pid == pid
            && !window.title.is_empty()
            && !title_is_excluded(&window.title, excluded_title_patterns)
    })
}

fn title_is_excluded(title: &str, patterns: &[String]) -> bool {
    let lower = title.to_lowercase();
    patterns
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}
