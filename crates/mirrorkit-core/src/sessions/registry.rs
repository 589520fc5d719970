use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::MirrorConfig;
use crate::launcher;
use crate::process;
use crate::process::ProcessError;
use crate::sessions::errors::SessionError;
use crate::sessions::types::{MirroringSession, SessionSummary, WindowAttachment};
use crate::window::{
    WindowBackend, WindowError, WindowHandle, WindowStateController, WindowStateKind,
    resolve_window,
};

/// Owns all mirroring sessions and their window state.
///
/// Single-writer by design: the dispatch thread is the only caller, so no
/// internal locking. Background work (spawn watchers, window resolution)
/// reports back through the callbacks supplied per operation.
pub struct SessionRegistry {
    config: MirrorConfig,
    backend: Arc<dyn WindowBackend>,
    controller: WindowStateController,
    sessions: HashMap<String, MirroringSession>,
    /// Override for the mirroring binary, used by tests.
    binary: Option<PathBuf>,
}

impl SessionRegistry {
    pub fn new(config: MirrorConfig, backend: Arc<dyn WindowBackend>) -> Self {
        let controller = WindowStateController::new(Arc::clone(&backend));
        Self {
            config,
            backend,
            controller,
            sessions: HashMap::new(),
            binary: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = Some(binary);
        self
    }

    /// Start mirroring a device.
    ///
    /// If a session already exists for the serial it is fully stopped first;
    /// two processes for the same device never run concurrently. On success
    /// a resolution worker is scheduled after the configured settle delay.
    pub fn start(
        &mut self,
        serial: &str,
        on_exit: impl FnOnce(u32, Option<i32>) + Send + 'static,
        on_resolved: impl FnOnce(Result<(WindowHandle, String), WindowError>) + Send + 'static,
    ) -> Result<SessionSummary, SessionError> {
        if self.sessions.contains_key(serial) {
            info!(event = "core.sessions.start_replacing", serial = serial);
            self.stop(serial)?;
        }

        let binary = match &self.binary {
            Some(path) => path.clone(),
            None => launcher::locate_scrcpy()?,
        };
        let device_config = self.config.device_config(serial);
        let args = launcher::build_args(serial, &device_config);

        let launched = launcher::launch(&binary, serial, &args, on_exit)?;

        let session = MirroringSession {
            id: uuid::Uuid::new_v4().to_string(),
            serial: serial.to_string(),
            pid: launched.pid,
            process_name: launched.process_name,
            process_start_time: launched.process_start_time,
            window: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let summary = session.summary();
        self.sessions.insert(serial.to_string(), session);

        info!(
            event = "core.sessions.started",
            serial = serial,
            pid = summary.pid,
            session_id = %summary.id
        );

        self.spawn_resolution(
            serial,
            summary.pid,
            Duration::from_millis(self.config.window.settle_delay_ms),
            on_resolved,
        );

        Ok(summary)
    }

    /// Stop mirroring a device.
    ///
    /// A missing session is a no-op success to tolerate races with the
    /// process-exit callback.
    pub fn stop(&mut self, serial: &str) -> Result<(), SessionError> {
        let Some(session) = self.sessions.remove(serial) else {
            debug!(event = "core.sessions.stop_noop", serial = serial);
            return Ok(());
        };
        self.controller.evict(serial);

        // Start time 0 means identity capture failed at spawn; matching on
        // it would treat every process as reused.
        let start_time = (session.process_start_time > 0).then_some(session.process_start_time);

        match process::kill_process(session.pid, Some(&session.process_name), start_time) {
            Ok(()) => {
                info!(
                    event = "core.sessions.stopped",
                    serial = serial,
                    pid = session.pid
                );
                Ok(())
            }
            Err(ProcessError::NotFound { .. }) => {
                debug!(
                    event = "core.sessions.stop_already_exited",
                    serial = serial,
                    pid = session.pid
                );
                Ok(())
            }
            Err(ProcessError::PidReused { .. }) => {
                // The original child is gone and the PID belongs to someone
                // else now; killing would hit the wrong process.
                warn!(
                    event = "core.sessions.stop_pid_reused",
                    serial = serial,
                    pid = session.pid
                );
                Ok(())
            }
            Err(e) => Err(SessionError::ProcessKillFailed {
                pid: session.pid,
                message: e.to_string(),
            }),
        }
    }

    /// Stop, then schedule the relaunch after the restart delay.
    ///
    /// The delay avoids racing OS process-handle reuse between the kill and
    /// the relaunch; it runs on a timer thread so commands for other devices
    /// are not stalled behind it. `on_relaunch` fires on that thread once the
    /// delay elapses and is expected to route the relaunch back to the
    /// dispatch thread. Window state is re-applied from configuration on the
    /// new window, not carried over from the old session's runtime state.
    pub fn restart(
        &mut self,
        serial: &str,
        on_relaunch: impl FnOnce() + Send + 'static,
    ) -> Result<(), SessionError> {
        info!(event = "core.sessions.restart_started", serial = serial);
        self.stop(serial)?;

        let delay = Duration::from_millis(self.config.session.restart_delay_ms);
        let thread_name = format!("mirror-restart-{serial}");
        let spawned = thread::Builder::new().name(thread_name).spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            on_relaunch();
        });

        if let Err(e) = spawned {
            error!(
                event = "core.sessions.restart_spawn_failed",
                serial = serial,
                error = %e
            );
        }
        Ok(())
    }

    /// Schedule one background resolution pass for a session's window.
    ///
    /// The worker sleeps out the settle delay, enumerates once, and hands
    /// the result to `on_resolved` without touching registry state itself.
    pub fn spawn_resolution(
        &self,
        serial: &str,
        pid: u32,
        settle_delay: Duration,
        on_resolved: impl FnOnce(Result<(WindowHandle, String), WindowError>) + Send + 'static,
    ) {
        let backend = Arc::clone(&self.backend);
        let excluded = self.config.window.excluded_title_patterns.clone();
        let thread_name = format!("mirror-resolve-{serial}");

        let spawned = thread::Builder::new().name(thread_name).spawn(move || {
            if !settle_delay.is_zero() {
                thread::sleep(settle_delay);
            }
            on_resolved(resolve_window(backend.as_ref(), pid, &excluded));
        });

        if let Err(e) = spawned {
            error!(
                event = "core.sessions.resolution_spawn_failed",
                serial = serial,
                error = %e
            );
        }
    }

    /// Process-exit cleanup. Removes the session only when the PID matches,
    /// so an exit notification for an old process cannot tear down a
    /// session that was already restarted.
    pub fn handle_exit(&mut self, serial: &str, pid: u32) -> bool {
        match self.sessions.get(serial) {
            Some(session) if session.pid == pid => {
                self.sessions.remove(serial);
                self.controller.evict(serial);
                info!(
                    event = "core.sessions.exit_cleaned",
                    serial = serial,
                    pid = pid
                );
                true
            }
            Some(session) => {
                debug!(
                    event = "core.sessions.exit_stale_pid",
                    serial = serial,
                    exited_pid = pid,
                    current_pid = session.pid
                );
                false
            }
            None => false,
        }
    }

    /// Bind a resolved window to its session and apply the configured
    /// initial window state.
    ///
    /// Returns the `(kind, value)` states that were applied so the caller
    /// can emit state-changed notifications.
    pub fn attach_window(
        &mut self,
        serial: &str,
        handle: WindowHandle,
        title: String,
    ) -> Result<Vec<(WindowStateKind, bool)>, SessionError> {
        let session = self
            .sessions
            .get_mut(serial)
            .ok_or_else(|| SessionError::NoSession {
                serial: serial.to_string(),
            })?;
        session.window = Some(WindowAttachment {
            handle,
            title: title.clone(),
        });
        self.controller.attach(serial, handle);

        info!(
            event = "core.sessions.window_attached",
            serial = serial,
            handle = handle.as_raw(),
            title = %title
        );

        let device_config = self.config.device_config(serial);
        let mut applied = Vec::new();

        if device_config.fullscreen {
            let value = self.controller.toggle_fullscreen(serial)?;
            applied.push((WindowStateKind::Fullscreen, value));
        }
        if device_config.always_on_top {
            let value = self.controller.toggle_always_on_top(serial)?;
            applied.push((WindowStateKind::AlwaysOnTop, value));
        }
        // Fullscreen already stripped the chrome; toggling borderless on
        // top of it would read the bare style and restore the caption.
        if device_config.borderless && !device_config.fullscreen {
            let value = self.controller.toggle_borderless(serial)?;
            applied.push((WindowStateKind::Borderless, value));
        }

        Ok(applied)
    }

    pub fn toggle_fullscreen(&mut self, serial: &str) -> Result<bool, SessionError> {
        self.require_session(serial)?;
        self.window_op(serial, |c, s| c.toggle_fullscreen(s))
    }

    pub fn toggle_always_on_top(&mut self, serial: &str) -> Result<bool, SessionError> {
        self.require_session(serial)?;
        self.window_op(serial, |c, s| c.toggle_always_on_top(s))
    }

    pub fn toggle_borderless(&mut self, serial: &str) -> Result<bool, SessionError> {
        self.require_session(serial)?;
        self.window_op(serial, |c, s| c.toggle_borderless(s))
    }

    pub fn focus(&mut self, serial: &str) -> Result<(), SessionError> {
        self.require_session(serial)?;
        self.window_op(serial, |c, s| c.focus(s))
    }

    pub fn minimize(&mut self, serial: &str) -> Result<(), SessionError> {
        self.require_session(serial)?;
        self.window_op(serial, |c, s| c.minimize(s))
    }

    pub fn restore(&mut self, serial: &str) -> Result<(), SessionError> {
        self.require_session(serial)?;
        self.window_op(serial, |c, s| c.restore(s))
    }

    /// Run a controller operation, demoting the session's attachment when
    /// the cached handle turned out to be stale so the next resolution
    /// starts clean.
    fn window_op<T>(
        &mut self,
        serial: &str,
        op: impl FnOnce(&mut WindowStateController, &str) -> Result<T, WindowError>,
    ) -> Result<T, SessionError> {
        match op(&mut self.controller, serial) {
            Ok(value) => Ok(value),
            Err(WindowError::NoWindow { .. }) => {
                if let Some(session) = self.sessions.get_mut(serial) {
                    session.window = None;
                }
                Err(SessionError::WindowError {
                    source: WindowError::NoWindow {
                        serial: serial.to_string(),
                    },
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn require_session(&self, serial: &str) -> Result<(), SessionError> {
        if self.sessions.contains_key(serial) {
            Ok(())
        } else {
            Err(SessionError::NoSession {
                serial: serial.to_string(),
            })
        }
    }

    pub fn session(&self, serial: &str) -> Option<&MirroringSession> {
        self.sessions.get(serial)
    }

    pub fn pid_of(&self, serial: &str) -> Option<u32> {
        self.sessions.get(serial).map(|s| s.pid)
    }

    pub fn is_mirroring(&self, serial: &str) -> bool {
        self.sessions.contains_key(serial)
    }

    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<_> = self.sessions.values().map(|s| s.summary()).collect();
        summaries.sort_by(|a, b| a.serial.cmp(&b.serial));
        summaries
    }

    /// Stop every session, logging rather than aborting on failures.
    pub fn stop_all(&mut self) {
        let serials: Vec<String> = self.sessions.keys().cloned().collect();
        for serial in serials {
            if let Err(e) = self.stop(&serial) {
                error!(
                    event = "core.sessions.stop_all_failed",
                    serial = %serial,
                    error = %e
                );
            }
        }
    }
}
