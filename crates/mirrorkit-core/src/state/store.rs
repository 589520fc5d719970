use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::sessions::errors::SessionError;
use crate::sessions::registry::SessionRegistry;
use crate::state::dispatch::InternalPoster;
use crate::state::errors::DispatchError;
use crate::state::events::Event;
use crate::state::types::Command;
use crate::window::{WindowError, WindowHandle, WindowStateKind};

/// Trait for dispatching commands against session state.
///
/// # Semantics
///
/// - **Ordering**: commands execute in the order received, one at a time.
/// - **Events**: on success, dispatch returns the events describing what
///   changed, in chronological order. Internal commands may legitimately
///   produce no events (e.g. a stale exit notification).
/// - **Errors**: implementations define their own error type and should
///   distinguish user errors from system errors.
pub trait Store {
    type Error;
    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Event>, Self::Error>;
}

/// Store implementation that routes commands to the [`SessionRegistry`].
///
/// Holds the poster used to wire background-worker callbacks (exit watcher,
/// resolution worker) back into the dispatch queue as internal commands.
pub struct SessionStore {
    registry: SessionRegistry,
    internal: InternalPoster,
}

impl SessionStore {
    pub fn new(registry: SessionRegistry, internal: InternalPoster) -> Self {
        Self { registry, internal }
    }

    /// Stop every session. Called once on dispatcher shutdown.
    pub(crate) fn shutdown(&mut self) {
        self.registry.stop_all();
    }

    fn exit_callback(&self, serial: &str) -> impl FnOnce(u32, Option<i32>) + Send + 'static {
        let poster = self.internal.clone();
        let serial = serial.to_string();
        move |pid, _code| {
            poster.post(Command::SessionExited { serial, pid });
        }
    }

    fn resolved_callback(
        &self,
        serial: &str,
    ) -> impl FnOnce(Result<(WindowHandle, String), WindowError>) + Send + 'static {
        let poster = self.internal.clone();
        let serial = serial.to_string();
        move |result| match result {
            Ok((handle, title)) => {
                poster.post(Command::AttachWindow {
                    serial,
                    handle_raw: handle.as_raw(),
                    title,
                });
            }
            Err(e) => {
                // No automatic retry; the next user-initiated window
                // operation schedules a fresh resolution pass.
                warn!(
                    event = "core.state.resolution_failed",
                    serial = %serial,
                    error = %e
                );
            }
        }
    }

    fn start(&mut self, serial: String) -> Result<Vec<Event>, DispatchError> {
        let on_exit = self.exit_callback(&serial);
        let on_resolved = self.resolved_callback(&serial);
        let summary = self.registry.start(&serial, on_exit, on_resolved)?;
        Ok(vec![Event::MirroringStarted {
            serial,
            pid: summary.pid,
            session_id: summary.id,
        }])
    }

    /// Stop now, relaunch later. The relaunch comes back through the queue
    /// as an internal `StartMirroring` once the restart delay elapses, so
    /// the dispatch thread never sleeps; `MirroringStarted` for the new
    /// process arrives on the notification channel.
    fn restart(&mut self, serial: String) -> Result<Vec<Event>, DispatchError> {
        let poster = self.internal.clone();
        let relaunch_serial = serial.clone();
        self.registry.restart(&serial, move || {
            poster.post(Command::StartMirroring {
                serial: relaunch_serial,
            });
        })?;
        Ok(vec![Event::MirroringStopped { serial }])
    }

    fn toggle(
        &mut self,
        serial: String,
        kind: WindowStateKind,
    ) -> Result<Vec<Event>, DispatchError> {
        let result = match kind {
            WindowStateKind::Fullscreen => self.registry.toggle_fullscreen(&serial),
            WindowStateKind::AlwaysOnTop => self.registry.toggle_always_on_top(&serial),
            WindowStateKind::Borderless => self.registry.toggle_borderless(&serial),
        };
        match result {
            Ok(value) => Ok(vec![Event::WindowStateChanged {
                serial,
                kind,
                value,
            }]),
            Err(e) => {
                self.schedule_reresolution_if_stale(&serial, &e);
                Err(e.into())
            }
        }
    }

    fn window_command(
        &mut self,
        serial: String,
        op: impl FnOnce(&mut SessionRegistry, &str) -> Result<(), SessionError>,
        event: impl FnOnce(String) -> Event,
    ) -> Result<Vec<Event>, DispatchError> {
        match op(&mut self.registry, &serial) {
            Ok(()) => Ok(vec![event(serial)]),
            Err(e) => {
                self.schedule_reresolution_if_stale(&serial, &e);
                Err(e.into())
            }
        }
    }

    /// A stale-handle failure schedules exactly one background resolution
    /// pass so the next attempt can find the recreated window.
    fn schedule_reresolution_if_stale(&self, serial: &str, error: &SessionError) {
        let is_stale = matches!(
            error,
            SessionError::WindowError {
                source: WindowError::NoWindow { .. }
            }
        );
        if !is_stale {
            return;
        }
        let Some(pid) = self.registry.pid_of(serial) else {
            return;
        };

        info!(
            event = "core.state.reresolution_scheduled",
            serial = serial,
            pid = pid
        );
        let on_resolved = self.resolved_callback(serial);
        self.registry
            .spawn_resolution(serial, pid, Duration::ZERO, on_resolved);
    }

    fn attach_window(
        &mut self,
        serial: String,
        handle_raw: isize,
        title: String,
    ) -> Result<Vec<Event>, DispatchError> {
        let handle = WindowHandle::from_raw(handle_raw);
        match self.registry.attach_window(&serial, handle, title.clone()) {
            Ok(applied) => {
                let mut events = vec![Event::WindowResolved {
                    serial: serial.clone(),
                    title,
                }];
                events.extend(applied.into_iter().map(|(kind, value)| {
                    Event::WindowStateChanged {
                        serial: serial.clone(),
                        kind,
                        value,
                    }
                }));
                Ok(events)
            }
            Err(SessionError::NoSession { .. }) => {
                // Session ended while the resolution worker was running.
                debug!(event = "core.state.attach_after_exit", serial = %serial);
                Ok(vec![])
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Store for SessionStore {
    type Error = DispatchError;

    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Event>, DispatchError> {
        debug!(event = "core.state.dispatch_started", command = ?cmd);

        let result = match cmd {
            Command::StartMirroring { serial } => self.start(serial),
            Command::StopMirroring { serial } => {
                self.registry.stop(&serial)?;
                Ok(vec![Event::MirroringStopped { serial }])
            }
            Command::RestartMirroring { serial } => self.restart(serial),
            Command::ToggleFullscreen { serial } => {
                self.toggle(serial, WindowStateKind::Fullscreen)
            }
            Command::ToggleAlwaysOnTop { serial } => {
                self.toggle(serial, WindowStateKind::AlwaysOnTop)
            }
            Command::ToggleBorderless { serial } => {
                self.toggle(serial, WindowStateKind::Borderless)
            }
            Command::FocusWindow { serial } => self.window_command(
                serial,
                |r, s| r.focus(s),
                |serial| Event::WindowFocused { serial },
            ),
            Command::MinimizeWindow { serial } => self.window_command(
                serial,
                |r, s| r.minimize(s),
                |serial| Event::WindowMinimized { serial },
            ),
            Command::RestoreWindow { serial } => self.window_command(
                serial,
                |r, s| r.restore(s),
                |serial| Event::WindowRestored { serial },
            ),
            Command::ListSessions => Ok(vec![Event::SessionsListed {
                sessions: self.registry.list(),
            }]),
            Command::SessionExited { serial, pid } => {
                if self.registry.handle_exit(&serial, pid) {
                    Ok(vec![Event::MirroringStopped { serial }])
                } else {
                    Ok(vec![])
                }
            }
            Command::AttachWindow {
                serial,
                handle_raw,
                title,
            } => self.attach_window(serial, handle_raw, title),
        };

        match &result {
            Ok(events) => info!(
                event = "core.state.dispatch_completed",
                event_count = events.len()
            ),
            Err(e) => error!(event = "core.state.dispatch_failed", error = %e),
        }

        result
    }
}
