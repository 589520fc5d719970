use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::config::MirrorConfig;
use crate::sessions::registry::SessionRegistry;
use crate::state::errors::DispatchError;
use crate::state::events::Event;
use crate::state::store::{SessionStore, Store};
use crate::state::types::Command;
use crate::window::WindowBackend;

enum Envelope {
    Request {
        cmd: Command,
        reply: mpsc::Sender<Result<Vec<Event>, DispatchError>>,
    },
    Internal {
        cmd: Command,
    },
    Shutdown,
}

/// Sender used by background workers to marshal results back onto the
/// dispatch thread as internal commands. Internal commands get no reply;
/// failures are logged by the dispatch loop.
#[derive(Clone)]
pub struct InternalPoster {
    tx: mpsc::Sender<Envelope>,
}

impl InternalPoster {
    pub(crate) fn post(&self, cmd: Command) {
        if self.tx.send(Envelope::Internal { cmd }).is_err() {
            // Dispatcher already shut down; the result is moot.
            debug!(event = "core.state.internal_post_dropped");
        }
    }
}

/// Owns the dispatch thread.
pub struct Dispatcher;

impl Dispatcher {
    /// Spawn the dispatch thread.
    ///
    /// Events produced by every successful command, including internal
    /// ones, are mirrored onto `events_tx` for the notification sink.
    pub fn spawn(
        config: MirrorConfig,
        backend: Arc<dyn WindowBackend>,
        events_tx: mpsc::Sender<Event>,
    ) -> std::io::Result<DispatcherHandle> {
        let registry = SessionRegistry::new(config, backend);
        Self::spawn_with_registry(registry, events_tx)
    }

    pub(crate) fn spawn_with_registry(
        registry: SessionRegistry,
        events_tx: mpsc::Sender<Event>,
    ) -> std::io::Result<DispatcherHandle> {
        let (tx, rx) = mpsc::channel::<Envelope>();
        let internal = InternalPoster { tx: tx.clone() };

        let join = thread::Builder::new()
            .name("mirror-dispatch".to_string())
            .spawn(move || {
                let mut store = SessionStore::new(registry, internal);

                while let Ok(envelope) = rx.recv() {
                    match envelope {
                        Envelope::Request { cmd, reply } => {
                            let result = store.dispatch(cmd);
                            if let Ok(events) = &result {
                                forward_events(&events_tx, events);
                            }
                            let _ = reply.send(result);
                        }
                        Envelope::Internal { cmd } => match store.dispatch(cmd) {
                            Ok(events) => forward_events(&events_tx, &events),
                            Err(e) => {
                                error!(event = "core.state.internal_dispatch_failed", error = %e);
                            }
                        },
                        Envelope::Shutdown => {
                            store.shutdown();
                            break;
                        }
                    }
                }
                debug!(event = "core.state.dispatch_loop_ended");
            })?;

        Ok(DispatcherHandle {
            tx,
            join: Some(join),
        })
    }
}

fn forward_events(events_tx: &mpsc::Sender<Event>, events: &[Event]) {
    for event in events {
        if events_tx.send(event.clone()).is_err() {
            // Nobody is listening; notifications are best-effort.
            return;
        }
    }
}

/// Handle for sending commands to the dispatch thread.
///
/// Dropping the handle shuts the dispatcher down, stopping every live
/// session first.
pub struct DispatcherHandle {
    tx: mpsc::Sender<Envelope>,
    join: Option<JoinHandle<()>>,
}

impl DispatcherHandle {
    /// Execute a command on the dispatch thread and wait for its result.
    pub fn execute(&self, cmd: Command) -> Result<Vec<Event>, DispatchError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Envelope::Request {
                cmd,
                reply: reply_tx,
            })
            .map_err(|_| DispatchError::ChannelClosed)?;
        reply_rx.recv().map_err(|_| DispatchError::ChannelClosed)?
    }

    /// Stop all sessions and join the dispatch thread.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.tx.send(Envelope::Shutdown);
            let _ = join.join();
        }
    }
}

impl Drop for DispatcherHandle {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::window::WindowStateKind;
    use crate::window::testing::FakeBackend;

    const SERIAL: &str = "ABC123";

    struct TestDispatcher {
        backend: Arc<FakeBackend>,
        handle: DispatcherHandle,
        events_rx: mpsc::Receiver<Event>,
        // Holds the fake scrcpy script alive for the test's duration.
        _bin_dir: tempfile::TempDir,
    }

    /// Dispatcher over a fake backend and a stand-in binary that ignores
    /// its arguments and stays alive until killed, like a real mirroring
    /// child would.
    fn spawn_test_dispatcher(settle_delay_ms: u64) -> TestDispatcher {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let script = bin_dir.path().join("fake-scrcpy");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").expect("Failed to write script");
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let mut config = MirrorConfig::default();
        config.window.settle_delay_ms = settle_delay_ms;
        config.session.restart_delay_ms = 0;

        let backend = Arc::new(FakeBackend::new());
        let registry = SessionRegistry::new(config, backend.clone()).with_binary(script);

        let (events_tx, events_rx) = mpsc::channel();
        let handle = Dispatcher::spawn_with_registry(registry, events_tx).unwrap();
        TestDispatcher {
            backend,
            handle,
            events_rx,
            _bin_dir: bin_dir,
        }
    }

    fn wait_for_event(
        events_rx: &mpsc::Receiver<Event>,
        predicate: impl Fn(&Event) -> bool,
    ) -> Event {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            let remaining = deadline
                .checked_duration_since(std::time::Instant::now())
                .expect("Timed out waiting for event");
            let event = events_rx.recv_timeout(remaining).expect("Event channel closed");
            if predicate(&event) {
                return event;
            }
        }
    }

    #[test]
    fn test_start_toggle_stop_scenario() {
        let td = spawn_test_dispatcher(300);

        let events = td
            .handle
            .execute(Command::StartMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        let Event::MirroringStarted { pid, .. } = &events[0] else {
            panic!("Expected MirroringStarted, got {events:?}");
        };

        // Create the window before the settle delay elapses so the
        // resolution worker finds it.
        td.backend.add_window(1, *pid, "Pixel 8");
        wait_for_event(&td.events_rx, |e| matches!(e, Event::WindowResolved { .. }));

        let events = td
            .handle
            .execute(Command::ToggleFullscreen {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![Event::WindowStateChanged {
                serial: SERIAL.to_string(),
                kind: WindowStateKind::Fullscreen,
                value: true,
            }]
        );

        let events = td
            .handle
            .execute(Command::ToggleFullscreen {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![Event::WindowStateChanged {
                serial: SERIAL.to_string(),
                kind: WindowStateKind::Fullscreen,
                value: false,
            }]
        );

        let events = td
            .handle
            .execute(Command::StopMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![Event::MirroringStopped {
                serial: SERIAL.to_string(),
            }]
        );

        td.handle.shutdown();
    }

    #[test]
    fn test_toggle_after_stop_is_an_error() {
        let td = spawn_test_dispatcher(10_000);

        td.handle
            .execute(Command::StartMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        td.handle
            .execute(Command::StopMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();

        let result = td.handle.execute(Command::ToggleFullscreen {
            serial: SERIAL.to_string(),
        });
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("No active session")
        );
    }

    #[test]
    fn test_restart_relaunches_via_internal_command() {
        let td = spawn_test_dispatcher(10_000);

        let events = td
            .handle
            .execute(Command::StartMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        let Event::MirroringStarted { pid, .. } = &events[0] else {
            panic!("Expected MirroringStarted");
        };
        let first_pid = *pid;

        // Restart replies immediately with the stop; the relaunch comes
        // through the queue afterwards.
        let events = td
            .handle
            .execute(Command::RestartMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![Event::MirroringStopped {
                serial: SERIAL.to_string(),
            }]
        );

        let started = wait_for_event(&td.events_rx, |e| {
            matches!(e, Event::MirroringStarted { pid, .. } if *pid != first_pid)
        });
        let Event::MirroringStarted { pid: new_pid, .. } = started else {
            unreachable!();
        };

        let events = td.handle.execute(Command::ListSessions).unwrap();
        let Event::SessionsListed { sessions } = &events[0] else {
            panic!("Expected SessionsListed");
        };
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].pid, new_pid);
    }

    #[test]
    fn test_stop_without_session_succeeds() {
        let td = spawn_test_dispatcher(10_000);

        let events = td
            .handle
            .execute(Command::StopMirroring {
                serial: "UNKNOWN".to_string(),
            })
            .unwrap();
        assert_eq!(
            events,
            vec![Event::MirroringStopped {
                serial: "UNKNOWN".to_string(),
            }]
        );
    }

    #[test]
    fn test_list_sessions_reports_active_sessions() {
        let td = spawn_test_dispatcher(10_000);

        td.handle
            .execute(Command::StartMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();

        let events = td.handle.execute(Command::ListSessions).unwrap();
        let Event::SessionsListed { sessions } = &events[0] else {
            panic!("Expected SessionsListed");
        };
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].serial, SERIAL);
    }

    #[test]
    fn test_session_exit_notification_emits_stop_event() {
        let td = spawn_test_dispatcher(10_000);

        let events = td
            .handle
            .execute(Command::StartMirroring {
                serial: SERIAL.to_string(),
            })
            .unwrap();
        let Event::MirroringStarted { pid, .. } = &events[0] else {
            panic!("Expected MirroringStarted");
        };
        // Drain the started event off the notification channel.
        wait_for_event(&td.events_rx, |e| matches!(e, Event::MirroringStarted { .. }));

        // Post the exit notification the way the exit watcher would.
        td.handle
            .execute(Command::SessionExited {
                serial: SERIAL.to_string(),
                pid: *pid,
            })
            .unwrap();
        wait_for_event(&td.events_rx, |e| {
            matches!(e, Event::MirroringStopped { serial } if serial == SERIAL)
        });

        let events = td.handle.execute(Command::ListSessions).unwrap();
        assert_eq!(events, vec![Event::SessionsListed { sessions: vec![] }]);
    }

    #[test]
    fn test_attach_after_exit_is_benign() {
        let td = spawn_test_dispatcher(10_000);

        // No session exists; a late resolution result must be dropped
        // without error.
        let events = td
            .handle
            .execute(Command::AttachWindow {
                serial: SERIAL.to_string(),
                handle_raw: 99,
                title: "Pixel 8".to_string(),
            })
            .unwrap();
        assert!(events.is_empty());
    }
}
