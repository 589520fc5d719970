use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info, warn};

use crate::launcher::errors::LauncherError;
use crate::process;

/// Identity of a freshly spawned scrcpy child.
///
/// Name and start time are captured immediately after spawn so later kills
/// can verify the PID was not recycled.
#[derive(Debug, Clone)]
pub struct LaunchedProcess {
    pub pid: u32,
    pub process_name: String,
    pub process_start_time: u64,
}

/// Locate the `scrcpy` binary.
///
/// Checks `PATH` first, then common per-user install locations.
pub fn locate_scrcpy() -> Result<PathBuf, LauncherError> {
    if let Ok(path) = which::which("scrcpy") {
        debug!(event = "core.launcher.scrcpy_located", path = %path.display());
        return Ok(path);
    }

    let binary = if cfg!(windows) { "scrcpy.exe" } else { "scrcpy" };
    let candidates = [
        dirs::data_local_dir().map(|d| d.join("scrcpy").join(binary)),
        dirs::home_dir().map(|h| h.join("scrcpy").join(binary)),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.is_file() {
            debug!(event = "core.launcher.scrcpy_located", path = %candidate.display());
            return Ok(candidate);
        }
    }

    warn!(event = "core.launcher.scrcpy_not_found");
    Err(LauncherError::ScrcpyUnavailable)
}

/// Spawn a mirroring child process and supervise it until exit.
///
/// Stdout and stderr are drained on background threads into structured logs
/// so the child can never block on a full pipe. A watcher thread owns the
/// child handle, blocks in `wait()`, and invokes `on_exit` with the exit code
/// once the process terminates.
pub fn launch(
    binary: &Path,
    serial: &str,
    args: &[String],
    on_exit: impl FnOnce(u32, Option<i32>) + Send + 'static,
) -> Result<LaunchedProcess, LauncherError> {
    info!(
        event = "core.launcher.spawn_started",
        serial = serial,
        binary = %binary.display(),
        args = %args.join(" ")
    );

    let mut command = Command::new(binary);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    let mut child = command.spawn().map_err(|e| LauncherError::SpawnFailed {
        binary: binary.display().to_string(),
        message: e.to_string(),
    })?;

    let pid = child.id();

    if let Some(stdout) = child.stdout.take() {
        spawn_drain_thread(serial.to_string(), pid, "stdout", stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_drain_thread(serial.to_string(), pid, "stderr", stderr);
    }

    // Capture identity before handing the child to the watcher, so kills can
    // detect PID reuse later.
    let (process_name, process_start_time) = match process::get_process_info(pid) {
        Ok(info) => (info.name, info.start_time),
        Err(e) => {
            debug!(
                event = "core.launcher.identity_unavailable",
                pid = pid,
                error = %e
            );
            (
                binary
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "scrcpy".to_string()),
                0,
            )
        }
    };

    let watcher_serial = serial.to_string();
    thread::Builder::new()
        .name(format!("mirror-exit-{serial}"))
        .spawn(move || {
            let code = match child.wait() {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!(
                        event = "core.launcher.wait_failed",
                        serial = %watcher_serial,
                        pid = pid,
                        error = %e
                    );
                    None
                }
            };
            info!(
                event = "core.launcher.exited",
                serial = %watcher_serial,
                pid = pid,
                code = code
            );
            on_exit(pid, code);
        })
        .map_err(|e| LauncherError::SpawnFailed {
            binary: binary.display().to_string(),
            message: format!("Failed to spawn exit watcher: {e}"),
        })?;

    info!(event = "core.launcher.spawn_completed", serial = serial, pid = pid);

    Ok(LaunchedProcess {
        pid,
        process_name,
        process_start_time,
    })
}

fn spawn_drain_thread(
    serial: String,
    pid: u32,
    stream: &'static str,
    reader: impl std::io::Read + Send + 'static,
) {
    let _ = thread::Builder::new()
        .name(format!("mirror-{stream}-{serial}"))
        .spawn(move || {
            let buffered = BufReader::new(reader);
            for line in buffered.lines() {
                match line {
                    Ok(line) if !line.is_empty() => {
                        debug!(
                            event = "core.launcher.output",
                            serial = %serial,
                            pid = pid,
                            stream = stream,
                            line = %line
                        );
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });
}
