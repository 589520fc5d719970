//! Spawning and supervising scrcpy processes.
//!
//! Each mirroring session runs one scrcpy child. Arguments are derived from
//! device configuration, stdout/stderr are drained into structured logs, and
//! a watcher thread reports exit so session state never goes stale.

pub mod args;
pub mod errors;
pub mod operations;

pub use args::{build_args, normalize_record_path};
pub use errors::LauncherError;
pub use operations::{LaunchedProcess, launch, locate_scrcpy};
