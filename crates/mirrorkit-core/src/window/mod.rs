//! Window ownership bridge for externally-spawned mirroring processes.
//!
//! The mirroring child creates its own top-level window some time after
//! spawn; nothing hands us a handle. This module finds that window by
//! enumerating top-level windows and matching the owning PID, then mutates
//! style bits and geometry through a cached handle that is validated for
//! liveness before every operation.
//!
//! All OS calls go through the [`WindowBackend`] trait so the resolution and
//! state logic stays platform-neutral and testable; the Win32 implementation
//! lives in [`win32`].

pub mod backend;
pub mod controller;
pub mod errors;
pub mod resolver;
pub mod types;

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{WindowBackend, native_backend};
pub use controller::{WindowStateController, WindowStateFlags};
pub use errors::WindowError;
pub use resolver::resolve_window;
pub use types::{TopLevelWindow, WindowHandle, WindowRect, WindowStateKind, ZOrder};
