//! mirrorkit-core: Core library for scrcpy session and window management
//!
//! This library provides the business logic for mirroring Android devices
//! through scrcpy: launching and supervising mirroring processes, locating
//! the window each process creates, and manipulating that window (fullscreen,
//! always-on-top, borderless, focus, minimize, restore) without owning it.
//!
//! # Main Entry Points
//!
//! - [`state`] - Command dispatch on the single owning thread
//! - [`sessions`] - Session registry (start, stop, restart per device)
//! - [`window`] - Window resolution and state control
//! - [`adb`] - Connected device discovery
//! - [`config`] - Configuration management

pub mod adb;
pub mod config;
pub mod errors;
pub mod events;
pub mod launcher;
pub mod logging;
pub mod process;
pub mod sessions;
pub mod state;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use adb::types::DeviceRecord;
pub use config::{Config, DeviceConfig, MirrorConfig};
pub use sessions::types::{MirroringSession, SessionSummary, WindowAttachment};
pub use state::{Command, Dispatcher, DispatcherHandle, Event, Store};
pub use window::types::WindowStateKind;

// Re-export logging initialization
pub use logging::init_logging;
