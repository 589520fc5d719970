//! Session lifecycle: one mirroring process per device serial.
//!
//! The [`SessionRegistry`] owns the serial -> session map and guarantees at
//! most one live session per serial. It is not internally synchronized; all
//! access is expected to happen on the dispatch thread (see
//! [`crate::state`]), with background workers reporting back through
//! callbacks.

pub mod errors;
pub mod registry;
pub mod types;

pub use errors::SessionError;
pub use registry::SessionRegistry;
pub use types::{MirroringSession, SessionSummary, WindowAttachment};
