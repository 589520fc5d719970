//! Single-writer command dispatch.
//!
//! All session and window mutation happens on one dispatch thread that owns
//! the [`SessionRegistry`](crate::sessions::SessionRegistry). Callers send
//! [`Command`]s through a [`DispatcherHandle`]; background workers (exit
//! watchers, resolution workers) marshal their results back the same way as
//! internal commands, so shared state never sees concurrent writers.

pub mod dispatch;
pub mod errors;
pub mod events;
pub mod store;
pub mod types;

pub use dispatch::{Dispatcher, DispatcherHandle};
pub use errors::DispatchError;
pub use events::Event;
pub use store::{SessionStore, Store};
pub use types::Command;
