//! # Configuration System
//!
//! JSON configuration for mirrorkit.
//!
//! Two layers of configuration exist:
//!
//! 1. **Runtime [`Config`]** - paths and settings derived from environment
//!    variables and system defaults (base directory, log level).
//! 2. **[`MirrorConfig`]** - user preferences loaded from
//!    `~/.mirrorkit/config.json`: a global [`DeviceConfig`] plus optional
//!    per-device overrides keyed by serial.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "defaults": { "bitrate_mbps": 8, "video_codec": "h264" },
//!   "devices": {
//!     "ABC123": { "use_global_config": false, "fullscreen": true }
//!   },
//!   "window": { "settle_delay_ms": 1000 }
//! }
//! ```
//!
//! A missing config file is not an error (defaults apply); a file that exists
//! but does not parse fails loudly rather than silently falling back.

pub mod defaults;
pub mod loading;
pub mod types;

// Public API exports
pub use types::{Config, DeviceConfig, DeviceEntry, MirrorConfig, SessionConfig, WindowConfig};

impl MirrorConfig {
    /// Load configuration from `~/.mirrorkit/config.json`.
    ///
    /// See [`loading::load`] for details.
    pub fn load() -> Result<Self, crate::errors::ConfigError> {
        loading::load(&Config::new().config_path())
    }
}
