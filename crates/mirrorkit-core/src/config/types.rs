//! Configuration type definitions for mirrorkit.
//!
//! [`DeviceConfig`] carries every option the scrcpy argument builder knows
//! how to format. The core treats it as an opaque bag of values; nothing here
//! is interpreted beyond turning it into command-line flags.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Runtime configuration derived from environment variables and system
/// defaults, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all mirrorkit data (default: ~/.mirrorkit)
    pub base_dir: PathBuf,
    /// Log level for the application
    pub log_level: String,
}

/// Main configuration loaded from `~/.mirrorkit/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MirrorConfig {
    /// Global device configuration applied to every device without an override.
    #[serde(default)]
    pub defaults: DeviceConfig,

    /// Per-device overrides keyed by serial.
    #[serde(default)]
    pub devices: HashMap<String, DeviceEntry>,

    /// Window resolution and control settings.
    #[serde(default)]
    pub window: WindowConfig,

    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Per-device entry: either defers to the global config or replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceEntry {
    /// When true (the default), the global `defaults` config is used and the
    /// embedded values are ignored.
    #[serde(default = "super::defaults::default_use_global_config")]
    pub use_global_config: bool,

    #[serde(flatten)]
    pub config: DeviceConfig,
}

/// Window bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Delay in milliseconds between process spawn and the single window
    /// resolution pass, giving the child time to create its window.
    /// Default: 1000ms.
    #[serde(default = "super::defaults::default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Title substrings (case-insensitive) that mark helper windows to skip
    /// during resolution. Best-effort heuristic, not a guaranteed-correct
    /// identification mechanism.
    #[serde(default = "super::defaults::default_excluded_title_patterns")]
    pub excluded_title_patterns: Vec<String>,
}

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Delay in milliseconds between stop and relaunch during a restart,
    /// avoiding races with OS process-handle reuse. Default: 500ms.
    #[serde(default = "super::defaults::default_restart_delay_ms")]
    pub restart_delay_ms: u64,
}

/// Options serialized into the scrcpy argument list.
///
/// Field defaults match scrcpy's own defaults so that a default config
/// produces a minimal argument list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    // Video
    /// Maximum dimension in pixels; 0 = native.
    #[serde(default)]
    pub max_size: u32,
    /// Video bit rate in Mbps.
    #[serde(default = "super::defaults::default_bitrate_mbps")]
    pub bitrate_mbps: u32,
    /// Frame rate cap; 0 = auto.
    #[serde(default)]
    pub max_fps: u32,
    /// h264, h265 or av1.
    #[serde(default = "super::defaults::default_video_codec")]
    pub video_codec: String,
    /// display or camera.
    #[serde(default = "super::defaults::default_video_source")]
    pub video_source: String,
    /// 0, 90, 180 or 270.
    #[serde(default)]
    pub rotation: u32,
    /// Crop in w:h:x:y format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    /// Display buffer in milliseconds.
    #[serde(default)]
    pub display_buffer_ms: u32,

    // Audio
    #[serde(default = "super::defaults::default_true")]
    pub enable_audio: bool,
    /// opus, aac, flac or raw.
    #[serde(default = "super::defaults::default_audio_codec")]
    pub audio_codec: String,
    /// output or playback.
    #[serde(default = "super::defaults::default_audio_source")]
    pub audio_source: String,
    /// Audio buffer in milliseconds.
    #[serde(default = "super::defaults::default_audio_buffer_ms")]
    pub audio_buffer_ms: u32,

    // Control
    #[serde(default)]
    pub turn_screen_off: bool,
    #[serde(default)]
    pub stay_awake: bool,
    #[serde(default)]
    pub show_touches: bool,
    #[serde(default)]
    pub disable_control: bool,
    /// aoa, hid or uhid.
    #[serde(default = "super::defaults::default_input_mode")]
    pub keyboard_mode: String,
    /// aoa, hid or uhid.
    #[serde(default = "super::defaults::default_input_mode")]
    pub mouse_mode: String,

    // Window
    #[serde(default)]
    pub borderless: bool,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "super::defaults::default_true")]
    pub lock_aspect_ratio: bool,
    /// Window title; None = device model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_height: Option<u32>,

    // Recording
    #[serde(default)]
    pub enable_recording: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_path: Option<String>,
    /// mp4 or mkv.
    #[serde(default = "super::defaults::default_record_format")]
    pub record_format: String,

    // Other
    #[serde(default = "super::defaults::default_true")]
    pub disable_screensaver: bool,
    #[serde(default)]
    pub power_off_on_close: bool,
}

impl MirrorConfig {
    /// Effective configuration for a device: its override when present and
    /// not deferring to the global config, otherwise the global defaults.
    pub fn device_config(&self, serial: &str) -> DeviceConfig {
        match self.devices.get(serial) {
            Some(entry) if !entry.use_global_config => entry.config.clone(),
            _ => self.defaults.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_config_falls_back_to_defaults() {
        let config = MirrorConfig::default();
        let device = config.device_config("UNKNOWN");
        assert_eq!(device, config.defaults);
    }

    #[test]
    fn test_device_config_uses_override_when_not_global() {
        let mut config = MirrorConfig::default();
        let mut override_cfg = DeviceConfig::default();
        override_cfg.fullscreen = true;
        config.devices.insert(
            "ABC123".to_string(),
            DeviceEntry {
                use_global_config: false,
                config: override_cfg,
            },
        );

        assert!(config.device_config("ABC123").fullscreen);
        assert!(!config.device_config("OTHER").fullscreen);
    }

    #[test]
    fn test_device_entry_defers_to_global_by_default() {
        let mut config = MirrorConfig::default();
        config.defaults.always_on_top = true;
        let mut override_cfg = DeviceConfig::default();
        override_cfg.always_on_top = false;
        config.devices.insert(
            "ABC123".to_string(),
            DeviceEntry {
                use_global_config: true,
                config: override_cfg,
            },
        );

        assert!(config.device_config("ABC123").always_on_top);
    }

    #[test]
    fn test_mirror_config_serde_roundtrip() {
        let mut config = MirrorConfig::default();
        config.defaults.bitrate_mbps = 16;
        config.window.settle_delay_ms = 1500;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: MirrorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
