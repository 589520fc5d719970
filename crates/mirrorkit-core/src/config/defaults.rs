//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations and helper functions
//! for providing default values in serde deserialization.

use crate::config::types::{Config, DeviceConfig, SessionConfig, WindowConfig};
use std::path::PathBuf;

pub fn default_use_global_config() -> bool {
    true
}

/// Returns the default window settle delay in milliseconds (1000ms).
///
/// scrcpy creates its SDL window asynchronously after spawn; one second is
/// the observed upper bound on typical hardware before the window exists.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_settle_delay_ms() -> u64 {
    1000
}

/// Returns the default restart relaunch delay in milliseconds (500ms).
pub fn default_restart_delay_ms() -> u64 {
    500
}

/// Title substrings identifying helper/console windows to skip during
/// window resolution.
pub fn default_excluded_title_patterns() -> Vec<String> {
    vec![
        "cmd".to_string(),
        "powershell".to_string(),
        "console".to_string(),
    ]
}

pub fn default_true() -> bool {
    true
}

pub fn default_bitrate_mbps() -> u32 {
    8
}

pub fn default_video_codec() -> String {
    "h264".to_string()
}

pub fn default_video_source() -> String {
    "display".to_string()
}

pub fn default_audio_codec() -> String {
    "opus".to_string()
}

pub fn default_audio_source() -> String {
    "output".to_string()
}

pub fn default_audio_buffer_ms() -> u32 {
    50
}

pub fn default_input_mode() -> String {
    "uhid".to_string()
}

pub fn default_record_format() -> String {
    "mp4".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            excluded_title_patterns: default_excluded_title_patterns(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: default_restart_delay_ms(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            max_size: 0,
            bitrate_mbps: default_bitrate_mbps(),
            max_fps: 0,
            video_codec: default_video_codec(),
            video_source: default_video_source(),
            rotation: 0,
            crop: None,
            display_buffer_ms: 0,
            enable_audio: true,
            audio_codec: default_audio_codec(),
            audio_source: default_audio_source(),
            audio_buffer_ms: default_audio_buffer_ms(),
            turn_screen_off: false,
            stay_awake: false,
            show_touches: false,
            disable_control: false,
            keyboard_mode: default_input_mode(),
            mouse_mode: default_input_mode(),
            borderless: false,
            always_on_top: false,
            fullscreen: false,
            lock_aspect_ratio: true,
            window_title: None,
            window_x: None,
            window_y: None,
            window_width: None,
            window_height: None,
            enable_recording: false,
            record_path: None,
            record_format: default_record_format(),
            disable_screensaver: true,
            power_off_on_close: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let base_dir = match dirs::home_dir() {
            Some(home) => home.join(".mirrorkit"),
            None => {
                eprintln!(
                    "Warning: Could not find home directory. Set HOME environment variable. \
                    Using fallback directory."
                );
                std::env::temp_dir().join(".mirrorkit")
            }
        };

        Self {
            base_dir,
            log_level: std::env::var("MIRRORKIT_LOG_LEVEL").unwrap_or("info".to_string()),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }
}
