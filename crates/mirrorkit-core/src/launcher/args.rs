//! Translation of [`DeviceConfig`] into a scrcpy argument list.
//!
//! Flags matching scrcpy's own defaults are omitted so the resulting command
//! line stays short and readable in logs.

use std::path::Path;

use chrono::Local;

use crate::config::DeviceConfig;

/// Build the full scrcpy argument list for a device.
pub fn build_args(serial: &str, config: &DeviceConfig) -> Vec<String> {
    let mut args = vec!["-s".to_string(), serial.to_string()];

    // Video
    if config.max_size > 0 {
        args.push(format!("--max-size={}", config.max_size));
    }
    args.push(format!("--video-bit-rate={}M", config.bitrate_mbps));
    if config.max_fps > 0 {
        args.push(format!("--max-fps={}", config.max_fps));
    }
    args.push(format!("--video-codec={}", config.video_codec));
    if config.video_source != "display" {
        args.push(format!("--video-source={}", config.video_source));
    }
    if config.rotation != 0 {
        args.push(format!("--rotation={}", config.rotation));
    }
    if let Some(crop) = &config.crop {
        args.push(format!("--crop={crop}"));
    }
    if config.display_buffer_ms > 0 {
        args.push(format!("--display-buffer={}", config.display_buffer_ms));
    }

    // Audio
    if !config.enable_audio {
        args.push("--no-audio".to_string());
    } else {
        args.push(format!("--audio-codec={}", config.audio_codec));
        if config.audio_source != "output" {
            args.push(format!("--audio-source={}", config.audio_source));
        }
        if config.audio_buffer_ms != 50 {
            args.push(format!("--audio-buffer={}", config.audio_buffer_ms));
        }
    }

    // Control
    if config.turn_screen_off {
        args.push("--turn-screen-off".to_string());
    }
    if config.stay_awake {
        args.push("--stay-awake".to_string());
    }
    if config.show_touches {
        args.push("--show-touches".to_string());
    }
    if config.disable_control {
        args.push("--no-control".to_string());
    }
    if config.keyboard_mode != "uhid" {
        args.push(format!("--keyboard={}", config.keyboard_mode));
    }
    if config.mouse_mode != "uhid" {
        args.push(format!("--mouse={}", config.mouse_mode));
    }

    // Window
    if config.borderless {
        args.push("--window-borderless".to_string());
    }
    if config.always_on_top {
        args.push("--always-on-top".to_string());
    }
    if config.fullscreen {
        args.push("--fullscreen".to_string());
    }
    if !config.lock_aspect_ratio {
        args.push("--no-window-clip".to_string());
    }
    if let Some(title) = &config.window_title {
        args.push(format!("--window-title={title}"));
    }
    if let Some(x) = config.window_x {
        args.push(format!("--window-x={x}"));
    }
    if let Some(y) = config.window_y {
        args.push(format!("--window-y={y}"));
    }
    if let Some(width) = config.window_width {
        args.push(format!("--window-width={width}"));
    }
    if let Some(height) = config.window_height {
        args.push(format!("--window-height={height}"));
    }

    // Recording
    if config.enable_recording
        && let Some(path) = &config.record_path
    {
        let clean = normalize_record_path(path, &config.record_format);
        if !clean.is_empty() {
            args.push(format!("--record={clean}"));
            if config.record_format != "mp4" {
                args.push(format!("--record-format={}", config.record_format));
            }
        }
    }

    // Other
    if !config.disable_screensaver {
        args.push("--no-disable-screensaver".to_string());
    }
    if config.power_off_on_close {
        args.push("--power-off-on-close".to_string());
    }

    args
}

/// Normalize a recording path into something scrcpy will accept.
///
/// Strips stray quotes and whitespace, turns a directory into a timestamped
/// file inside it, and appends the record format when the extension is
/// missing.
pub fn normalize_record_path(path: &str, format: &str) -> String {
    let clean = path.trim_matches(|c| c == '"' || c == ' ' || c == '\t' || c == '\n' || c == '\r');
    if clean.is_empty() {
        return String::new();
    }

    let clean_path = Path::new(clean);
    if clean_path.is_dir() {
        let file_name = format!(
            "scrcpy_record_{}.{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            format
        );
        return clean_path.join(file_name).to_string_lossy().into_owned();
    }

    if clean_path.extension().is_none() {
        return format!("{clean}.{format}");
    }

    clean.to_string()
}
