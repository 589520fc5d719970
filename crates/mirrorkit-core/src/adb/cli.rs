//! ADB CLI wrappers for device discovery.
//!
//! All device information comes from the `adb` binary rather than a native
//! transport: the CLI already handles daemon startup, device authorization,
//! and both USB and TCP/IP devices uniformly.
//!
//! Each function validates availability, logs structured events, and maps
//! errors consistently.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info, warn};

use super::errors::AdbError;
use super::types::DeviceRecord;

/// Locate the `adb` binary.
///
/// Checks `PATH` first, then the standard Android SDK `platform-tools`
/// install locations under the user's home directory.
pub fn locate_adb() -> Result<PathBuf, AdbError> {
    if let Ok(path) = which::which("adb") {
        debug!(event = "core.adb.located", path = %path.display());
        return Ok(path);
    }

    let binary = if cfg!(windows) { "adb.exe" } else { "adb" };
    let sdk_candidates = [
        dirs::home_dir().map(|h| {
            h.join("AppData")
                .join("Local")
                .join("Android")
                .join("Sdk")
                .join("platform-tools")
                .join(binary)
        }),
        dirs::home_dir().map(|h| {
            h.join("Android")
                .join("Sdk")
                .join("platform-tools")
                .join(binary)
        }),
    ];

    for candidate in sdk_candidates.into_iter().flatten() {
        if candidate.is_file() {
            debug!(event = "core.adb.located", path = %candidate.display());
            return Ok(candidate);
        }
    }

    warn!(event = "core.adb.not_found");
    Err(AdbError::AdbUnavailable)
}

/// Run `adb` with the given arguments and return stdout on success.
fn run_adb(args: &[&str]) -> Result<String, AdbError> {
    let adb = locate_adb()?;
    let command = format!("adb {}", args.join(" "));

    let output = Command::new(&adb).args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            event = "core.adb.command_failed",
            command = %command,
            stderr = %stderr.trim()
        );
        Err(AdbError::CommandFailed {
            command,
            message: stderr.trim().to_string(),
        })
    }
}

/// List connected devices via `adb devices -l`.
///
/// Only devices in the `device` state are returned; unauthorized and offline
/// entries are skipped. For wireless devices the IP address is taken from the
/// serial; for USB devices it is resolved best-effort via [`device_ip`].
pub fn list_devices() -> Result<Vec<DeviceRecord>, AdbError> {
    let stdout = run_adb(&["devices", "-l"])?;
    let mut devices = parse_device_list(&stdout);

    for device in &mut devices {
        if !device.is_wireless && device.ip_address.is_empty() {
            match device_ip(&device.serial) {
                Ok(ip) => device.ip_address = ip,
                Err(e) => {
                    debug!(
                        event = "core.adb.device_ip_failed",
                        serial = %device.serial,
                        error = %e
                    );
                }
            }
        }
    }

    info!(event = "core.adb.devices_listed", count = devices.len());
    Ok(devices)
}

/// Parse the output of `adb devices -l` into device records.
fn parse_device_list(stdout: &str) -> Vec<DeviceRecord> {
    let mut devices = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("List of devices") || line.starts_with('*') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(serial) = parts.next() else {
            continue;
        };
        let Some(state) = parts.next() else {
            continue;
        };
        if state != "device" {
            continue;
        }

        let model = parts
            .clone()
            .find_map(|token| token.strip_prefix("model:"))
            .unwrap_or("Unknown")
            .replace('_', " ");

        let is_wireless = serial.contains(':');
        let ip_address = if is_wireless {
            serial.split(':').next().unwrap_or_default().to_string()
        } else {
            String::new()
        };

        devices.push(DeviceRecord {
            serial: serial.to_string(),
            model,
            ip_address,
            is_wireless,
        });
    }

    devices
}

/// Resolve a USB device's WLAN IP address via `adb shell ip route`.
pub fn device_ip(serial: &str) -> Result<String, AdbError> {
    let stdout = run_adb(&["-s", serial, "shell", "ip", "route"])?;
    parse_ip_route(&stdout).ok_or_else(|| AdbError::CommandFailed {
        command: format!("adb -s {serial} shell ip route"),
        message: "no 'src' address in route table".to_string(),
    })
}

/// Extract the `src` address from `ip route` output.
///
/// Routes look like `192.168.1.0/24 dev wlan0 proto kernel scope link src 192.168.1.42`.
fn parse_ip_route(stdout: &str) -> Option<String> {
    for line in stdout.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == "src" {
                if let Some(ip) = tokens.next() {
                    return Some(ip.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_list_skips_header_and_blank_lines() {
        let output = "List of devices attached\n\n";
        assert!(parse_device_list(output).is_empty());
    }

    #[test]
    fn test_parse_device_list_usb_device() {
        let output = "List of devices attached\n\
            R5CT102ABCD            device usb:1-2 product:a52sxq model:SM_A528B device:a52sxq transport_id:3\n";
        let devices = parse_device_list(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "R5CT102ABCD");
        assert_eq!(devices[0].model, "SM A528B");
        assert!(!devices[0].is_wireless);
        assert!(devices[0].ip_address.is_empty());
    }

    #[test]
    fn test_parse_device_list_wireless_device_takes_ip_from_serial() {
        let output = "List of devices attached\n\
            192.168.1.42:5555      device product:a52sxq model:SM_A528B device:a52sxq transport_id:7\n";
        let devices = parse_device_list(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "192.168.1.42:5555");
        assert_eq!(devices[0].ip_address, "192.168.1.42");
        assert!(devices[0].is_wireless);
    }

    #[test]
    fn test_parse_device_list_skips_unauthorized_and_offline() {
        let output = "List of devices attached\n\
            R5CT102ABCD            unauthorized usb:1-2 transport_id:3\n\
            emulator-5554          offline transport_id:1\n";
        assert!(parse_device_list(output).is_empty());
    }

    #[test]
    fn test_parse_device_list_missing_model_falls_back_to_unknown() {
        let output = "serial123 device transport_id:5\n";
        let devices = parse_device_list(output);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].model, "Unknown");
    }

    #[test]
    fn test_parse_ip_route_extracts_src_address() {
        let output =
            "192.168.1.0/24 dev wlan0 proto kernel scope link src 192.168.1.42\n";
        assert_eq!(parse_ip_route(output), Some("192.168.1.42".to_string()));
    }

    #[test]
    fn test_parse_ip_route_no_src_token() {
        assert_eq!(parse_ip_route("default via 192.168.1.1 dev wlan0\n"), None);
        assert_eq!(parse_ip_route(""), None);
    }
}
