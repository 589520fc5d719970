use serde::{Deserialize, Serialize};

/// A device reported by `adb devices -l`.
///
/// The serial is the stable identifier used to key sessions throughout the
/// application. Wireless devices carry an `ip:port` serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub serial: String,
    pub model: String,
    pub ip_address: String,
    pub is_wireless: bool,
}
