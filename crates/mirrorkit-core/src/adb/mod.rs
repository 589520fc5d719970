pub mod cli;
pub mod errors;
pub mod types;

pub use cli::{device_ip, list_devices, locate_adb};
pub use errors::AdbError;
pub use types::DeviceRecord;
