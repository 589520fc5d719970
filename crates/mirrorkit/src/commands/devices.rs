use clap::ArgMatches;
use tracing::{error, info};

use mirrorkit_core::adb;
use mirrorkit_core::events;

pub(crate) fn handle_devices_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.devices_started");

    let devices = match adb::list_devices() {
        Ok(devices) => devices,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Tip: Check that adb is installed and on PATH.");
            error!(event = "cli.devices_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&devices)?);
    } else if devices.is_empty() {
        println!("No devices found.");
        println!("Tip: Enable USB debugging and run 'adb devices' to authorize this host.");
    } else {
        println!(
            "{:<24} {:<24} {:<16} {}",
            "SERIAL", "MODEL", "IP", "CONNECTION"
        );
        for device in &devices {
            let connection = if device.is_wireless { "wireless" } else { "usb" };
            println!(
                "{:<24} {:<24} {:<16} {}",
                device.serial, device.model, device.ip_address, connection
            );
        }
    }

    info!(event = "cli.devices_completed", count = devices.len());
    Ok(())
}
