use clap::ArgMatches;
use tracing::error;

use mirrorkit_core::events;

mod devices;
mod mirror;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("devices", sub_matches)) => devices::handle_devices_command(sub_matches),
        Some(("mirror", sub_matches)) => mirror::handle_mirror_command(sub_matches),
        Some((name, _)) => {
            error!(event = "cli.unknown_command", command = name);
            Err(format!("Unknown command: {}", name).into())
        }
        None => Err("No command provided".into()),
    }
}
