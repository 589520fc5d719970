use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("mirrorkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mirror Android devices through scrcpy and control their windows")
        .long_about(
            "mirrorkit launches scrcpy for connected Android devices, tracks each \
             mirroring process, and takes over the window scrcpy creates: fullscreen, \
             always-on-top and borderless toggles, focus, minimize and restore. \
             Per-device options live in ~/.mirrorkit/config.json.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress log output except errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("devices")
                .about("List devices visible to adb")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("mirror")
                .about("Mirror a device and control its window interactively")
                .long_about(
                    "Starts a mirroring session for the given device serial and reads \
                     control commands from stdin until 'quit' or the session ends. \
                     Commands: fullscreen, topmost, borderless, focus, minimize, \
                     restore, restart, list, stop, quit.",
                )
                .arg(
                    Arg::new("serial")
                        .help("Device serial as reported by 'mirrorkit devices'")
                        .required(true)
                        .index(1),
                ),
        )
}
