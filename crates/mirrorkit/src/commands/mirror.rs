use std::io::BufRead;
use std::sync::mpsc;

use clap::ArgMatches;
use tracing::{error, info, warn};

use mirrorkit_core::events;
use mirrorkit_core::state::{Command, Dispatcher, Event};
use mirrorkit_core::window::{WindowStateKind, native_backend};
use mirrorkit_core::MirrorConfig;

const HELP: &str = "Commands:\n\
  fullscreen   Toggle fullscreen\n\
  topmost      Toggle always-on-top\n\
  borderless   Toggle borderless\n\
  focus        Bring the window to the foreground\n\
  minimize     Minimize the window\n\
  restore      Restore the window\n\
  restart      Restart the mirroring process\n\
  list         List active sessions\n\
  stop         Stop mirroring (stay in the prompt)\n\
  quit         Stop everything and exit";

pub(crate) fn handle_mirror_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let serial = matches
        .get_one::<String>("serial")
        .ok_or("Serial argument is required")?
        .clone();

    info!(event = "cli.mirror_started", serial = serial.as_str());

    let config = load_config_with_warning();
    let (events_tx, events_rx) = mpsc::channel();
    let handle = Dispatcher::spawn(config, native_backend(), events_tx)?;

    // Session exits and window resolution land asynchronously; print
    // everything from one place so replies and notifications don't interleave
    // mid-line. The thread ends when the dispatcher drops the sender.
    let printer = std::thread::spawn(move || {
        for event in events_rx {
            print_event(&event);
        }
    });

    if let Err(e) = handle.execute(Command::StartMirroring {
        serial: serial.clone(),
    }) {
        eprintln!("Error: {}", e);
        eprintln!("Tip: Check that scrcpy is installed and the device is connected.");
        error!(event = "cli.mirror_failed", serial = serial.as_str(), error = %e);
        events::log_app_error(&e);
        handle.shutdown();
        let _ = printer.join();
        return Err(e.into());
    }

    println!("Mirroring {}. Type 'help' for commands, 'quit' to exit.", serial);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        let command = match input {
            "" => continue,
            "help" | "?" => {
                println!("{}", HELP);
                continue;
            }
            "quit" | "exit" | "q" => break,
            "fullscreen" | "f" => Command::ToggleFullscreen {
                serial: serial.clone(),
            },
            "topmost" | "t" => Command::ToggleAlwaysOnTop {
                serial: serial.clone(),
            },
            "borderless" | "b" => Command::ToggleBorderless {
                serial: serial.clone(),
            },
            "focus" => Command::FocusWindow {
                serial: serial.clone(),
            },
            "minimize" => Command::MinimizeWindow {
                serial: serial.clone(),
            },
            "restore" => Command::RestoreWindow {
                serial: serial.clone(),
            },
            "restart" => Command::RestartMirroring {
                serial: serial.clone(),
            },
            "stop" => Command::StopMirroring {
                serial: serial.clone(),
            },
            "list" => Command::ListSessions,
            other => {
                eprintln!("Unknown command: '{}'. Type 'help' for commands.", other);
                continue;
            }
        };

        if let Err(e) = handle.execute(command) {
            eprintln!("Error: {}", e);
            warn!(event = "cli.mirror_command_failed", serial = serial.as_str(), error = %e);
        }
    }

    // Shutdown stops every remaining session before joining.
    handle.shutdown();
    let _ = printer.join();

    info!(event = "cli.mirror_completed", serial = serial.as_str());
    Ok(())
}

fn print_event(event: &Event) {
    match event {
        Event::MirroringStarted { serial, pid, .. } => {
            println!("Mirroring started for {} (pid {})", serial, pid);
        }
        Event::MirroringStopped { serial } => {
            println!("Mirroring stopped for {}", serial);
        }
        Event::WindowResolved { serial, title } => {
            println!("Window resolved for {}: \"{}\"", serial, title);
        }
        Event::WindowStateChanged { kind, value, .. } => {
            println!(
                "{} {}",
                state_kind_label(kind),
                if *value { "on" } else { "off" }
            );
        }
        Event::WindowFocused { .. } => println!("Window focused"),
        Event::WindowMinimized { .. } => println!("Window minimized"),
        Event::WindowRestored { .. } => println!("Window restored"),
        Event::SessionsListed { sessions } => {
            if sessions.is_empty() {
                println!("No active sessions.");
                return;
            }
            println!("{:<24} {:<8} {:<8} WINDOW", "SERIAL", "PID", "ID");
            for session in sessions {
                let window = session
                    .window_title
                    .as_deref()
                    .unwrap_or(if session.window_resolved {
                        "(resolved)"
                    } else {
                        "(pending)"
                    });
                println!(
                    "{:<24} {:<8} {:<8} {}",
                    session.serial,
                    session.pid,
                    &session.id[..8.min(session.id.len())],
                    window
                );
            }
        }
    }
}

fn state_kind_label(kind: &WindowStateKind) -> &'static str {
    match kind {
        WindowStateKind::Fullscreen => "Fullscreen",
        WindowStateKind::AlwaysOnTop => "Always-on-top",
        WindowStateKind::Borderless => "Borderless",
    }
}

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via
/// stderr and a structured `cli.config.load_failed` event.
fn load_config_with_warning() -> MirrorConfig {
    match MirrorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.mirrorkit/config.json for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            MirrorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_kind_labels() {
        assert_eq!(state_kind_label(&WindowStateKind::Fullscreen), "Fullscreen");
        assert_eq!(
            state_kind_label(&WindowStateKind::AlwaysOnTop),
            "Always-on-top"
        );
        assert_eq!(state_kind_label(&WindowStateKind::Borderless), "Borderless");
    }
}
