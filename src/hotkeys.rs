use anyhow::{Context, Result};
use evdev::{Device, EventType, KeyCode};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::constants::{input, paths, permissions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyCommand {
    PrevRecord,
    NextRecord,
    PrevField,
    NextField,
    Advance,
    QuickAdvance,
}

/// Map a key press to a command. `ctrl` is the live state of either Control
/// key when the press arrived.
pub fn command_for(key: KeyCode, ctrl: bool) -> Option<HotkeyCommand> {
    match (key, ctrl) {
        (KeyCode::KEY_F9, _) => Some(HotkeyCommand::Advance),
        (KeyCode::KEY_UP, true) => Some(HotkeyCommand::PrevRecord),
        (KeyCode::KEY_DOWN, true) => Some(HotkeyCommand::NextRecord),
        (KeyCode::KEY_LEFT, true) => Some(HotkeyCommand::PrevField),
        (KeyCode::KEY_RIGHT, true) => Some(HotkeyCommand::NextField),
        (KeyCode::KEY_SPACE, true) => Some(HotkeyCommand::QuickAdvance),
        _ => None,
    }
}

fn is_hotkey(key: KeyCode) -> bool {
    command_for(key, true).is_some()
}

/// Find all keyboard devices that have the keys we listen for
fn find_all_keyboard_devices() -> Result<Vec<Device>> {
    info!(path = %paths::DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(paths::DEV_INPUT).context(format!(
        "Failed to read {} - are you in the '{}' group?",
        paths::DEV_INPUT,
        permissions::INPUT_GROUP
    ))? {
        let entry = entry?;
        let path = entry.path();

        if let Ok(device) = Device::open(&path) {
            // Arrow keys plus Control marks a keyboard; mice and power buttons lack them
            let is_keyboard = device.supported_keys().is_some_and(|keys| {
                keys.contains(KeyCode::KEY_LEFTCTRL) && keys.contains(KeyCode::KEY_UP)
            });
            if is_keyboard {
                info!(device_path = %path.display(), name = ?device.name(), "Found keyboard device");
                devices.push(device);
            }
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device found. Ensure you're in '{}' group:\n\
             {}\n\
             Then log out and back in.",
            permissions::INPUT_GROUP,
            permissions::ADD_TO_INPUT_GROUP
        )
    }

    info!(count = devices.len(), "Listening on keyboard device(s)");

    Ok(devices)
}

/// Spawn one background thread per keyboard device
pub fn spawn_listener(sender: Sender<HotkeyCommand>) -> Result<Vec<thread::JoinHandle<()>>> {
    let devices = find_all_keyboard_devices()?;
    let mut handles = Vec::new();

    for device in devices {
        let sender = sender.clone();
        let handle = thread::spawn(move || {
            info!(device = ?device.name(), "Hotkey listener started");
            if let Err(e) = listen_for_hotkeys(device, sender) {
                error!(error = %e, "Hotkey listener error");
            }
        });
        handles.push(handle);
    }

    Ok(handles)
}

/// Read key presses from a single device until the receiver goes away
fn listen_for_hotkeys(mut device: Device, sender: Sender<HotkeyCommand>) -> Result<()> {
    loop {
        // Blocks until events are available
        let events = device.fetch_events().context("Failed to fetch events")?;

        // The events iterator borrows the device, so collect before querying key state
        let mut presses = Vec::new();
        for event in events {
            if event.event_type() != EventType::KEY {
                continue;
            }
            let key = KeyCode::new(event.code());
            // Repeats (value 2) would fire a copy per auto-repeat tick
            if event.value() == input::KEY_PRESS && is_hotkey(key) {
                presses.push(key);
            } else if event.value() == input::KEY_REPEAT {
                debug!(key = ?key, "Ignoring key repeat");
            }
        }

        if presses.is_empty() {
            continue;
        }

        // Real-time modifier state avoids ordering issues within a batch
        let key_state = device
            .get_key_state()
            .context("Failed to get keyboard state")?;
        let ctrl = key_state.contains(KeyCode::KEY_LEFTCTRL) || key_state.contains(KeyCode::KEY_RIGHTCTRL);

        for key in presses {
            if let Some(command) = command_for(key, ctrl) {
                info!(key = ?key, ctrl, command = ?command, "Hotkey pressed, sending command");
                sender.send(command).context("Failed to send hotkey command")?;
            }
        }
    }
}

/// Check if hotkeys are available (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(paths::DEV_INPUT).is_ok()
}

/// Print helpful error message if permissions missing
pub fn print_permission_error() {
    error!(path = %paths::DEV_INPUT, "Cannot access input devices");
    error!(group = %permissions::INPUT_GROUP, "Global hotkeys require group membership");
    error!(command = %permissions::ADD_TO_INPUT_GROUP, "Add user to input group");
    error!("  Then log out and back in");
    warn!(continuing = true, "Continuing with in-window shortcuts only...");
}
