//! Compiled-in defaults plus the readers that let files under `<home>`
//! override them. Missing files mean default; malformed files are
//! treated as missing, per the error-handling taxonomy's config-parsing
//! policy.
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::draw::Color;
use crate::home::HomeDirs;
use crate::ids::WinId;
use crate::model::keymap::{Action, Keymap, ModMask};

pub const BORDER_WIDTH: u32 = 2;
pub const ITEM_V_MARGIN: u32 = 2;
pub const WINDOW_PAD: u32 = 0;
pub const PANEL_SCREEN_GAP: u32 = 0;
pub const TAG_LONG_PRESS_MS: u64 = 300;
pub const WIN_WIDTH_MIN: u32 = 10;
pub const WIN_HEIGHT_MIN: u32 = 10;
pub const WIN_INC_STEP: u32 = 20;
pub const POS_DIV_MAX: f32 = 9.0;
pub const GROW_STEP: f32 = 0.1;
pub const GROW_STEP_MIN: f32 = 1.1;
pub const DEFAULT_FONT_NAME: &str = "Monospace";
pub const DEFAULT_FONT_SIZE: f32 = 10.5;
pub const DEFAULT_FOCUS_FG: u32 = 0xff_8800;
pub const DEFAULT_BORDER_FG: u32 = 0x44_4444;

/// Colors and font sizing the renderer needs; read once at startup and
/// again on `reload-colors`.
#[derive(Debug, Clone)]
pub struct Theme {
    pub focus_fg: Color,
    pub border_fg: Color,
    pub font_name: String,
    pub font_size: f32,
}

impl Theme {
    pub fn load(home: &HomeDirs) -> Self {
        let scale: f32 = std::env::var("FWM_SCALE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0);

        Self {
            focus_fg: read_color(home, "focus_fg").unwrap_or(Color::from_hex(DEFAULT_FOCUS_FG)),
            border_fg: read_color(home, "border_fg").unwrap_or(Color::from_hex(DEFAULT_BORDER_FG)),
            font_name: std::env::var("FWM_FONT").unwrap_or_else(|_| DEFAULT_FONT_NAME.to_string()),
            font_size: DEFAULT_FONT_SIZE * scale,
        }
    }
}

fn read_color(home: &HomeDirs, role: &str) -> Option<Color> {
    let path = home.colors_dir().join(role);
    let text = read_trimmed(&path)?;
    let hex = u32::from_str_radix(text.trim_start_matches("0x"), 16).ok()?;
    Some(Color::from_hex(hex))
}

fn read_trimmed(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(?path, error = %e, "treating unreadable config file as absent");
            None
        }
    }
}

/// Does `<dir>/<class>` exist? Used by the special-flags pass in
/// `add_window` (ignore/dock/center/corner/popup/exclusive checks).
pub fn class_marker_exists(dir: &Path, class: &str) -> bool {
    dir.join(class).exists()
}

/// Read `keys/<modifier>_<sym>` files and produce the full keymap
/// table: compiled-in defaults first, then file overrides/additions.
/// A file whose contents don't match a known action name is treated
/// as a spawn command (the original's "action name or command path").
pub fn load_keymap(home: &HomeDirs, defaults: Vec<Keymap>) -> Vec<Keymap> {
    let dir = home.keys_dir();
    // Keyed on (mods, keysym) rather than (mods, key): keycodes aren't
    // resolved until `grab_all` runs after this, so every entry still
    // carries `key == 0` here and would collide on `mods` alone.
    let mut by_binding: std::collections::HashMap<(ModMask, fwm_keysyms::XKeySym), Keymap> =
        defaults.into_iter().map(|k| ((k.mods, k.sym), k)).collect();

    let entries = match fs::read_dir(&dir) {
        Ok(e) => e,
        Err(_) => return by_binding.into_values().collect(),
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(n) => n,
            None => continue,
        };
        let Some((mods_str, sym)) = name.split_once('_') else {
            continue;
        };
        let mods = parse_modifier_string(mods_str);
        let Ok(keysym) = sym.parse::<fwm_keysyms::XKeySym>() else {
            warn!(file = name, "unknown keysym in keys/ file name, skipping");
            continue;
        };
        let Some(contents) = read_trimmed(&entry.path()) else {
            continue;
        };
        let action = resolve_action(&contents);
        // Keycodes are resolved against the live keyboard mapping at
        // grab time; here we only know the keysym, so code is filled
        // in by the caller once it has that mapping.
        by_binding.insert(
            (mods, keysym),
            Keymap {
                mods,
                sym: keysym,
                key: 0,
                keyname: sym.to_string(),
                action_name: contents,
                action,
            },
        );
    }

    by_binding.into_values().collect()
}

fn parse_modifier_string(s: &str) -> ModMask {
    let mut mask: ModMask = 0;
    for part in s.split('-') {
        mask |= match part {
            "Shift" => 1 << 0,
            "Lock" => 1 << 1,
            "Control" => 1 << 2,
            "Mod1" | "Alt" => 1 << 3,
            "Mod4" | "Super" => 1 << 6,
            _ => 0,
        };
    }
    mask
}

fn resolve_action(contents: &str) -> Action {
    match contents {
        "grow-window" => Action::GrowWindow,
        "make-grid" => Action::MakeGrid,
        "raise-client" => Action::RaiseClient,
        "close-window" => Action::CloseWindow,
        "toggle-anchor" => Action::ToggleAnchor,
        "show-toolbar" => Action::ShowToolbar,
        _ => Action::Spawn(contents.to_string()),
    }
}

/// `focus-window 0x<win>`-style control commands carry a window id in
/// hex; shared by `control.rs` and `session.rs`.
pub fn parse_hex_window(s: &str) -> Option<WinId> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u32::from_str_radix(s, 16).ok().map(WinId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_window_parses_with_or_without_prefix() {
        assert_eq!(parse_hex_window("0xff"), Some(WinId(0xff)));
        assert_eq!(parse_hex_window("ff"), Some(WinId(0xff)));
        assert_eq!(parse_hex_window("not-hex"), None);
    }

    #[test]
    fn modifier_string_combines_bits() {
        assert_eq!(parse_modifier_string("Mod1-Shift"), (1 << 3) | (1 << 0));
    }
}
