//! The FIFO control plane: one newline-terminated command per open,
//! single-shot semantics (unlink, recreate, reopen) after each, per
//! §4.13.
use std::fs::{self, File};

use tracing::{debug, warn};

use crate::config::parse_hex_window;
use crate::error::Result;
use crate::home::HomeDirs;
use crate::ids::{ScreenId, TagId};
use crate::model::Arg;
use crate::wm::Wm;
use crate::x::XConn;

/// (Re)create `<home>/.control:<display>` as a FIFO, mode 0600, and
/// open it for reading.
pub fn open_fifo(home: &HomeDirs, display: &str) -> Result<File> {
    let path = home.control_fifo(display);
    let _ = fs::remove_file(&path);
    nix::unistd::mkfifo(&path, nix::sys::stat::Mode::from_bits_truncate(0o600))
        .map_err(|e| std::io::Error::from_raw_os_error(e as i32))?;
    Ok(File::open(&path)?)
}

/// Pack up to 20 bytes of `msg` into five 32-bit words, little-endian
/// within each word, for a `WM_PROTOCOLS` client message payload.
fn pack_message(msg: &str) -> [u32; 5] {
    let mut data = [0u32; 5];
    for (i, b) in msg.bytes().take(20).enumerate() {
        data[i / 4] |= (b as u32) << ((i % 4) * 8);
    }
    data
}

/// Parse and run one command line. Unknown verbs are logged and
/// ignored rather than treated as an error, matching the config-parsing
/// policy of "malformed means absent".
pub fn dispatch_line(wm: &mut Wm, conn: &impl XConn, line: &str) -> Result<()> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(());
    };

    match verb {
        "reload-keys" => {
            wm.keymaps = crate::config::load_keymap(&wm.home, wm.keymaps.clone());
        }
        "reload-colors" => {
            wm.theme = crate::config::Theme::load(&wm.home);
        }
        "lock" => match fs::read_to_string(wm.home.lock_program()) {
            Ok(cmd) => crate::spawn::spawn(cmd.trim().to_string()),
            Err(_) => warn!("no lock command configured"),
        },
        "reinit-outputs" => wm.needs_reinit_outputs = true,
        "list-clients" => crate::session::dump_clients(wm, false)?,
        "list-clients-all" => crate::session::dump_clients(wm, true)?,
        "list-screens" => crate::session::dump_screens(wm)?,
        "list-tags" => crate::session::dump_tags(wm)?,
        "refresh-panel" => {
            if let Some(id) = parts.next().and_then(|s| s.parse::<usize>().ok()) {
                if id < wm.screens.len() {
                    wm.needs_panel_refresh = Some(ScreenId(id));
                }
            }
        }
        "focus-screen" => {
            if let Some(id) = parts.next().and_then(|s| s.parse::<usize>().ok()) {
                if id < wm.screens.len() {
                    wm.curscr = ScreenId(id);
                    let mid = wm.screen(ScreenId(id)).usable_rect().midpoint();
                    conn.warp_pointer(conn.root(), mid.x, mid.y)?;
                }
            }
        }
        "focus-tag" => {
            let tag = parts.next().and_then(|s| s.parse::<u8>().ok());
            let win = parts.next().and_then(parse_hex_window);
            if let (Some(tag), Some(win)) = (tag, win) {
                if let Some(scr) = wm.client_for_window(win).map(|c| c.scr) {
                    crate::focus::focus_tag(wm, conn, scr, TagId(tag as usize))?;
                    if let Some(cli) = wm.client_for_window(win).map(|c| c.id) {
                        crate::focus::raise_client(wm, conn, Arg { cli: Some(cli), data: 0 })?;
                    }
                }
            }
        }
        "focus-window" => {
            if let Some(win) = parts.next().and_then(parse_hex_window) {
                if let Some((scr, tag)) = wm.client_for_window(win).map(|c| (c.scr, c.tag)) {
                    crate::focus::focus_tag(wm, conn, scr, tag)?;
                    if let Some(cli) = wm.client_for_window(win).map(|c| c.id) {
                        crate::focus::raise_client(wm, conn, Arg { cli: Some(cli), data: 0 })?;
                    }
                }
            }
        }
        "make-grid" => crate::layout::make_grid(wm, conn, Arg::default())?,
        "update-dock" => {
            let pid = parts.next().and_then(|s| s.parse::<i32>().ok());
            let msg: String = parts.collect::<Vec<_>>().join(" ");
            if let Some(pid) = pid {
                if let Some(win) = wm.clients.values().find(|c| c.pid == Some(pid)).map(|c| c.win) {
                    conn.send_client_message(win, "WM_PROTOCOLS", pack_message(&msg))?;
                }
            }
        }
        other => debug!(verb = other, "unknown control command"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_message_round_trips_short_text() {
        let data = pack_message("hi");
        let mut bytes = Vec::new();
        'outer: for word in data {
            for shift in [0, 8, 16, 24] {
                let b = ((word >> shift) & 0xff) as u8;
                if b == 0 && bytes.len() >= 2 {
                    break 'outer;
                }
                bytes.push(b);
            }
        }
        assert_eq!(&bytes[..2], b"hi");
    }

    struct NoopConn;
    impl crate::x::MockXConn for NoopConn {}

    #[test]
    fn unknown_verb_does_not_error() {
        let home = HomeDirs::from_env();
        let theme = crate::config::Theme::load(&home);
        let mut wm = Wm::new(home, theme, crate::x::Atoms::new());
        let conn = NoopConn;
        assert!(dispatch_line(&mut wm, &conn, "not-a-real-command").is_ok());
    }
}
