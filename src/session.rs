//! Per-window screen/tag persistence, and the tab-separated status
//! dumps the control plane writes under `tmp/`.
use std::fs;
use std::io::Write;

use crate::error::Result;
use crate::ids::WinId;
use crate::wm::Wm;

/// Write or remove `.session/0x<win>`. `clean` selects between the two:
/// passing `None` removes the file (client destroyed or now a popup),
/// `Some((scr, tag))` writes the two-byte record.
pub fn store_client(wm: &Wm, win: WinId, place: Option<(u8, u8)>) -> Result<()> {
    let path = wm.home.session_dir().join(format!("{:#x}", win.0));
    match place {
        Some((scr, tag)) => {
            fs::write(&path, [scr, tag])?;
        }
        None => match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

/// Read back `.session/0x<win>`, returning `(screen_id, tag_id)`. A
/// missing or short file means "no preference", not an error.
pub fn restore_window(wm: &Wm, win: WinId) -> Option<(u8, u8)> {
    let path = wm.home.session_dir().join(format!("{:#x}", win.0));
    let bytes = fs::read(&path).ok()?;
    if bytes.len() < 2 {
        return None;
    }
    Some((bytes[0], bytes[1]))
}

/// Bump `tmp/.seq` and return the new value. Called once per dump, after
/// the dump file itself has been written, per the ordering the control
/// plane relies on.
fn bump_seq(wm: &Wm) -> Result<u64> {
    let path = wm.home.tmp_seq();
    let cur: u64 = fs::read_to_string(&path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let next = cur.wrapping_add(1);
    fs::write(&path, next.to_string())?;
    Ok(next)
}

fn write_dump(wm: &Wm, name: &str, body: &str) -> Result<()> {
    let path = wm.home.tmp_dump(name);
    let mut f = fs::File::create(&path)?;
    f.write_all(body.as_bytes())?;
    bump_seq(wm)?;
    Ok(())
}

/// `list-screens`: one row per screen, `<id>\t<output>\t<WxH>+<x>+<y>\t<tags>\n`.
pub fn dump_screens(wm: &Wm) -> Result<()> {
    let mut body = String::new();
    for scr in &wm.screens {
        let output = scr.name.as_str();
        let output = if output.is_empty() { "-" } else { output };
        let tags = scr
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        body.push_str(&format!(
            "{}\t{}\t{}x{}+{}+{}\t{}\n",
            scr.id, output, scr.w, scr.h, scr.x, scr.y, tags
        ));
    }
    write_dump(wm, "screens", &body)
}

/// `list-tags`: one row per tag across all screens, `<scr>\t<tag>\t<name>\t<nclients>\n`.
pub fn dump_tags(wm: &Wm) -> Result<()> {
    let mut body = String::new();
    for scr in &wm.screens {
        for tag in &scr.tags {
            body.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                scr.id,
                tag.id,
                tag.name,
                tag.clients.len()
            ));
        }
    }
    write_dump(wm, "tags", &body)
}

/// `list-clients`/`list-clients-all`: one row per client,
/// `<win_hex>\t<scr>\t<tag>\t<class>\t<x>,<y> <w>x<h>\n`. `all` also
/// includes tray and dock clients; the plain variant omits them.
pub fn dump_clients(wm: &Wm, all: bool) -> Result<()> {
    let mut body = String::new();
    for (_, c) in wm.clients.iter() {
        if !all && (c.is_dock() || c.flags.contains(crate::model::ClientFlags::TRAY)) {
            continue;
        }
        body.push_str(&format!(
            "{:#x}\t{}\t{}\t{}\t{},{} {}x{}\n",
            c.win.0, c.scr.0, c.tag.0, c.class, c.x, c.y, c.w, c.h
        ));
    }
    write_dump(wm, "clients", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::home::HomeDirs;
    use crate::x::Atoms;

    fn test_wm(root: &std::path::Path) -> Wm {
        std::env::set_var("FWM_HOME", root);
        let home = HomeDirs::from_env();
        home.ensure_layout().unwrap();
        let theme = Theme::load(&home);
        Wm::new(home, theme, Atoms::new())
    }

    #[test]
    fn store_then_restore_round_trips() {
        let dir = std::env::temp_dir().join(format!("fwm-session-test-{}", std::process::id()));
        let _ = fs::create_dir_all(&dir);
        let wm = test_wm(&dir);
        store_client(&wm, WinId(0xdead), Some((2, 5))).unwrap();
        assert_eq!(restore_window(&wm, WinId(0xdead)), Some((2, 5)));
        store_client(&wm, WinId(0xdead), None).unwrap();
        assert_eq!(restore_window(&wm, WinId(0xdead)), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn restore_missing_file_is_none() {
        let dir = std::env::temp_dir().join(format!("fwm-session-test2-{}", std::process::id()));
        let _ = fs::create_dir_all(&dir);
        let wm = test_wm(&dir);
        assert_eq!(restore_window(&wm, WinId(0x1)), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
