//! Client admission, teardown, and the graceful-then-forced close
//! sequence, per §4.4.
use tracing::debug;

use crate::config::{class_marker_exists, WIN_HEIGHT_MIN, WIN_WIDTH_MIN};
use crate::error::Result;
use crate::home::SpecialKind;
use crate::ids::{ClientId, WinId};
use crate::model::{Client, ClientFlags, WinPos};
use crate::session;
use crate::wm::Wm;
use crate::x::{Atom, WinAttr, XConn};

const EVENT_MASK_ENTER: u32 = 1 << 4;
const EVENT_MASK_LEAVE: u32 = 1 << 5;
const EVENT_MASK_STRUCTURE: u32 = 1 << 17;
const EVENT_MASK_PROPERTY: u32 = 1 << 22;

/// Class name the window advertises, from `WM_CLASS` (its second,
/// class-name field) falling back to `WM_NAME`.
fn resolve_class(conn: &impl XConn, win: WinId) -> String {
    let from_class = conn.get_text_property(win, Atom::WmClass).ok().flatten().and_then(|s| {
        s.split('\0')
            .filter(|p| !p.is_empty())
            .last()
            .map(|p| p.to_string())
    });
    from_class
        .or_else(|| conn.get_text_property(win, Atom::WmName).ok().flatten())
        .unwrap_or_default()
}

/// One of the mutually exclusive "special flags" placements a class
/// name can be pinned to via a home-dir marker file, tried in the
/// order given in §4.4 step 4.
enum Special {
    None,
    Ignore,
    Dock { left_gravity: bool, left_anchor: bool, right_anchor: bool },
    Center,
    Corner(WinPos),
    Popup,
}

fn special_placement(wm: &Wm, scr: u8, class: &str) -> Special {
    if class_marker_exists(&wm.home.ignore_dir(), class) {
        return Special::Ignore;
    }
    let dock_dir = wm.home.screen_dock_dir(scr);
    if class_marker_exists(&dock_dir, class) {
        let left_gravity = wm.home.screen_dock_left_gravity_dir(scr).join(class).exists();
        let anchor_target = |name: &str| -> bool {
            std::fs::read_link(dock_dir.join(name))
                .ok()
                .and_then(|t| t.file_name().map(|n| n.to_string_lossy().into_owned()))
                .as_deref()
                == Some(class)
        };
        return Special::Dock {
            left_gravity,
            left_anchor: anchor_target("left-anchor"),
            right_anchor: anchor_target("right-anchor"),
        };
    }
    if class_marker_exists(&wm.home.special_dir(SpecialKind::Center), class) {
        return Special::Center;
    }
    if class_marker_exists(&wm.home.special_dir(SpecialKind::TopLeft), class) {
        return Special::Corner(WinPos::TopLeft);
    }
    if class_marker_exists(&wm.home.special_dir(SpecialKind::TopRight), class) {
        return Special::Corner(WinPos::TopRight);
    }
    if class_marker_exists(&wm.home.special_dir(SpecialKind::BottomLeft), class) {
        return Special::Corner(WinPos::BottomLeft);
    }
    if class_marker_exists(&wm.home.special_dir(SpecialKind::BottomRight), class) {
        return Special::Corner(WinPos::BottomRight);
    }
    if class_marker_exists(&wm.home.special_dir(SpecialKind::Popup), class) {
        return Special::Popup;
    }
    Special::None
}

/// Tag pinned to this class on `scr`, if any `tags/<id>/<class>` marker
/// file exists.
fn configured_tag(wm: &Wm, scr_id: crate::ids::ScreenId, class: &str) -> Option<crate::ids::TagId> {
    let scr = wm.screen(scr_id);
    scr.tags.iter().find_map(|t| {
        wm.home
            .screen_tag_dir(scr.id, t.id)
            .join(class)
            .exists()
            .then(|| crate::ids::TagId(t.id as usize))
    })
}

fn is_known_internal(wm: &Wm, win: WinId) -> bool {
    wm.toolbar.win == Some(win)
        || wm.toolbox.win == Some(win)
        || wm.screens.iter().any(|s| s.panel.win == win || s.dock.iter().any(|&c| wm.client(c).map(|c| c.win) == Some(win)))
}

/// Admit `win` as a managed client, or as a dock/tray enrollment,
/// following the thirteen steps of §4.4. `flags` carries the caller's
/// intent for this admission (`SCAN` during startup enumeration,
/// `USER` for windows raised by direct user action such as a toolbar
/// Move).
pub fn add_window(wm: &mut Wm, conn: &impl XConn, win: WinId, flags: ClientFlags) -> Result<()> {
    if win == conn.root() || is_known_internal(wm, win) {
        return Ok(());
    }
    if wm.win_to_client.contains_key(&win) {
        return Ok(());
    }

    let geom = match conn.get_geometry(win) {
        Ok(g) => g,
        Err(_) => {
            let _ = session::store_client(wm, win, None);
            return Ok(());
        }
    };

    let leader = conn
        .get_property_u32(win, Atom::WmClientLeader)
        .ok()
        .flatten()
        .and_then(|v| v.first().copied())
        .map(WinId);
    if leader.is_some() {
        wm.needs_rescan = true;
    }

    let class = resolve_class(conn, win);
    let scanning = flags.contains(ClientFlags::SCAN);

    let persisted = session::restore_window(wm, win);
    let target_scr = if scanning {
        persisted
            .map(|(s, _)| crate::ids::ScreenId(s as usize))
            .filter(|s| s.0 < wm.screens.len())
            .or_else(|| conn.query_pointer().ok().map(|(_, x, y)| wm.screen_at(crate::geometry::Point::new(x, y))))
            .unwrap_or(wm.defscr)
    } else {
        conn.query_pointer()
            .ok()
            .map(|(_, x, y)| wm.screen_at(crate::geometry::Point::new(x, y)))
            .unwrap_or(wm.defscr)
    };
    let scr_u8 = wm.screen(target_scr).id;

    let special = special_placement(wm, scr_u8, &class);
    if matches!(special, Special::Ignore) {
        return Ok(());
    }

    let is_exclusive_class = class_marker_exists(&wm.home.exclusive_dir(), &class);
    if is_exclusive_class {
        let crc = crate::model::client::crc32(class.as_bytes());
        let stale: Vec<WinId> = wm
            .clients
            .values()
            .filter(|c| c.crc == crc && c.class == class)
            .map(|c| c.win)
            .collect();
        for old_win in stale {
            close_window(wm, conn, old_win)?;
        }
    }

    if geom.w <= WIN_WIDTH_MIN || geom.h <= WIN_HEIGHT_MIN {
        // list-only: admitted so it is visible to the client list and
        // dumps, but never placed or tiled.
        let tag = configured_tag(wm, target_scr, &class).unwrap_or_else(|| wm.screen(target_scr).current_tag);
        let mut c = Client::new(ClientId(0), win, class, target_scr, tag);
        c.flags = flags;
        c.x = geom.x;
        c.y = geom.y;
        c.w = geom.w.max(1);
        c.h = geom.h.max(1);
        let idx = wm.clients.insert(c);
        let cli = ClientId(idx);
        wm.win_to_client.insert(win, cli);
        wm.screen_mut(target_scr).tag_mut(tag).clients.push(cli);
        publish_client_list(wm, conn)?;
        return Ok(());
    }

    if let Some(leader) = leader {
        if leader != win && wm.client_for_window(leader).is_none() && !flags.contains(ClientFlags::USER) {
            conn.map_window(win)?;
            return Ok(());
        }
    }

    let scr_rect = wm.screen(target_scr).usable_rect();
    let mut init_flags = flags;
    if is_exclusive_class {
        init_flags.insert(ClientFlags::EXCLUSIVE);
    }
    let is_tray = flags.contains(ClientFlags::TRAY);
    let is_dock = matches!(special, Special::Dock { .. }) || is_tray;
    let has_corner_flag = matches!(special, Special::Corner(_));
    if !init_flags.intersects(ClientFlags::USER | ClientFlags::SCAN)
        && geom.w < scr_rect.w / 2
        && geom.h < scr_rect.h / 2
        && !has_corner_flag
        && !is_tray
        && !is_dock
    {
        init_flags.insert(ClientFlags::CENTER);
    }

    let (x, y) = match special {
        Special::Center => (
            scr_rect.x + (scr_rect.w.saturating_sub(geom.w) / 2) as i32,
            scr_rect.y + (scr_rect.h.saturating_sub(geom.h) / 2) as i32,
        ),
        Special::Corner(pos) => {
            let x = if matches!(pos, WinPos::TopLeft | WinPos::BottomLeft) {
                scr_rect.x
            } else {
                scr_rect.x + scr_rect.w as i32 - geom.w as i32
            };
            let y = if matches!(pos, WinPos::TopLeft | WinPos::TopRight) {
                scr_rect.y
            } else {
                scr_rect.y + scr_rect.h as i32 - geom.h as i32
            };
            (x, y)
        }
        _ => {
            if init_flags.contains(ClientFlags::CENTER) {
                (
                    scr_rect.x + (scr_rect.w.saturating_sub(geom.w) / 2) as i32,
                    scr_rect.y + (scr_rect.h.saturating_sub(geom.h) / 2) as i32,
                )
            } else {
                (geom.x, geom.y)
            }
        }
    };
    match special {
        Special::Corner(WinPos::TopLeft) => init_flags.insert(ClientFlags::TOPLEFT),
        Special::Corner(WinPos::TopRight) => init_flags.insert(ClientFlags::TOPRIGHT),
        Special::Corner(WinPos::BottomLeft) => init_flags.insert(ClientFlags::BOTLEFT),
        Special::Corner(WinPos::BottomRight) => init_flags.insert(ClientFlags::BOTRIGHT),
        Special::Popup => init_flags.insert(ClientFlags::POPUP),
        Special::Dock { left_gravity, left_anchor, right_anchor } => {
            init_flags.insert(ClientFlags::DOCK);
            if left_gravity {
                init_flags.insert(ClientFlags::LDOCK);
            }
            if left_anchor {
                init_flags.insert(ClientFlags::LANCHOR);
            }
            if right_anchor {
                init_flags.insert(ClientFlags::RANCHOR);
            }
        }
        Special::Center | Special::None | Special::Ignore => {}
    }

    let tag = configured_tag(wm, target_scr, &class)
        .or_else(|| persisted.map(|(_, t)| crate::ids::TagId(t as usize)).filter(|t| t.0 < wm.screen(target_scr).tags.len()))
        .unwrap_or_else(|| wm.screen(target_scr).current_tag);

    let mut c = Client::new(ClientId(0), win, class.clone(), target_scr, tag);
    c.flags = init_flags;
    c.x = x;
    c.y = y;
    c.w = geom.w;
    c.h = geom.h;
    c.pid = conn.window_pid(win).ok().flatten();
    c.leader = leader;

    let event_mask = EVENT_MASK_ENTER | EVENT_MASK_PROPERTY | EVENT_MASK_STRUCTURE
        | if init_flags.contains(ClientFlags::POPUP) { EVENT_MASK_LEAVE } else { 0 };
    conn.set_window_attr(win, WinAttr::EventMask(event_mask))?;

    let prev_focused: Vec<WinId> = wm
        .screen(target_scr)
        .current_tag()
        .clients
        .iter()
        .filter_map(|&c| wm.client(c).map(|c| c.win))
        .collect();
    for w in prev_focused {
        crate::focus::unfocus_window(wm, conn, w)?;
    }

    let idx = wm.clients.insert(c);
    let cli = ClientId(idx);
    wm.win_to_client.insert(win, cli);

    if is_dock {
        wm.screen_mut(target_scr).dock.push(cli);
    } else {
        wm.screen_mut(target_scr).tag_mut(tag).clients.push(cli);
    }

    crate::layout::client_moveresize(wm, conn, cli, x, y, geom.w, geom.h)?;

    let on_current_tag = wm.screen(target_scr).current_tag == tag;
    if !on_current_tag && !is_dock {
        conn.set_property_u32(win, Atom::WmState, &[3, 0])?;
        conn.unmap_window(win)?;
    }

    let matched_pending = wm
        .pending
        .iter()
        .find(|(_, p)| p.win == win)
        .map(|(i, _)| i);
    if let Some(i) = matched_pending {
        if let Some(p) = wm.pending.remove(i) {
            crate::layout::client_moveresize(wm, conn, cli, p.x, p.y, p.w, p.h)?;
        }
    }

    if is_dock {
        crate::dock::layout_dock(wm, conn, target_scr)?;
    } else if scanning {
        wm.screen_mut(target_scr).tag_mut(tag).front = Some(cli);
    } else {
        crate::focus::raise_client(wm, conn, crate::model::Arg { cli: Some(cli), data: 0 })?;
    }

    publish_client_list(wm, conn)?;
    Ok(())
}

fn publish_client_list(wm: &Wm, conn: &impl XConn) -> Result<()> {
    let wins: Vec<u32> = wm.clients.values().map(|c| c.win.0).collect();
    conn.set_property_u32(conn.root(), Atom::NetClientList, &wins)
}

/// Remove `cli` from every slot that references it (tag membership,
/// `anchor`/`visited`/`front`, toolbox attachment, dock list), wipe its
/// persisted placement, and free its arena slot.
pub fn free_client(wm: &mut Wm, cli: ClientId) {
    let Some(c) = wm.client(cli).cloned() else {
        return;
    };
    wm.win_to_client.remove(&c.win);
    let _ = session::store_client(wm, c.win, None);

    if wm.toolbox.cli == Some(cli) {
        wm.toolbox.hide();
        wm.toolbox.cli = None;
    }
    if wm.toolbar.cli == Some(cli) {
        wm.toolbar.hide();
    }
    crate::dock::remove_dock_client(wm, c.scr, cli);
    for tag in &mut wm.screen_mut(c.scr).tags {
        tag.remove(cli);
    }
    wm.clients.remove(cli.0);
}

/// Initiate a graceful close: send `WM_DELETE_WINDOW`, then poll the
/// window's liveness every 10ms for up to 500ms, escalating to
/// `SIGTERM` once it has survived two rounds.
pub fn close_window(wm: &mut Wm, conn: &impl XConn, win: WinId) -> Result<()> {
    let delete_atom = conn.intern_atom("WM_DELETE_WINDOW")?;
    conn.send_client_message(win, "WM_PROTOCOLS", [delete_atom.0, 0, 0, 0, 0])?;
    conn.flush();

    let pid = wm
        .client_for_window(win)
        .and_then(|c| c.pid)
        .or_else(|| conn.window_pid(win).ok().flatten());

    for round in 1..=50u32 {
        std::thread::sleep(std::time::Duration::from_millis(10));
        if conn.get_geometry(win).is_err() {
            return Ok(());
        }
        if let Some(c) = wm.client_for_window_mut(win) {
            c.busy = c.busy.saturating_add(1);
        }
        if round == 2 {
            if let Some(pid) = pid {
                let _ = nix::sys::signal::kill(
                    nix::unistd::Pid::from_raw(pid),
                    nix::sys::signal::Signal::SIGTERM,
                );
                debug!(pid, win = win.0, "escalated stuck close to SIGTERM");
            }
        }
    }
    Ok(())
}
