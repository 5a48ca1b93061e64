//! Raise/lower, border-color focus marks, pointer warp, and the
//! front/visited/prev slots each tag tracks.
use tracing::debug;

use crate::error::Result;
use crate::ids::{ClientId, ScreenId};
use crate::model::{Arg, ClientFlags, Direction};
use crate::session;
use crate::wm::Wm;
use crate::x::{Atom, StackMode, WinAttr, XConn};

fn next_ts(wm: &Wm) -> u64 {
    wm.clients.values().map(|c| c.ts).max().unwrap_or(0) + 1
}

fn border_pixel(wm: &Wm, focused: bool) -> u32 {
    let color = if focused {
        wm.theme.focus_fg
    } else {
        wm.theme.border_fg
    };
    let (r, g, b) = color.rgb();
    let (r, g, b) = ((r * 255.) as u32, (g * 255.) as u32, (b * 255.) as u32);
    (r << 16) | (g << 8) | b
}

/// Sets the border color, assigns keyboard focus, and publishes
/// `_NET_ACTIVE_WINDOW` on the root.
pub fn focus_window(wm: &mut Wm, conn: &impl XConn, cli: ClientId) -> Result<()> {
    let win = match wm.client(cli) {
        Some(c) => c.win,
        None => return Ok(()),
    };
    conn.set_window_attr(win, WinAttr::BorderPixel(border_pixel(wm, true)))?;
    conn.set_input_focus(win)?;
    conn.set_property_u32(conn.root(), Atom::NetActiveWindow, &[win.0])?;
    Ok(())
}

/// Clears the focus border and the `_NET_ACTIVE_WINDOW` property.
pub fn unfocus_window(wm: &mut Wm, conn: &impl XConn, win: crate::ids::WinId) -> Result<()> {
    conn.set_window_attr(win, WinAttr::BorderPixel(border_pixel(wm, false)))?;
    conn.delete_property(conn.root(), Atom::NetActiveWindow)?;
    Ok(())
}

/// `raise_client(arg)`: resolve the target, make it the tag's front
/// client, raise and focus it, and show the toolbox (unless it is
/// already visible and `arg.data == 1`, the toggle-mode convention used
/// throughout the dispatch table).
pub fn raise_client(wm: &mut Wm, conn: &impl XConn, arg: Arg) -> Result<()> {
    raise_client_with(wm, conn, arg, true)
}

/// As [`raise_client`], but `restack` controls whether the client is
/// actually stacked above its siblings. `handle_enter` passes `false`:
/// plain focus-follows-mouse never raises, only explicit raise actions
/// (key bindings, tag switches, window cycling) do.
pub fn raise_client_with(wm: &mut Wm, conn: &impl XConn, arg: Arg, restack: bool) -> Result<()> {
    let Some(cli) = crate::layout::resolve_target_client(wm, conn, &arg) else {
        return Ok(());
    };
    let scr_id = match wm.client(cli) {
        Some(c) => c.scr,
        None => return Ok(()),
    };

    let (prev_front, prev_visited) = {
        let tag = wm.screen(scr_id).current_tag();
        (tag.front, tag.visited)
    };
    for old in [prev_front, prev_visited] {
        if let Some(old) = old {
            if old != cli {
                if let Some(win) = wm.client(old).map(|c| c.win) {
                    unfocus_window(wm, conn, win)?;
                }
            }
        }
    }

    {
        let tag = wm.screen_mut(scr_id).current_tag_mut();
        tag.prev = tag.front;
        tag.visited = Some(cli);
        tag.front = Some(cli);
    }

    let win = match wm.client(cli) {
        Some(c) => c.win,
        None => return Ok(()),
    };
    if restack {
        conn.restack(win, StackMode::Above)?;
    }
    focus_window(wm, conn, cli)?;

    let ts = next_ts(wm);
    let persist = if let Some(c) = wm.client_mut(cli) {
        c.ts = ts;
        if c.is_popup() {
            None
        } else {
            Some((c.scr.0 as u8, c.tag.0 as u8))
        }
    } else {
        None
    };
    if let Some((scr, tag)) = persist {
        if let Err(e) = session::store_client(wm, win, Some((scr, tag))) {
            debug!(%e, "failed to persist client placement");
        }
    }

    let toggle_mode = arg.data == 1;
    if !(wm.toolbox.visible && toggle_mode) {
        crate::ui::show_toolbox_for(wm, conn, cli)?;
    }

    Ok(())
}

/// `switch_window(scr, dir)`: walk the tag's client list past any
/// dock/tray member, raise the next eligible one, and warp the pointer
/// to its center (skipped when `no_warp` is set, e.g. keyboard-only
/// navigation bound without pointer movement).
pub fn switch_window(
    wm: &mut Wm,
    conn: &impl XConn,
    scr: ScreenId,
    dir: Direction,
    no_warp: bool,
) -> Result<()> {
    let (members, from) = {
        let tag = wm.screen(scr).current_tag();
        let eligible: Vec<ClientId> = tag
            .clients
            .iter()
            .copied()
            .filter(|&c| {
                wm.client(c)
                    .map(|c| !c.is_dock() && !c.flags.contains(ClientFlags::TRAY))
                    .unwrap_or(false)
            })
            .collect();
        (eligible, tag.front)
    };
    if members.is_empty() {
        return Ok(());
    }
    let start = from
        .and_then(|f| members.iter().position(|&c| c == f))
        .unwrap_or(0);
    let next_idx = match dir {
        Direction::Next => (start + 1) % members.len(),
        Direction::Prev => (start + members.len() - 1) % members.len(),
    };
    let target = members[next_idx];

    raise_client(
        wm,
        conn,
        Arg {
            cli: Some(target),
            data: 0,
        },
    )?;

    if !no_warp {
        if let Some(c) = wm.client(target) {
            let mid = crate::geometry::Rect::new(c.x, c.y, c.w, c.h).midpoint();
            conn.warp_pointer(conn.root(), mid.x, mid.y)?;
        }
    }
    Ok(())
}

/// `focus_tag(scr, tag)`: hide the outgoing tag's windows (iconify +
/// unmap), show the incoming tag's, and raise its front client or fall
/// back to focusing the root.
pub fn focus_tag(wm: &mut Wm, conn: &impl XConn, scr: ScreenId, tag: crate::ids::TagId) -> Result<()> {
    if wm.screen(scr).current_tag == tag {
        return Ok(());
    }

    let outgoing: Vec<ClientId> = wm.screen(scr).current_tag().clients.clone();
    for cli in outgoing {
        if let Some(c) = wm.client(cli) {
            let win = c.win;
            conn.set_property_u32(win, Atom::WmState, &[3, 0])?; // IconicState = 3
            conn.unmap_window(win)?;
        }
    }

    wm.screen_mut(scr).current_tag = tag;

    let incoming: Vec<ClientId> = wm.screen(scr).current_tag().clients.clone();
    for cli in &incoming {
        if let Some(c) = wm.client(*cli) {
            let win = c.win;
            conn.map_window(win)?;
            conn.set_property_u32(win, Atom::WmState, &[1, 0])?; // NormalState = 1
        }
    }

    let front = wm.screen(scr).current_tag().front;
    match front.filter(|f| incoming.contains(f)) {
        Some(cli) => {
            raise_client(
                wm,
                conn,
                Arg {
                    cli: Some(cli),
                    data: 0,
                },
            )?;
        }
        None => {
            conn.set_input_focus(conn.root())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_ts_is_max_plus_one_over_clients() {
        let home = crate::home::HomeDirs::from_env();
        let theme = crate::config::Theme::load(&home);
        let mut wm = Wm::new(home, theme, crate::x::Atoms::new());
        let scr = crate::ids::ScreenId(0);
        let tag = crate::ids::TagId(0);
        let mut c1 = crate::model::Client::new(
            crate::ids::ClientId(0),
            crate::ids::WinId(1),
            "a".into(),
            scr,
            tag,
        );
        c1.ts = 4;
        wm.clients.insert(c1);
        assert_eq!(next_ts(&wm), 5);
    }
}
