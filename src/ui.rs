//! Toolbox gravity placement and the toolbar strip's layout, keyboard
//! navigation, and item firing.
use tracing::debug;

use crate::config::TAG_LONG_PRESS_MS;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::ids::ClientId;
use crate::model::{Arg, ClientFlags, Gravity, WinPos};
use crate::wm::Wm;
use crate::x::XConn;

/// How long a toolbox press must hold before it is treated as the start
/// of a move drag rather than a short press that opens the toolbar.
pub const LONG_PRESS_MS: u64 = TAG_LONG_PRESS_MS;

/// Pick the corner of `cli`'s geometry not covered by an older (lower
/// `ts`) sibling on the same tag, trying `TopLeft, TopRight, BottomLeft,
/// BottomRight` in that order and falling back to `TopLeft` if every
/// corner is covered.
fn pick_gravity(wm: &Wm, cli: ClientId) -> (Gravity, Point) {
    let Some(c) = wm.client(cli) else {
        return (Gravity::TopLeft, Point::new(0, 0));
    };
    let rect = Rect::new(c.x, c.y, c.w, c.h);
    let (tl, tr, br, bl) = rect.corners();
    let candidates = [
        (Gravity::TopLeft, tl),
        (Gravity::TopRight, tr),
        (Gravity::BottomLeft, bl),
        (Gravity::BottomRight, br),
    ];

    let siblings: Vec<ClientId> = wm
        .screen(c.scr)
        .tag(c.tag)
        .clients
        .iter()
        .copied()
        .filter(|&s| s != cli)
        .collect();

    for (gravity, point) in candidates {
        let obscured = siblings.iter().any(|&s| {
            wm.client(s)
                .map(|sib| {
                    sib.ts < c.ts && Rect::new(sib.x, sib.y, sib.w, sib.h).contains_point(point)
                })
                .unwrap_or(false)
        });
        if !obscured {
            return (gravity, point);
        }
    }
    (Gravity::TopLeft, tl)
}

fn toolbox_origin(gravity: Gravity, corner: Point, size: u32) -> (i32, i32) {
    match gravity {
        Gravity::TopLeft => (corner.x, corner.y),
        Gravity::TopRight => (corner.x - size as i32, corner.y),
        Gravity::BottomLeft => (corner.x, corner.y - size as i32),
        Gravity::BottomRight => (corner.x - size as i32, corner.y - size as i32),
    }
}

/// Attach and show the toolbox for `cli`, unless it is a popup or
/// exclusive client (per §4.9, those never get one).
pub fn show_toolbox_for(wm: &mut Wm, conn: &impl XConn, cli: ClientId) -> Result<()> {
    let Some(c) = wm.client(cli) else {
        return Ok(());
    };
    if c.is_popup() || c.flags.contains(ClientFlags::EXCLUSIVE) {
        hide_toolbox(wm, conn)?;
        return Ok(());
    }

    let (gravity, corner) = pick_gravity(wm, cli);
    let size = wm.toolbox.size;
    let (x, y) = toolbox_origin(gravity, corner, size);

    wm.toolbox.attach(cli, gravity, x, y);
    if let Some(win) = wm.toolbox.win {
        conn.configure_window(win, Rect::new(x, y, size, size))?;
        conn.map_window(win)?;
        conn.flush();
    }
    Ok(())
}

pub fn hide_toolbox(wm: &mut Wm, conn: &impl XConn) -> Result<()> {
    wm.toolbox.hide();
    if let Some(win) = wm.toolbox.win {
        conn.unmap_window(win)?;
    }
    Ok(())
}

/// A press on the toolbox glyph: short opens the toolbar next to it,
/// long starts a move drag of the attached client.
pub fn toolbox_pressed(wm: &mut Wm, conn: &impl XConn, held_ms: u64) -> Result<()> {
    let Some(cli) = wm.toolbox.cli else {
        return Ok(());
    };
    if held_ms > LONG_PRESS_MS {
        if let Some(c) = wm.client_mut(cli) {
            c.flags.insert(ClientFlags::MOVE);
        }
        debug!(?cli, "long press on toolbox, starting move drag");
    } else {
        show_toolbar_for(wm, conn, cli)?;
    }
    Ok(())
}

/// Position the toolbar strip immediately to the right of the toolbox
/// (or the left, if that would run off the client's screen), and show
/// it for `cli`.
pub fn show_toolbar_for(wm: &mut Wm, conn: &impl XConn, cli: ClientId) -> Result<()> {
    let Some(c) = wm.client(cli) else {
        return Ok(());
    };
    let scr = wm.screen(c.scr).usable_rect();
    let item_w = wm.toolbox.size.max(1);
    let total_w = item_w * crate::model::toolbar::TOOLBAR_ITEMS.len() as u32;
    let tb_x = wm.toolbox.x;
    let x = if tb_x + wm.toolbox.size as i32 + total_w as i32 <= scr.right() {
        tb_x + wm.toolbox.size as i32
    } else {
        tb_x - total_w as i32
    };

    let x_offsets: Vec<i32> = (0..crate::model::toolbar::TOOLBAR_ITEMS.len())
        .map(|i| x + (i as u32 * item_w) as i32)
        .collect();

    wm.toolbar.show_for(cli, x, wm.toolbox.y);
    for (item, off) in wm.toolbar.items.iter_mut().zip(x_offsets) {
        item.x = off;
        item.w = item_w;
    }
    if let Some(win) = wm.toolbar.win {
        conn.configure_window(
            win,
            Rect::new(x, wm.toolbox.y, total_w, wm.toolbox.size),
        )?;
        conn.map_window(win)?;
    }
    Ok(())
}

pub fn hide_toolbar(wm: &mut Wm, conn: &impl XConn) -> Result<()> {
    wm.toolbar.hide();
    if let Some(win) = wm.toolbar.win {
        conn.unmap_window(win)?;
    }
    Ok(())
}

pub fn toolbar_focus_next(wm: &mut Wm) {
    wm.toolbar.focus_next();
}

pub fn toolbar_focus_prev(wm: &mut Wm) {
    wm.toolbar.focus_prev();
}

/// `Return` on the toolbar: invoke the focused item's layout action on
/// the attached client.
pub fn fire_focused_toolbar_item(wm: &mut Wm, conn: &impl XConn) -> Result<()> {
    let Some(cli) = wm.toolbar.cli else {
        return Ok(());
    };
    let Some(label) = wm.toolbar.focused_label() else {
        return Ok(());
    };
    let arg = Arg {
        cli: Some(cli),
        data: 0,
    };
    match label {
        "Close" => match wm.client(cli).map(|c| c.win) {
            Some(win) => crate::clients::close_window(wm, conn, win)?,
            None => {}
        },
        "Center" => crate::layout::place_window(wm, conn, arg, WinPos::Center)?,
        "Left" => crate::layout::place_window(wm, conn, arg, WinPos::LeftFill)?,
        "Right" => crate::layout::place_window(wm, conn, arg, WinPos::RightFill)?,
        "Top" => crate::layout::place_window(wm, conn, arg, WinPos::TopFill)?,
        "Bottom" => crate::layout::place_window(wm, conn, arg, WinPos::BottomFill)?,
        "Expand" => crate::layout::place_window(wm, conn, arg, WinPos::Fill)?,
        "Flag" => toggle_anchor(wm, conn, cli)?,
        "Move" => {
            hide_toolbar(wm, conn)?;
            if let Some(c) = wm.client_mut(cli) {
                c.flags.insert(ClientFlags::MOVE);
            }
        }
        "Mouse" => {}
        _ => {}
    }
    Ok(())
}

/// `toggle-anchor`: make `cli` the tag's anchor (recomputing the split
/// space), or clear the anchor if it already is one.
pub fn toggle_anchor(wm: &mut Wm, conn: &impl XConn, cli: ClientId) -> Result<()> {
    let scr = match wm.client(cli) {
        Some(c) => c.scr,
        None => return Ok(()),
    };
    let is_anchor = wm.screen(scr).current_tag().anchor == Some(cli);
    wm.screen_mut(scr).current_tag_mut().anchor = if is_anchor { None } else { Some(cli) };
    crate::layout::place_window(wm, conn, Arg { cli: Some(cli), data: 0 }, WinPos::Preserve)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ScreenId, TagId, WinId};
    use crate::model::Client;

    fn client_at(id: u32, x: i32, y: i32, w: u32, h: u32, ts: u64) -> Client {
        let mut c = Client::new(ClientId(id as usize), WinId(id), "x".into(), ScreenId(0), TagId(0));
        c.x = x;
        c.y = y;
        c.w = w;
        c.h = h;
        c.ts = ts;
        c
    }

    #[test]
    fn gravity_picks_topleft_when_unobscured() {
        let home = crate::home::HomeDirs::from_env();
        let theme = crate::config::Theme::load(&home);
        let mut wm = Wm::new(home, theme, crate::x::Atoms::new());
        let idx = wm.clients.insert(client_at(1, 100, 100, 50, 50, 1));
        let cli = ClientId(idx);
        wm.screens.push(crate::model::Screen {
            id: 0,
            output: None,
            name: "t".into(),
            x: 0,
            y: 0,
            w: 1000,
            h: 800,
            top: 0,
            tags: vec![crate::model::Tag::new(0, "1", Rect::new(0, 0, 1000, 800))],
            current_tag: TagId(0),
            dock: Vec::new(),
            panel: crate::model::screen::Panel::new(WinId(0), 20, true),
        });
        wm.screen_mut(ScreenId(0)).current_tag_mut().clients.push(cli);
        let (gravity, _) = pick_gravity(&wm, cli);
        assert_eq!(gravity, Gravity::TopLeft);
    }
}
