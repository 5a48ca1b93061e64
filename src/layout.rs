//! Placement by position-enum, grid tiling, and the geometry clamps
//! both go through before reaching the server.
use tracing::debug;

use crate::config::{
    BORDER_WIDTH, GROW_STEP, GROW_STEP_MIN, POS_DIV_MAX, WINDOW_PAD, WIN_HEIGHT_MIN,
    WIN_INC_STEP, WIN_WIDTH_MIN,
};
use crate::error::Result;
use crate::geometry::Rect;
use crate::ids::ClientId;
use crate::model::{Arg, ClientFlags, Screen, WinPos};
use crate::wm::Wm;
use crate::x::XConn;

fn adjust_x(scr: &Screen, x: i32) -> i32 {
    x.clamp(scr.x, scr.x + scr.w as i32)
}

fn adjust_y(scr: &Screen, y: i32) -> i32 {
    y.clamp(scr.top, scr.top + scr.h as i32)
}

fn adjust_w(scr: &Screen, w: u32) -> u32 {
    w.clamp(WIN_WIDTH_MIN, scr.w.saturating_sub(2 * BORDER_WIDTH))
}

fn adjust_h(scr: &Screen, h: u32) -> u32 {
    h.clamp(WIN_HEIGHT_MIN, scr.h.saturating_sub(2 * BORDER_WIDTH))
}

/// Sets geometry on the server after clamping, except for dock clients
/// which bypass clamping since their position is computed by the dock
/// layout, not the tiling engine.
pub fn client_moveresize(
    wm: &mut Wm,
    conn: &impl XConn,
    cli: ClientId,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
) -> Result<()> {
    let scr_id = wm.client(cli).map(|c| c.scr);
    let Some(scr_id) = scr_id else { return Ok(()) };
    let is_dock = wm.client(cli).map(|c| c.is_dock()).unwrap_or(false);
    let scr = wm.screen(scr_id);

    let (x, y, w, h) = if is_dock {
        (x, y, w, h)
    } else {
        (
            adjust_x(scr, x),
            adjust_y(scr, y),
            adjust_w(scr, w),
            adjust_h(scr, h),
        )
    };

    let win = match wm.client_mut(cli) {
        Some(c) => {
            c.x = x;
            c.y = y;
            c.w = w;
            c.h = h;
            c.win
        }
        None => return Ok(()),
    };
    conn.configure_window(win, Rect::new(x, y, w, h))
}

pub(crate) fn resolve_target_client(wm: &Wm, conn: &impl XConn, arg: &Arg) -> Option<ClientId> {
    if let Some(cli) = arg.cli {
        return Some(cli);
    }
    let tag = wm.curscr().current_tag();
    if let Some(anchor) = tag.anchor {
        return Some(anchor);
    }
    if let Ok((win, _, _)) = conn.query_pointer() {
        if let Some(c) = wm.client_for_window(win) {
            return Some(c.id);
        }
    }
    tag.front
}

/// `place_window(arg)`. The requested `WinPos` comes from `arg.kmap`'s
/// action when driven from a keybinding, or from `cli.pos` when
/// re-applying a client's last placement (e.g. after a screen change).
pub fn place_window(
    wm: &mut Wm,
    conn: &impl XConn,
    arg: Arg,
    requested: WinPos,
) -> Result<()> {
    let Some(cli) = resolve_target_client(wm, conn, &arg) else {
        return Ok(());
    };
    let scr_id = match wm.client(cli) {
        Some(c) => c.scr,
        None => return Ok(()),
    };

    {
        let tag = wm.screen_mut(scr_id).current_tag_mut();
        if tag.anchor == Some(cli) {
            tag.anchor = None;
        }
    }

    let scr = wm.screen(scr_id).usable_rect();
    let (x, y, w, h) = match requested {
        WinPos::Fill => {
            if let Some(c) = wm.client_mut(cli) {
                c.flags.insert(ClientFlags::FULLSCREEN);
            }
            (scr.x, scr.top, scr.w, scr.h)
        }
        WinPos::Center => {
            let inc = ratchet_center(wm, cli, &scr);
            let w = (scr.w / 2) + inc;
            let h = (scr.h / 2) + inc;
            let w = w.min(scr.w);
            let h = h.min(scr.h);
            (
                scr.x + (scr.w.saturating_sub(w) / 2) as i32,
                scr.top + (scr.h.saturating_sub(h) / 2) as i32,
                w,
                h,
            )
        }
        WinPos::TopLeft | WinPos::TopRight | WinPos::BottomLeft | WinPos::BottomRight => {
            let div = ratchet_div(wm, cli);
            let w = (scr.w as f32 / div) as u32;
            let h = (scr.h as f32 / div) as u32;
            let x = if matches!(requested, WinPos::TopLeft | WinPos::BottomLeft) {
                scr.x
            } else {
                scr.x + scr.w as i32 - w as i32
            };
            let y = if matches!(requested, WinPos::TopLeft | WinPos::TopRight) {
                scr.top
            } else {
                scr.top + scr.h as i32 - h as i32
            };
            (x, y, w, h)
        }
        WinPos::LeftFill | WinPos::RightFill => {
            let div = ratchet_div(wm, cli);
            let w = (scr.w as f32 / div) as u32;
            let x = if requested == WinPos::LeftFill {
                scr.x
            } else {
                scr.x + scr.w as i32 - w as i32
            };
            (x, scr.top, w, scr.h)
        }
        WinPos::TopFill | WinPos::BottomFill => {
            let div = ratchet_div(wm, cli);
            let h = (scr.h as f32 / div) as u32;
            let y = if requested == WinPos::TopFill {
                scr.top
            } else {
                scr.top + scr.h as i32 - h as i32
            };
            (scr.x, y, scr.w, h)
        }
        WinPos::Preserve => {
            let c = match wm.client(cli) {
                Some(c) => c,
                None => return Ok(()),
            };
            (c.x, c.y, c.w, c.h)
        }
    };

    if let Some(c) = wm.client_mut(cli) {
        c.pos = requested;
    }
    client_moveresize(wm, conn, cli, x, y, w, h)?;
    wm.last_winpos = requested;

    let is_anchor = {
        let tag = wm.screen(scr_id).current_tag();
        tag.anchor == Some(cli)
    };
    recompute_anchor_space(wm, scr_id);
    if is_anchor {
        make_grid(wm, conn, Arg::default())?;
    }
    Ok(())
}

fn ratchet_center(wm: &mut Wm, cli: ClientId, scr: &Rect) -> u32 {
    let Some(c) = wm.client_mut(cli) else {
        return 0;
    };
    let would_overflow = (c.inc as u32 + WIN_INC_STEP) * 2 >= scr.w.min(scr.h);
    if would_overflow {
        c.inc = 0;
    } else {
        c.inc += WIN_INC_STEP as u16;
    }
    c.inc as u32
}

fn ratchet_div(wm: &mut Wm, cli: ClientId) -> f32 {
    let Some(c) = wm.client_mut(cli) else {
        return 2.0;
    };
    if c.div < 2.0 {
        c.div = 2.0;
    } else if c.div >= POS_DIV_MAX {
        c.div = 2.0;
    } else {
        c.div += 1.0;
    }
    c.div
}

/// `tag.space = scr` shrunk by the anchor's split, per §4.5's
/// left/right and top/bottom formulas. Quadrant anchors (`TopLeft` and
/// friends) are treated by their horizontal side, since the formulas
/// given only cover the four `*Fill` directions plus the two corner
/// pairs that share them.
fn recompute_anchor_space(wm: &mut Wm, scr_id: crate::ids::ScreenId) {
    let scr = wm.screen(scr_id).usable_rect();
    let anchor = wm.screen(scr_id).current_tag().anchor;
    let space = match anchor.and_then(|a| wm.client(a)) {
        None => scr,
        Some(ac) => {
            let div = ac.div.max(1.0);
            let bw = 2 * BORDER_WIDTH;
            match ac.pos {
                WinPos::LeftFill | WinPos::TopLeft | WinPos::BottomLeft => Rect::new(
                    scr.x + ac.w as i32 + bw as i32,
                    scr.y,
                    scr.w - (scr.w as f32 / div) as u32,
                    scr.h,
                ),
                WinPos::RightFill | WinPos::TopRight | WinPos::BottomRight => {
                    Rect::new(scr.x, scr.y, scr.w - (scr.w as f32 / div) as u32, scr.h)
                }
                WinPos::TopFill => Rect::new(
                    scr.x,
                    scr.y + ac.h as i32 + bw as i32,
                    scr.w,
                    scr.h - (scr.h as f32 / div) as u32,
                ),
                WinPos::BottomFill => {
                    Rect::new(scr.x, scr.y, scr.w, scr.h - (scr.h as f32 / div) as u32)
                }
                _ => scr,
            }
        }
    };
    wm.screen_mut(scr_id).current_tag_mut().space = space;
}

/// `grow_window(arg)`: acts only on the split direction last used by
/// `place_window`; before any placement has happened this is a no-op.
pub fn grow_window(wm: &mut Wm, conn: &impl XConn, arg: Arg) -> Result<()> {
    if wm.last_winpos == WinPos::Preserve {
        debug!("grow-window before any placement has run, ignoring");
        return Ok(());
    }
    let Some(cli) = resolve_target_client(wm, conn, &arg) else {
        return Ok(());
    };
    let (x, y, w, h, scr_id) = {
        let c = match wm.client(cli) {
            Some(c) => c,
            None => return Ok(()),
        };
        (c.x, c.y, c.w, c.h, c.scr)
    };
    let scr = wm.screen(scr_id).usable_rect();

    let mut div = wm.client(cli).map(|c| c.div).unwrap_or(2.0);
    div -= GROW_STEP;
    if div < GROW_STEP_MIN {
        div = 2.0;
    }
    if let Some(c) = wm.client_mut(cli) {
        c.div = div;
    }

    let (nx, ny, nw, nh) = match wm.last_winpos {
        WinPos::LeftFill | WinPos::TopLeft | WinPos::BottomLeft => {
            (x, y, (scr.w as f32 / div) as u32 - WINDOW_PAD, h)
        }
        WinPos::RightFill | WinPos::TopRight | WinPos::BottomRight => {
            let nw = (scr.w as f32 / div) as u32 - WINDOW_PAD;
            (scr.x + scr.w as i32 - nw as i32, y, nw, h)
        }
        WinPos::TopFill => (x, y, w, (scr.h as f32 / div) as u32 - WINDOW_PAD),
        WinPos::BottomFill => {
            let nh = (scr.h as f32 / div) as u32 - WINDOW_PAD;
            (x, scr.top + scr.h as i32 - nh as i32, w, nh)
        }
        _ => (x, y, w, h),
    };
    client_moveresize(wm, conn, cli, nx, ny, nw, nh)
}

/// `make_grid(arg)`: retile every visible non-anchor, non-popup client
/// on the current tag into a near-square grid within `tag.space`.
pub fn make_grid(wm: &mut Wm, conn: &impl XConn, arg: Arg) -> Result<()> {
    let scr_id = wm.curscr;
    let (members, space, anchor, anchor_tall) = {
        let scr = wm.screen(scr_id);
        let tag = scr.current_tag();
        let members = tag.grid_members(|c| wm.client(c).map(|c| c.is_popup()).unwrap_or(false));
        let anchor_tall = tag
            .anchor
            .and_then(|a| wm.client(a))
            .map(|a| a.h > a.w)
            .unwrap_or(false);
        (members, tag.space, tag.anchor, anchor_tall)
    };

    let n = members.len();
    if n == 0 {
        return Ok(());
    }
    if n == 1 && anchor.is_none() {
        return Ok(());
    }
    if n == 1 {
        // Split the remaining space by the anchor's larger dimension.
        let rects = if anchor_tall {
            vec![space.split_vertical(0.5).0]
        } else {
            vec![space.split_horizontal(0.5).0]
        };
        return place_grid(wm, conn, &members, &rects);
    }
    if n == 2 {
        let vertical = if arg.data == 1 {
            wm.screen(scr_id).current_tag().grid_vertical
        } else {
            !wm.screen(scr_id).current_tag().grid_vertical
        };
        wm.screen_mut(scr_id).current_tag_mut().grid_vertical = vertical;
        let (a, b) = if vertical {
            space.split_vertical(0.5)
        } else {
            space.split_horizontal(0.5)
        };
        return place_grid(wm, conn, &members, &[a, b]);
    }

    let mut i = 1u32;
    while !((i * i) >= n as u32 || i * (i + 1) >= n as u32) {
        i += 1;
    }
    let cols = if i * i >= n as u32 { i } else { i + 1 };
    let rows = i;
    let rects = space.as_grid(cols, rows);
    place_grid(wm, conn, &members, &rects)
}

fn place_grid(wm: &mut Wm, conn: &impl XConn, members: &[ClientId], rects: &[Rect]) -> Result<()> {
    let ts = members
        .iter()
        .filter_map(|&c| wm.client(c).map(|c| c.ts))
        .max()
        .unwrap_or(0)
        + 1;
    for (i, &cli) in members.iter().enumerate() {
        let r = rects.get(i).or_else(|| rects.last());
        let Some(r) = r else { continue };
        client_moveresize(wm, conn, cli, r.x, r.y, r.w, r.h)?;
        if let Some(c) = wm.client_mut(cli) {
            c.ts = ts;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TagId;
    use crate::model::screen::Panel;

    fn test_screen() -> Screen {
        Screen {
            id: 0,
            output: None,
            name: "test".into(),
            x: 0,
            y: 0,
            w: 1000,
            h: 800,
            top: 0,
            tags: vec![crate::model::Tag::new(0, "1", Rect::new(0, 0, 1000, 800))],
            current_tag: TagId(0),
            dock: Vec::new(),
            panel: Panel::new(crate::ids::WinId(0), 20, true),
        }
    }

    #[test]
    fn adjust_w_clamps_to_minimum() {
        let s = test_screen();
        assert_eq!(adjust_w(&s, 1), WIN_WIDTH_MIN);
    }

    #[test]
    fn adjust_x_clamps_within_screen() {
        let s = test_screen();
        assert_eq!(adjust_x(&s, -500), 0);
        assert_eq!(adjust_x(&s, 5000), 1000);
    }

    #[test]
    fn grid_sizing_rule_finds_smallest_fitting_square() {
        // n=5 clients: i=2 gives i*(i+1)=6>=5, i*i=4<5, so uses 2x3.
        let mut i = 1u32;
        let n = 5u32;
        while !((i * i) >= n || i * (i + 1) >= n) {
            i += 1;
        }
        assert_eq!(i, 2);
    }
}
