//! Dock client scanning and right-to-left layout within a screen's
//! panel strip.
use std::fs;

use crate::config::{BORDER_WIDTH, ITEM_V_MARGIN};
use crate::error::Result;
use crate::ids::{ClientId, ScreenId};
use crate::wm::Wm;
use crate::x::XConn;

/// Read `<home>/screens/<id>/dock/{left,right}-anchor` symlinks, if
/// present, as the class names that must end up leftmost/rightmost.
fn anchor_classes(wm: &Wm, scr: u8) -> (Option<String>, Option<String>) {
    let dir = wm.home.screen_dock_dir(scr);
    let read = |name: &str| -> Option<String> {
        let target = fs::read_link(dir.join(name)).ok()?;
        target.file_name()?.to_str().map(|s| s.to_string())
    };
    (read("left-anchor"), read("right-anchor"))
}

/// The screen's dock clients, reordered so any left/right-anchored item
/// sits at the matching end of the iteration order used by
/// [`layout_dock`] (which walks from the screen's right edge inward).
fn ordered_dock_items(wm: &Wm, scr_id: ScreenId) -> Vec<ClientId> {
    let scr = wm.screen(scr_id);
    let (left, right) = anchor_classes(wm, scr.id);
    let mut items = scr.dock.clone();

    if let Some(name) = right {
        if let Some(pos) = items
            .iter()
            .position(|&c| wm.client(c).map(|c| c.class == name).unwrap_or(false))
        {
            let item = items.remove(pos);
            items.insert(0, item);
        }
    }
    if let Some(name) = left {
        if let Some(pos) = items
            .iter()
            .position(|&c| wm.client(c).map(|c| c.class == name).unwrap_or(false))
        {
            let item = items.remove(pos);
            items.push(item);
        }
    }
    items
}

/// Whether `<home>/screens/<id>/dock/left-gravity/<class>` exists for
/// this client's class (left-aligned items are spaced from the dock
/// area's left edge instead of the right).
fn is_left_gravity(wm: &Wm, scr: u8, class: &str) -> bool {
    wm.home.screen_dock_left_gravity_dir(scr).join(class).exists()
}

fn panel_strip_y(wm: &Wm, scr_id: ScreenId) -> i32 {
    let scr = wm.screen(scr_id);
    if scr.panel.top {
        scr.y
    } else {
        scr.top + scr.h as i32
    }
}

/// Recompute every dock client's geometry on one screen: fixed height
/// `panel_height - 2*ITEM_V_MARGIN - 2*BORDER_WIDTH`, right-aligned
/// items walking in from the right edge, left-gravity items walking in
/// from the left edge; dock items never participate in tag layout.
pub fn layout_dock(wm: &mut Wm, conn: &impl XConn, scr_id: ScreenId) -> Result<()> {
    let scr = wm.screen(scr_id).usable_rect();
    let panel_height = wm.screen(scr_id).panel.height;
    let item_h = panel_height
        .saturating_sub(2 * ITEM_V_MARGIN)
        .saturating_sub(2 * BORDER_WIDTH);
    let y = panel_strip_y(wm, scr_id) + ITEM_V_MARGIN as i32;

    let items = ordered_dock_items(wm, scr_id);
    let scr_id_u8 = wm.screen(scr_id).id;

    let mut right_x = scr.right();
    let mut left_x = scr.x;
    for cli in items {
        let (w, class) = match wm.client(cli) {
            Some(c) => (c.w, c.class.clone()),
            None => continue,
        };
        let x = if is_left_gravity(wm, scr_id_u8, &class) {
            let x = left_x;
            left_x += w as i32 + ITEM_V_MARGIN as i32;
            x
        } else {
            right_x -= w as i32 + ITEM_V_MARGIN as i32;
            right_x
        };
        crate::layout::client_moveresize(wm, conn, cli, x, y, w, item_h)?;
    }
    Ok(())
}

/// Remove `cli` from its screen's dock list. Called by client teardown
/// once a dock client is destroyed.
pub fn remove_dock_client(wm: &mut Wm, scr_id: ScreenId, cli: ClientId) {
    wm.screen_mut(scr_id).dock.retain(|&c| c != cli);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{TagId, WinId};
    use crate::model::{Client, Screen, Tag};

    fn test_wm_with_dock() -> (Wm, ClientId) {
        let home = crate::home::HomeDirs::from_env();
        let theme = crate::config::Theme::load(&home);
        let mut wm = Wm::new(home, theme, crate::x::Atoms::new());
        let mut c = Client::new(ClientId(0), WinId(5), "tray1".into(), ScreenId(0), TagId(0));
        c.w = 24;
        c.flags.insert(crate::model::ClientFlags::DOCK);
        let idx = wm.clients.insert(c);
        let cli = ClientId(idx);
        wm.screens.push(Screen {
            id: 0,
            output: None,
            name: "t".into(),
            x: 0,
            y: 0,
            w: 1000,
            h: 776,
            top: 24,
            tags: vec![Tag::new(0, "1", crate::geometry::Rect::new(0, 24, 1000, 776))],
            current_tag: TagId(0),
            dock: vec![cli],
            panel: crate::model::screen::Panel::new(WinId(1), 24, true),
        });
        (wm, cli)
    }

    #[test]
    fn single_dock_item_sits_at_right_edge() {
        let (wm, cli) = test_wm_with_dock();
        let items = ordered_dock_items(&wm, ScreenId(0));
        assert_eq!(items, vec![cli]);
    }

    #[test]
    fn remove_dock_client_drops_it_from_the_list() {
        let (mut wm, cli) = test_wm_with_dock();
        remove_dock_client(&mut wm, ScreenId(0), cli);
        assert!(wm.screen(ScreenId(0)).dock.is_empty());
    }
}
