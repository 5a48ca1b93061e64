//! Output enumeration, screen creation/retirement, and panel sizing,
//! per §4.11.
use std::fs;

use tracing::info;

use crate::config::PANEL_SCREEN_GAP;
use crate::draw::Draw;
use crate::error::Result;
use crate::geometry::Rect;
use crate::home::HomeDirs;
use crate::ids::ScreenId;
use crate::model::{Panel, Screen, Tag};
use crate::x::{OutputInfo, XConn};

/// A representative string for the panel-height probe: tall glyphs on
/// both sides so the measured extent behaves like ascent+descent.
const METRIC_PROBE: &str = "Xgjy";

fn probe_panel_height(wm: &crate::wm::Wm, draw: &mut impl Draw) -> Result<u32> {
    draw.register_font(&wm.theme.font_name)?;
    let win = draw.new_window(Rect::new(-1, -1, 1, 1), true)?;
    let mut ctx = draw.context_for(win)?;
    ctx.font(&wm.theme.font_name, wm.theme.font_size as i32)?;
    let (_, h) = ctx.text_extent(METRIC_PROBE)?;
    let raw = h as u32 + 2 * crate::config::ITEM_V_MARGIN;
    Ok(raw + (raw % 2))
}

fn load_tags(home: &HomeDirs, scr_id: u8, space: Rect) -> Vec<Tag> {
    let dir = home.screen_tags_dir(scr_id);
    let mut entries: Vec<(u8, std::path::PathBuf)> = fs::read_dir(&dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|e| {
            let id: u8 = e.file_name().to_str()?.parse().ok()?;
            Some((id, e.path()))
        })
        .collect();
    entries.sort_by_key(|(id, _)| *id);

    if entries.is_empty() {
        return vec![Tag::new(0, "*", space)];
    }
    entries
        .into_iter()
        .map(|(id, path)| {
            let name = fs::read_to_string(path.join(".name"))
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| id.to_string());
            Tag::new(id, name, space)
        })
        .collect()
}

fn next_screen_id(wm: &crate::wm::Wm) -> u8 {
    (0..=u8::MAX)
        .find(|id| !wm.screens.iter().any(|s| s.id == *id))
        .unwrap_or(0)
}

fn apply_panel_geometry(scr: &mut Screen, panel_height: u32, full_h: u32) {
    scr.panel.height = panel_height;
    let gap = panel_height + PANEL_SCREEN_GAP;
    scr.h = full_h.saturating_sub(gap);
    scr.top = if scr.panel.top { scr.y + gap as i32 } else { scr.y };
    for tag in &mut scr.tags {
        tag.space = Rect::new(scr.x, scr.top, scr.w, scr.h);
    }
}

fn screen_add(
    wm: &mut crate::wm::Wm,
    draw: &mut impl Draw,
    report: &OutputInfo,
    panel_height: u32,
) -> Result<()> {
    let id = next_screen_id(wm);
    let panel_top = wm.home.panel_top_marker().exists();
    let panel_win = draw.new_window(Rect::new(report.r.x, report.r.y, report.r.w, panel_height), true)?;
    draw.map_window(panel_win)?;

    let space = Rect::new(report.r.x, report.r.y, report.r.w, report.r.h);
    let mut scr = Screen {
        id,
        output: Some(report.id),
        name: report.name.clone(),
        x: report.r.x,
        y: report.r.y,
        w: report.r.w,
        h: report.r.h,
        top: report.r.y,
        tags: load_tags(&wm.home, id, space),
        current_tag: crate::ids::TagId(0),
        dock: Vec::new(),
        panel: Panel::new(panel_win, panel_height, panel_top),
    };
    apply_panel_geometry(&mut scr, panel_height, report.r.h);
    wm.screens.push(scr);
    Ok(())
}

fn reconcile_screen(
    wm: &mut crate::wm::Wm,
    draw: &mut impl Draw,
    report: &OutputInfo,
    panel_height: u32,
) -> Result<()> {
    let by_id = wm.screens.iter().position(|s| s.output == Some(report.id));
    let by_geometry = wm
        .screens
        .iter()
        .position(|s| s.x == report.r.x && s.y == report.r.y && s.w == report.r.w);

    match by_id.or(by_geometry) {
        Some(i) => {
            let scr = &mut wm.screens[i];
            scr.output = Some(report.id);
            scr.name = report.name.clone();
            scr.x = report.r.x;
            scr.y = report.r.y;
            scr.w = report.r.w;
            apply_panel_geometry(scr, panel_height, report.r.h);
            Ok(())
        }
        None => screen_add(wm, draw, report, panel_height),
    }
}

fn resolve_outputs(conn: &impl XConn) -> Result<Vec<OutputInfo>> {
    match conn.current_outputs() {
        Ok(outputs) if !outputs.is_empty() => Ok(outputs),
        _ => {
            let r = conn.get_geometry(conn.root())?;
            Ok(vec![OutputInfo { name: String::new(), id: 0, r }])
        }
    }
}

/// `init_outputs()`: enumerate outputs, create/retire screens to match,
/// reinit every panel, take tray ownership, (re)create the toolbox,
/// focus root, and scan for already-mapped clients.
pub fn init_outputs(wm: &mut crate::wm::Wm, conn: &impl XConn, draw: &mut impl Draw) -> Result<()> {
    let reports = resolve_outputs(conn)?;
    let panel_height = probe_panel_height(wm, draw)?;

    for report in &reports {
        reconcile_screen(wm, draw, report, panel_height)?;
    }
    wm.screens.retain(|s| reports.iter().any(|r| Some(r.id) == s.output));
    info!(count = wm.screens.len(), "screens reconciled");

    let screen_ids: Vec<ScreenId> = (0..wm.screens.len()).map(ScreenId).collect();
    for id in screen_ids {
        crate::panel::layout_items(wm, draw, id)?;
    }

    wm.defscr = wm
        .screens
        .iter()
        .position(|s| s.x == 0)
        .map(ScreenId)
        .unwrap_or(ScreenId(0));
    wm.curscr = wm.defscr;

    crate::tray::init_tray(wm, conn)?;

    if wm.toolbox.win.is_none() {
        let size = panel_height;
        let win = draw.new_window(Rect::new(-1, -1, size, size), true)?;
        wm.toolbox = crate::model::Toolbox::new(size);
        wm.toolbox.win = Some(win);
    }
    if wm.toolbar.win.is_none() {
        let win = draw.new_window(Rect::new(-1, -1, 1, panel_height), true)?;
        wm.toolbar.win = Some(win);
    }

    conn.set_input_focus(conn.root())?;
    scan_clients(wm, conn)?;
    Ok(())
}

/// Enumerate the root's existing children and admit each as a client,
/// tagging every admission with `SCAN` so `add_window` skips the
/// pointer-warp/raise path used for live `MapRequest`s.
fn scan_clients(wm: &mut crate::wm::Wm, conn: &impl XConn) -> Result<()> {
    let children = conn.query_tree(conn.root())?;
    for win in children {
        crate::clients::add_window(wm, conn, win, crate::model::ClientFlags::SCAN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_screen_id_fills_the_lowest_gap() {
        let home = HomeDirs::from_env();
        let theme = crate::config::Theme::load(&home);
        let mut wm = crate::wm::Wm::new(home, theme, crate::x::Atoms::new());
        wm.screens.push(Screen {
            id: 0,
            output: None,
            name: "a".into(),
            x: 0,
            y: 0,
            w: 100,
            h: 100,
            top: 0,
            tags: vec![Tag::new(0, "*", Rect::new(0, 0, 100, 100))],
            current_tag: crate::ids::TagId(0),
            dock: Vec::new(),
            panel: Panel::new(crate::ids::WinId(1), 20, false),
        });
        assert_eq!(next_screen_id(&wm), 1);
    }

    #[test]
    fn no_tag_directories_yields_the_synthetic_default() {
        let dir = std::env::temp_dir().join(format!("fwm-screens-test-{}", std::process::id()));
        std::env::set_var("FWM_HOME", &dir);
        let home = HomeDirs::from_env();
        let tags = load_tags(&home, 9, Rect::new(0, 0, 10, 10));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "*");
    }
}
