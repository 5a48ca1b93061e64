//! The per-screen panel: five click regions (menu, tags, divider,
//! title, dock) and the text/rect renderer that paints them, per §4.3.
use crate::config::ITEM_V_MARGIN;
use crate::draw::{Draw, DrawContext};
use crate::error::Result;
use crate::ids::{ClientId, ScreenId};
use crate::model::screen::PanelItemKind;
use crate::wm::Wm;

const DIVIDER_W: u32 = 2;
const TAG_H_PAD: u32 = 8;
const ELLIPSIS: &str = "...";

/// Recompute the five items' x-ranges for one screen's panel,
/// measuring tag label widths against the live font. Called whenever
/// the tag list or dock contents change.
pub fn layout_items(wm: &mut Wm, draw: &impl Draw, scr_id: ScreenId) -> Result<()> {
    let win = wm.screen(scr_id).panel.win;
    let mut ctx = draw.context_for(win)?;
    ctx.font(&wm.theme.font_name, wm.theme.font_size as i32)?;

    let panel_h = wm.screen(scr_id).panel.height;
    let menu_w = panel_h;

    let mut widths = Vec::with_capacity(wm.screen(scr_id).tags.len());
    for tag in &wm.screen(scr_id).tags {
        let (w, _) = ctx.text_extent(&tag.name)?;
        widths.push(w as u32 + TAG_H_PAD);
    }
    let tag_w: u32 = widths.iter().sum();
    let mut tx = menu_w as i32;
    for (tag, w) in wm.screen_mut(scr_id).tags.iter_mut().zip(widths) {
        tag.x = tx;
        tag.w = w;
        tx += w as i32;
    }

    let dock_clients: Vec<ClientId> = wm.screen(scr_id).dock.clone();
    let dock_w: u32 = dock_clients
        .iter()
        .filter_map(|&c| wm.client(c))
        .map(|c| c.w + ITEM_V_MARGIN)
        .sum();

    let scr_w = wm.screen(scr_id).w as i32;
    let title_x = menu_w as i32 + tag_w as i32 + DIVIDER_W as i32;
    let title_w = (scr_w - title_x - dock_w as i32).max(0) as u32;

    let panel = &mut wm.screen_mut(scr_id).panel;
    panel.item_mut(PanelItemKind::Menu).x = 0;
    panel.item_mut(PanelItemKind::Menu).w = menu_w;
    panel.item_mut(PanelItemKind::Tags).x = menu_w as i32;
    panel.item_mut(PanelItemKind::Tags).w = tag_w;
    panel.item_mut(PanelItemKind::Divider).x = menu_w as i32 + tag_w as i32;
    panel.item_mut(PanelItemKind::Divider).w = DIVIDER_W;
    panel.item_mut(PanelItemKind::Title).x = title_x;
    panel.item_mut(PanelItemKind::Title).w = title_w;
    panel.item_mut(PanelItemKind::Dock).x = title_x + title_w as i32;
    panel.item_mut(PanelItemKind::Dock).w = dock_w;
    Ok(())
}

/// How many `'w'` glyphs (the widest common glyph) fit in `avail_w`;
/// used as the title's truncation budget per §4.3.
fn max_title_chars(ctx: &impl DrawContext, avail_w: u32) -> Result<usize> {
    let mut n = 0usize;
    loop {
        let probe: String = "w".repeat(n + 1);
        let (w, _) = ctx.text_extent(&probe)?;
        if w as u32 > avail_w {
            return Ok(n);
        }
        n += 1;
    }
}

fn truncate_title(ctx: &impl DrawContext, title: &str, avail_w: u32) -> Result<String> {
    let max_chars = max_title_chars(ctx, avail_w)?;
    if title.chars().count() <= max_chars {
        return Ok(title.to_string());
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let truncated: String = title.chars().take(keep).collect();
    Ok(format!("{truncated}{ELLIPSIS}"))
}

/// Repaint one screen's panel: background, per-tag labels (highlighting
/// the current tag), and the focused client's title, truncated to fit.
pub fn redraw(wm: &Wm, draw: &impl Draw, scr_id: ScreenId) -> Result<()> {
    let scr = wm.screen(scr_id);
    let panel = &scr.panel;
    let win = panel.win;
    let mut ctx = draw.context_for(win)?;
    ctx.font(&wm.theme.font_name, wm.theme.font_size as i32)?;
    let text_yoffs = (panel.height as f64 * 0.7).round();

    ctx.color(wm.theme.border_fg);
    ctx.clear();

    let tags_item = panel.item(PanelItemKind::Tags);
    let mut x = tags_item.x;
    for tag in &scr.tags {
        let color = if tag.id as usize == scr.current_tag.0 {
            wm.theme.focus_fg
        } else {
            wm.theme.border_fg
        };
        ctx.color(color);
        let (w, _) = ctx.text_extent(&tag.name)?;
        ctx.text(&tag.name, x as f64 + TAG_H_PAD as f64 / 2.0, text_yoffs)?;
        x += w as i32 + TAG_H_PAD as i32;
    }

    let title_item = panel.item(PanelItemKind::Title);
    if let Some(cli) = scr.current_tag().front {
        if let Some(c) = wm.client(cli) {
            let title = truncate_title(&ctx, &c.title, title_item.w)?;
            ctx.color(wm.theme.focus_fg);
            ctx.text(&title, title_item.x as f64, text_yoffs)?;
        }
    }

    ctx.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_room_for_the_ellipsis() {
        struct FakeCtx;
        impl DrawContext for FakeCtx {
            fn font(&mut self, _: &str, _: i32) -> Result<()> {
                Ok(())
            }
            fn color(&mut self, _: crate::draw::Color) {}
            fn clear(&mut self) {}
            fn rectangle(&self, _: f64, _: f64, _: f64, _: f64) {}
            fn text(&self, _: &str, _: f64, _: f64) -> Result<(f64, f64)> {
                Ok((0.0, 0.0))
            }
            fn text_extent(&self, s: &str) -> Result<(f64, f64)> {
                Ok((s.chars().count() as f64 * 6.0, 12.0))
            }
            fn flush(&self) {}
        }
        let ctx = FakeCtx;
        let truncated = truncate_title(&ctx, "a very long window title indeed", 60).unwrap();
        assert!(truncated.ends_with("..."));
        assert!(truncated.chars().count() <= 10);
    }
}
