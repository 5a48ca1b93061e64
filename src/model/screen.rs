//! One X output (or a synthetic single-output) and its panel.
use crate::ids::{ClientId, TagId, WinId};
use crate::model::tag::Tag;

/// The five left-to-right regions of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelItemKind {
    Menu,
    Tags,
    Divider,
    Title,
    Dock,
}

/// One region of the panel, as an x-range.
#[derive(Debug, Clone, Copy)]
pub struct PanelItem {
    pub kind: PanelItemKind,
    pub x: i32,
    pub w: u32,
}

impl PanelItem {
    pub fn new(kind: PanelItemKind) -> Self {
        Self { kind, x: 0, w: 0 }
    }

    pub fn contains_x(&self, x: i32) -> bool {
        x >= self.x && x < self.x + self.w as i32
    }
}

/// The per-screen status bar.
#[derive(Debug, Clone)]
pub struct Panel {
    pub win: WinId,
    pub height: u32,
    pub top: bool,
    pub items: [PanelItem; 5],
}

impl Panel {
    pub fn new(win: WinId, height: u32, top: bool) -> Self {
        Self {
            win,
            height,
            top,
            items: [
                PanelItem::new(PanelItemKind::Menu),
                PanelItem::new(PanelItemKind::Tags),
                PanelItem::new(PanelItemKind::Divider),
                PanelItem::new(PanelItemKind::Title),
                PanelItem::new(PanelItemKind::Dock),
            ],
        }
    }

    pub fn item(&self, kind: PanelItemKind) -> &PanelItem {
        self.items.iter().find(|i| i.kind == kind).expect("all kinds present")
    }

    pub fn item_mut(&mut self, kind: PanelItemKind) -> &mut PanelItem {
        self.items
            .iter_mut()
            .find(|i| i.kind == kind)
            .expect("all kinds present")
    }

    /// Which item, if any, the given panel-relative x falls into.
    pub fn item_at(&self, x: i32) -> Option<PanelItemKind> {
        self.items.iter().find(|i| i.contains_x(x)).map(|i| i.kind)
    }
}

/// An X output, or a synthetic single-output covering the whole root
/// window when Randr is unavailable.
#[derive(Debug, Clone)]
pub struct Screen {
    pub id: u8,
    pub output: Option<u32>,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    /// y of the usable area, below (or above) the panel.
    pub top: i32,
    pub tags: Vec<Tag>,
    pub current_tag: TagId,
    /// Dock items, right-to-left insertion order.
    pub dock: Vec<ClientId>,
    pub panel: Panel,
}

impl Screen {
    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.0]
    }

    pub fn tag_mut(&mut self, id: TagId) -> &mut Tag {
        &mut self.tags[id.0]
    }

    pub fn current_tag(&self) -> &Tag {
        self.tag(self.current_tag)
    }

    pub fn current_tag_mut(&mut self) -> &mut Tag {
        let id = self.current_tag;
        self.tag_mut(id)
    }

    pub fn usable_rect(&self) -> crate::geometry::Rect {
        crate::geometry::Rect::new(self.x, self.top, self.w, self.h)
    }

    /// Whether `p` falls within this screen's full extent, including the
    /// panel strip (whose height is the gap between `y` and `top`, on
    /// whichever side the panel lives).
    pub fn contains_point(&self, p: crate::geometry::Point) -> bool {
        let full = crate::geometry::Rect::new(self.x, self.y, self.w, self.h + self.panel.height);
        full.contains_point(p)
    }
}
