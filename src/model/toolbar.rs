//! The horizontal strip of per-client action buttons.
use crate::ids::{ClientId, WinId};

/// Visual/interaction state of one toolbar item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Normal,
    Focused,
    Active,
    Alert,
    Locked,
}

/// One action button on the toolbar.
#[derive(Debug, Clone)]
pub struct ToolbarItem {
    pub label: &'static str,
    pub x: i32,
    pub w: u32,
    pub state: ItemState,
}

/// The ten well-known toolbar actions, in display order.
pub const TOOLBAR_ITEMS: &[&str] = &[
    "Close", "Center", "Flag", "Left", "Right", "Top", "Bottom", "Expand", "Move", "Mouse",
];

/// The process-singleton toolbar, attached to one client at a time.
#[derive(Debug, Clone)]
pub struct Toolbar {
    /// Set once the underlying window is created during output init.
    pub win: Option<WinId>,
    pub cli: Option<ClientId>,
    pub x: i32,
    pub y: i32,
    pub visible: bool,
    pub focused: usize,
    pub items: Vec<ToolbarItem>,
}

impl Toolbar {
    pub fn new() -> Self {
        let items = TOOLBAR_ITEMS
            .iter()
            .map(|&label| ToolbarItem {
                label,
                x: 0,
                w: 0,
                state: ItemState::Normal,
            })
            .collect();
        Self {
            win: None,
            cli: None,
            x: 0,
            y: 0,
            visible: false,
            focused: 0,
            items,
        }
    }

    pub fn show_for(&mut self, cli: ClientId, x: i32, y: i32) {
        self.cli = Some(cli);
        self.x = x;
        self.y = y;
        self.visible = true;
        self.focused = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.cli = None;
    }

    pub fn focus_next(&mut self) {
        if !self.items.is_empty() {
            self.focused = (self.focused + 1) % self.items.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.items.is_empty() {
            self.focused = (self.focused + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn focused_label(&self) -> Option<&'static str> {
        self.items.get(self.focused).map(|i| i.label)
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}
