//! A per-screen virtual desktop.
use crate::geometry::Rect;
use crate::ids::ClientId;

/// Tag-level state flags (panel highlight only — these are cosmetic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    Normal,
    Focused,
    Active,
}

/// A virtual desktop on one screen.
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: u8,
    pub name: String,
    /// Members in z-insert order (oldest first).
    pub clients: Vec<ClientId>,
    pub visited: Option<ClientId>,
    pub prev: Option<ClientId>,
    pub front: Option<ClientId>,
    pub anchor: Option<ClientId>,
    /// Panel x-offset of this tag's label.
    pub x: i32,
    pub w: u32,
    /// Usable area for grid layout, after subtracting the anchor's split.
    pub space: Rect,
    pub grid_vertical: bool,
    pub state: TagState,
}

impl Tag {
    pub fn new(id: u8, name: impl Into<String>, space: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            clients: Vec::new(),
            visited: None,
            prev: None,
            front: None,
            anchor: None,
            x: 0,
            w: 0,
            space,
            grid_vertical: false,
            state: TagState::Normal,
        }
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains(&id)
    }

    pub fn remove(&mut self, id: ClientId) {
        self.clients.retain(|&c| c != id);
        if self.visited == Some(id) {
            self.visited = None;
        }
        if self.prev == Some(id) {
            self.prev = None;
        }
        if self.front == Some(id) {
            self.front = None;
        }
        if self.anchor == Some(id) {
            self.anchor = None;
        }
    }

    /// Non-anchor, non-popup members eligible for grid tiling, in
    /// insertion order. `is_visible`/`is_popup` are supplied by the
    /// caller since that state lives on `Client`, not `Tag`.
    pub fn grid_members(
        &self,
        is_popup: impl Fn(ClientId) -> bool,
    ) -> Vec<ClientId> {
        self.clients
            .iter()
            .copied()
            .filter(|&c| Some(c) != self.anchor && !is_popup(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_clears_all_slots_pointing_at_it() {
        let mut t = Tag::new(0, "1", Rect::new(0, 0, 100, 100));
        let c = ClientId(3);
        t.clients.push(c);
        t.front = Some(c);
        t.anchor = Some(c);
        t.remove(c);
        assert!(t.clients.is_empty());
        assert_eq!(t.front, None);
        assert_eq!(t.anchor, None);
    }
}
