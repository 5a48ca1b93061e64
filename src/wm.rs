//! The central state bundle: one `Wm` owns every screen, client, and
//! singleton widget, and is threaded by mutable reference through each
//! event handler. This is the arena-based stand-in for the intrusive
//! linked lists the original used to reach the same data from any
//! event callback.
use std::collections::HashMap;

use crate::arena::Arena;
use crate::config::Theme;
use crate::home::HomeDirs;
use crate::ids::{ClientId, ScreenId, WinId};
use crate::model::{Client, Keymap, PendingConfig, Screen, Toolbar, Toolbox, WinPos};
use crate::x::Atoms;

/// Everything the dispatcher, layout engine, focus model, and the rest
/// of the core need to see or mutate. One instance lives for the
/// lifetime of the process.
pub struct Wm {
    pub screens: Vec<Screen>,
    pub clients: Arena<Client>,
    pub pending: Arena<PendingConfig>,
    pub win_to_client: HashMap<WinId, ClientId>,
    pub curscr: ScreenId,
    pub defscr: ScreenId,
    pub toolbar: Toolbar,
    pub toolbox: Toolbox,
    pub keymaps: Vec<Keymap>,
    /// Resolved once at startup and again on `MappingNotify`; grabbed
    /// only while the toolbar is visible.
    pub toolbar_keys: crate::keymap::ToolbarKeys,
    /// The split direction `grow_window` acts on; a no-op until
    /// `place_window` has run at least once (see the design notes'
    /// open question on this interaction).
    pub last_winpos: WinPos,
    pub atoms: Atoms,
    pub theme: Theme,
    pub home: HomeDirs,
    /// Set by a handler that changed the set of visible clients; the
    /// dispatcher's post-batch pass clears it after re-running layout
    /// and repainting panels, so a burst of events only recomputes once.
    pub needs_rescan: bool,
    /// Set by the `reinit-outputs` control command; the dispatcher's
    /// main loop clears it by calling [`crate::screens::init_outputs`]
    /// with its own `Draw` handle.
    pub needs_reinit_outputs: bool,
    /// Set by the `refresh-panel <id>` control command; the dispatcher's
    /// post-batch pass clears it by redrawing that screen's panel with
    /// its own `Draw` handle, which `dispatch_line` doesn't have.
    pub needs_panel_refresh: Option<ScreenId>,
}

impl Wm {
    pub fn new(home: HomeDirs, theme: Theme, atoms: Atoms) -> Self {
        Self {
            screens: Vec::new(),
            clients: Arena::new(),
            pending: Arena::new(),
            win_to_client: HashMap::new(),
            curscr: ScreenId::from(0),
            defscr: ScreenId::from(0),
            toolbar: Toolbar::new(),
            toolbox: Toolbox::new(0),
            keymaps: Vec::new(),
            toolbar_keys: crate::keymap::ToolbarKeys::default(),
            last_winpos: WinPos::Preserve,
            atoms,
            theme,
            home,
            needs_rescan: false,
            needs_reinit_outputs: false,
            needs_panel_refresh: None,
        }
    }

    pub fn screen(&self, id: ScreenId) -> &Screen {
        &self.screens[id.0]
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> &mut Screen {
        &mut self.screens[id.0]
    }

    pub fn curscr(&self) -> &Screen {
        self.screen(self.curscr)
    }

    pub fn curscr_mut(&mut self) -> &mut Screen {
        self.screen_mut(self.curscr)
    }

    pub fn client_for_window(&self, win: WinId) -> Option<&Client> {
        self.win_to_client
            .get(&win)
            .and_then(|&id| self.clients.get(id.0))
    }

    pub fn client_for_window_mut(&mut self, win: WinId) -> Option<&mut Client> {
        let id = *self.win_to_client.get(&win)?;
        self.clients.get_mut(id.0)
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id.0)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(id.0)
    }

    /// Find the screen whose full rect (including panel) contains the
    /// given root-relative point, falling back to the default screen
    /// for coordinates that land in no screen (shouldn't happen on a
    /// well-formed Randr layout, but pointer warps can race a resize).
    pub fn screen_at(&self, p: crate::geometry::Point) -> ScreenId {
        self.screens
            .iter()
            .find(|s| s.contains_point(p))
            .map(|s| ScreenId(s.id as usize))
            .unwrap_or(self.defscr)
    }
}
