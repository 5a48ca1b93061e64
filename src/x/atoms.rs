//! Named X atoms interned at startup.
use crate::ids::WinId;
use std::collections::HashMap;
use strum::{AsRefStr, EnumIter, EnumString};

/// The atoms the core interns at startup, exactly the set named in the
/// wire protocol section: only `NetActiveWindow` is published in
/// `_NET_SUPPORTED`.
#[derive(AsRefStr, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Atom {
    #[strum(serialize = "WM_STATE")]
    WmState,
    #[strum(serialize = "_NET_CLIENT_LIST")]
    NetClientList,
    #[strum(serialize = "_NET_SYSTEM_TRAY_OPCODE")]
    NetSystemTrayOpcode,
    #[strum(serialize = "_NET_ACTIVE_WINDOW")]
    NetActiveWindow,
    #[strum(serialize = "XFree86_has_VT")]
    XFree86HasVt,
    #[strum(serialize = "_NET_SUPPORTED")]
    NetSupported,
    #[strum(serialize = "_NET_WM_NAME")]
    NetWmName,
    #[strum(serialize = "_NET_WM_PID")]
    NetWmPid,
    #[strum(serialize = "WM_CLIENT_LEADER")]
    WmClientLeader,
    #[strum(serialize = "WM_PROTOCOLS")]
    WmProtocols,
    #[strum(serialize = "WM_DELETE_WINDOW")]
    WmDeleteWindow,
    #[strum(serialize = "_NET_WM_STATE_MAXIMIZED_VERT")]
    NetWmStateMaximizedVert,
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    #[strum(serialize = "_NET_WM_STATE_FULLSCREEN")]
    NetWmStateFullscreen,
    #[strum(serialize = "_NET_WM_STATE_HIDDEN")]
    NetWmStateHidden,
    #[strum(serialize = "_NET_WM_USER_TIME")]
    NetWmUserTime,
    #[strum(serialize = "_NET_WM_PING")]
    NetWmPing,
    #[strum(serialize = "_XEMBED_INFO")]
    XEmbedInfo,
    /// `_NET_SYSTEM_TRAY_S<defscr>`; the screen suffix is appended at
    /// intern time, so this variant only carries the prefix.
    #[strum(serialize = "_NET_SYSTEM_TRAY_S")]
    NetSystemTrayS,
    #[strum(serialize = "WM_NAME")]
    WmName,
    #[strum(serialize = "WM_CLASS")]
    WmClass,
}

/// Interned atom ids, keyed by their logical [`Atom`] name.
#[derive(Debug, Clone, Default)]
pub struct Atoms {
    known: HashMap<Atom, WinId>,
}

impl Atoms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, atom: Atom, id: WinId) {
        self.known.insert(atom, id);
    }

    pub fn get(&self, atom: Atom) -> Option<WinId> {
        self.known.get(&atom).copied()
    }
}
