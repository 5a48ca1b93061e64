//! The wire adapter: a small trait abstracting over the handful of
//! X11 requests the core actually needs, plus concrete backends.
pub mod atoms;
pub mod event;
pub mod mock;
pub mod x11rb_conn;

pub use atoms::{Atom, Atoms};
pub use event::XEvent;
pub use mock::MockXConn;
pub use x11rb_conn::X11rbConn;

use crate::error::Result;
use crate::geometry::Rect;
use crate::ids::WinId;
use crate::model::keymap::{KeyCode, ModMask};

/// Window attributes the core ever needs to set, one call per kind
/// rather than a single attribute-mask struct: callers only ever set
/// one or two of these at a time and a flat enum keeps call sites
/// readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinAttr {
    EventMask(u32),
    BorderPixel(u32),
    OverrideRedirect(bool),
}

/// Stacking directive for `configure_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackMode {
    Above,
    Below,
}

/// One output reported by Randr: a name, a geometry, and whether it is
/// currently connected to a CRTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    pub name: String,
    pub id: u32,
    pub r: Rect,
}

/// The wire adapter contract. Implemented once against x11rb for real
/// use and once as an in-memory double for tests; everything above
/// this trait is written against it, never against x11rb directly.
pub trait XConn {
    /// The root window of the default screen.
    fn root(&self) -> WinId;

    /// Intern (or look up) an atom by name, returning its server id.
    fn intern_atom(&self, name: &str) -> Result<WinId>;

    /// The human-readable name of a previously interned atom id.
    fn atom_name(&self, atom: WinId) -> Result<String>;

    /// Block for the next event on the X connection.
    fn next_event(&self) -> Result<XEvent>;

    /// Flush any buffered requests to the server.
    fn flush(&self);

    /// The file descriptor backing the connection, for use in a
    /// `poll`-based event loop alongside the control FIFO.
    fn as_raw_fd(&self) -> i32;

    /// The outputs Randr currently reports as connected.
    fn current_outputs(&self) -> Result<Vec<OutputInfo>>;

    /// Create an unmapped, override-redirect window of the given
    /// geometry, e.g. for a panel, toolbar, toolbox, or check window.
    fn create_window(&self, r: Rect, override_redirect: bool) -> Result<WinId>;

    fn map_window(&self, win: WinId) -> Result<()>;
    fn unmap_window(&self, win: WinId) -> Result<()>;
    fn destroy_window(&self, win: WinId) -> Result<()>;

    fn configure_window(&self, win: WinId, r: Rect) -> Result<()>;
    fn restack(&self, win: WinId, mode: StackMode) -> Result<()>;
    fn set_window_attr(&self, win: WinId, attr: WinAttr) -> Result<()>;

    fn set_input_focus(&self, win: WinId) -> Result<()>;

    /// Children of the root window, in stacking order, at startup.
    fn query_tree(&self, win: WinId) -> Result<Vec<WinId>>;

    /// Current size/position of a window.
    fn get_geometry(&self, win: WinId) -> Result<Rect>;

    /// Current absolute pointer position and the window under it.
    fn query_pointer(&self) -> Result<(WinId, i32, i32)>;

    /// Move the pointer to a position relative to `win`'s origin
    /// (root-relative when `win` is the root window).
    fn warp_pointer(&self, win: WinId, x: i32, y: i32) -> Result<()>;

    /// A text property (e.g. `WM_NAME`, `WM_CLASS`) as UTF-8, if set.
    fn get_text_property(&self, win: WinId, atom: Atom) -> Result<Option<String>>;

    /// A raw cardinal/window-id property, as 32-bit words.
    fn get_property_u32(&self, win: WinId, atom: Atom) -> Result<Option<Vec<u32>>>;

    fn set_property_u32(&self, win: WinId, atom: Atom, data: &[u32]) -> Result<()>;
    fn delete_property(&self, win: WinId, atom: Atom) -> Result<()>;

    fn send_client_message(
        &self,
        win: WinId,
        type_atom_name: &str,
        data: [u32; 5],
    ) -> Result<()>;

    /// Grab a key combination globally on the root window.
    fn grab_key(&self, mods: ModMask, code: KeyCode) -> Result<()>;
    fn ungrab_key(&self, mods: ModMask, code: KeyCode) -> Result<()>;

    /// Resolve a named keysym to the keycode it is currently mapped to,
    /// per the live keyboard mapping. Re-run on `MappingNotify`.
    fn keysym_to_keycode(&self, sym: fwm_keysyms::XKeySym) -> Result<KeyCode>;

    /// Grab a mouse button on a window (used for toolbar/toolbox and
    /// click-to-focus on unfocused clients).
    fn grab_button(&self, win: WinId, button: u8, mods: ModMask) -> Result<()>;

    /// Take the `_NET_SYSTEM_TRAY_S<n>` selection for the given
    /// window, returning whether anyone else already owned it.
    fn take_selection_ownership(&self, selection_atom: WinId, owner: WinId) -> Result<bool>;

    /// The process id that created a window, via `_NET_WM_PID` if the
    /// client set it.
    fn window_pid(&self, win: WinId) -> Result<Option<i32>>;
}
