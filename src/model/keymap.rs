//! Key bindings and the invocation context passed to an action.
use crate::ids::ClientId;
use fwm_keysyms::XKeySym;

/// An X modifier mask, as used by `grab_key`/`KeyPress`.
pub type ModMask = u16;
/// A resolved X keycode.
pub type KeyCode = u8;

/// Invocation context for a keymap action: the focused client (if any),
/// the keymap entry that fired, and an opaque data word (used for things
/// like "which corner" or "toggle mode").
#[derive(Debug, Clone, Copy, Default)]
pub struct Arg {
    pub cli: Option<ClientId>,
    pub data: u32,
}

/// What a keymap binding does when it fires.
#[derive(Debug, Clone)]
pub enum Action {
    PlaceWindow(crate::model::client::WinPos),
    GrowWindow,
    MakeGrid,
    SwitchWindow(Direction),
    RaiseClient,
    CloseWindow,
    ToggleAnchor,
    ShowToolbar,
    RetagClient(u8),
    FocusTagIndex(u8),
    Spawn(String),
}

/// Iteration direction for `switch_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// A single key binding, resolved from either the built-in table or a
/// `keys/<modifier>_<sym>` file.
#[derive(Debug, Clone)]
pub struct Keymap {
    pub mods: ModMask,
    pub sym: XKeySym,
    pub key: KeyCode,
    pub keyname: String,
    pub action_name: String,
    pub action: Action,
}

impl Keymap {
    pub fn matches(&self, mods: ModMask, key: KeyCode) -> bool {
        self.mods == mods && self.key == key
    }
}
