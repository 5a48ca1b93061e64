//! The normalized event type handed to the dispatcher, independent of
//! the underlying wire backend.
use crate::geometry::{Point, Rect};
use crate::ids::WinId;
use crate::model::keymap::{KeyCode, ModMask};

/// One input or notification event, translated from whatever the
/// backend (x11rb, or a mock in tests) actually received.
#[derive(Debug, Clone, PartialEq)]
pub enum XEvent {
    /// A client sent us a `ClientMessage`, e.g. a systray dock request.
    ClientMessage(ClientMessage),
    /// A window changed geometry after the fact.
    ConfigureNotify(ConfigureEvent),
    /// A window is asking to be placed or resized before it is mapped.
    ConfigureRequest(ConfigureEvent),
    /// The pointer entered a window.
    Enter(PointerChange),
    /// The pointer left a window.
    Leave(PointerChange),
    /// Part of a window became visible and needs redrawing.
    Expose(WinId),
    /// A window gained input focus.
    FocusIn(WinId),
    /// A window was destroyed.
    Destroy(WinId),
    /// A grabbed key combination fired.
    KeyPress(ModMask, KeyCode),
    /// A grabbed mouse button fired on a window.
    ButtonPress(MouseEvent),
    /// The keyboard mapping changed; keycodes need re-resolving.
    MappingNotify,
    /// A window wants to be mapped onto the screen.
    MapRequest(WinId),
    /// A window was unmapped.
    UnmapNotify(WinId),
    /// A property changed on a window we track.
    PropertyNotify(PropertyEvent),
    /// Randr reported an output change (hotplug, resize, rotate).
    RandrNotify,
}

/// A `ClientMessage` event, carrying the first four 32-bit data words
/// regardless of the original format (8/16/32) the sender used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMessage {
    pub win: WinId,
    pub type_atom_name: String,
    pub data: [u32; 5],
}

/// A `ConfigureNotify`/`ConfigureRequest` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigureEvent {
    pub win: WinId,
    pub r: Rect,
    pub is_root: bool,
}

/// An `EnterNotify`/`LeaveNotify` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerChange {
    pub win: WinId,
    pub abs: Point,
}

/// A `PropertyNotify` payload; the atom is resolved to its name since
/// the dispatcher only ever matches on a handful of well-known names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEvent {
    pub win: WinId,
    pub atom_name: String,
}

/// A mouse button press/release on a window, at the resolved modifier
/// mask and button number (1-5, matching the original's left-to-scroll
/// binding range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub win: WinId,
    pub mods: ModMask,
    pub button: u8,
    pub x: i32,
    pub y: i32,
}
