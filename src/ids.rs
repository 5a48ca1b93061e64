//! Small integer id newtypes.
//!
//! The original source links screens, tags, clients and pending configs
//! into intrusive doubly-linked lists, with cross-references resolved by
//! `container_of` pointer arithmetic. Per the design notes this is
//! replaced with owning vectors keyed by small integer ids: a `ScreenId`
//! or `TagId` is just an index into the `Wm`'s arena, so what was a
//! "weak reference" becomes "look it up".
use std::fmt;

macro_rules! id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self(v)
            }
        }
    };
}

id_type!(ScreenId, "Index into `Wm::screens`.");
id_type!(TagId, "Index into a `Screen::tags`.");
id_type!(ClientId, "Index into `Wm::clients`.");
id_type!(ConfigId, "Index into `Wm::pending_configs`.");

/// An X11 resource id (window, atom, pixmap, ...). A thin newtype so
/// call sites don't confuse raw X ids with our own arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WinId(pub u32);

impl fmt::Display for WinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u32> for WinId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<WinId> for u32 {
    fn from(id: WinId) -> Self {
        id.0
    }
}

pub const NO_WINDOW: WinId = WinId(0);
