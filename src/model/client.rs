//! The managed-window entity and its placement state.
use crate::ids::{ClientId, ScreenId, TagId, WinId};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-client behavior flags. Mirrors the bitset the original packs
    /// into a single `u32` on `struct client`.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ClientFlags: u32 {
        /// Enrolled as a dock item rather than a tag member.
        const DOCK       = 1 << 0;
        /// Enrolled via the system tray protocol.
        const TRAY       = 1 << 1;
        /// Placed centered at less than half the screen's extent.
        const CENTER     = 1 << 2;
        const TOPLEFT    = 1 << 3;
        const TOPRIGHT   = 1 << 4;
        const BOTLEFT    = 1 << 5;
        const BOTRIGHT   = 1 << 6;
        /// Only one client of this window class may be open at a time.
        const EXCLUSIVE  = 1 << 7;
        /// Currently being dragged by the pointer.
        const MOVE       = 1 << 8;
        const FULLSCREEN = 1 << 9;
        /// Transient popup; closed on pointer leave.
        const POPUP      = 1 << 10;
        /// Left-anchored dock item.
        const LANCHOR    = 1 << 11;
        /// Right-anchored dock item.
        const RANCHOR    = 1 << 12;
        /// Left-aligned (as opposed to right-aligned) dock item.
        const LDOCK      = 1 << 13;
        /// Window wants a border drawn (dock items usually keep their own).
        const BORDER     = 1 << 14;
        /// Admitted at scan time rather than from a live MapRequest.
        const SCAN       = 1 << 15;
        /// Admitted in response to direct user action (e.g. toolbar Move).
        const USER       = 1 << 16;
    }
}

/// Requested placement, resolved by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinPos {
    Fill,
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    LeftFill,
    RightFill,
    TopFill,
    BottomFill,
    Preserve,
}

impl Default for WinPos {
    fn default() -> Self {
        WinPos::Preserve
    }
}

/// A managed top-level window.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub win: WinId,
    pub leader: Option<WinId>,
    pub pid: Option<i32>,
    pub class: String,
    /// `WM_NAME`/`_NET_WM_NAME`, shown in the panel's title region;
    /// starts out equal to `class` until the first `PropertyNotify`.
    pub title: String,
    pub scr: ScreenId,
    pub tag: TagId,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    /// Split ratio used by the layout engine; starts at 1 (whole space).
    pub div: f32,
    /// Centered-placement grow step counter.
    pub inc: u16,
    pub flags: ClientFlags,
    /// CRC over the class name, used for the exclusivity check.
    pub crc: u32,
    pub pos: WinPos,
    /// Raise timestamp, microseconds since an arbitrary monotonic epoch.
    pub ts: u64,
    /// Close-escalation counter: rounds spent waiting on `WM_DELETE_WINDOW`.
    pub busy: u8,
}

impl Client {
    pub fn new(id: ClientId, win: WinId, class: String, scr: ScreenId, tag: TagId) -> Self {
        let crc = crc32(class.as_bytes());
        Self {
            id,
            win,
            leader: None,
            pid: None,
            title: class.clone(),
            class,
            scr,
            tag,
            x: 0,
            y: 0,
            w: 1,
            h: 1,
            div: 1.0,
            inc: 0,
            flags: ClientFlags::empty(),
            crc,
            pos: WinPos::Preserve,
            ts: 0,
            busy: 0,
        }
    }

    pub fn is_dock(&self) -> bool {
        self.flags.contains(ClientFlags::DOCK)
    }

    pub fn is_popup(&self) -> bool {
        self.flags.contains(ClientFlags::POPUP)
    }

    pub fn is_exclusive(&self) -> bool {
        self.flags.contains(ClientFlags::EXCLUSIVE)
    }
}

/// A cheap, stable hash used only to compare class names for the
/// exclusivity check in §4.4 — not used for anything security relevant.
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &b in bytes {
        crc ^= b as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_is_deterministic() {
        assert_eq!(crc32(b"xterm"), crc32(b"xterm"));
        assert_ne!(crc32(b"xterm"), crc32(b"urxvt"));
    }

    #[test]
    fn new_client_has_no_flags() {
        let c = Client::new(ClientId(0), WinId(1), "xterm".into(), ScreenId(0), TagId(0));
        assert!(c.flags.is_empty());
        assert_eq!(c.div, 1.0);
    }
}
