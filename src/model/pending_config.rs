//! A pending `ConfigureRequest` for a window the WM does not yet manage.
use crate::ids::WinId;

/// Recorded at `CONFIGURE_REQUEST` time for an as-yet-unknown window and
/// consulted when that window is eventually mapped. Per the design
/// notes' open questions, an entry for a window that is never mapped is
/// never garbage collected, matching the original.
#[derive(Debug, Clone, Copy)]
pub struct PendingConfig {
    pub win: WinId,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}
