//! System tray manager-selection ownership and dock enrollment for
//! `SYSTEM_TRAY_REQUEST_DOCK` requests, per §4.15.
use crate::error::Result;
use crate::ids::WinId;
use crate::model::ClientFlags;
use crate::wm::Wm;
use crate::x::XConn;

/// Take `_NET_SYSTEM_TRAY_S<defscr>` on `defscr`'s panel window and, if
/// no one already owned it, broadcast the `MANAGER` announcement on
/// root that tray clients wait for.
pub fn init_tray(wm: &Wm, conn: &impl XConn) -> Result<()> {
    let scr = wm.screen(wm.defscr);
    let name = format!("_NET_SYSTEM_TRAY_S{}", scr.id);
    let atom = conn.intern_atom(&name)?;
    let already_owned = conn.take_selection_ownership(atom, scr.panel.win)?;
    if !already_owned {
        conn.send_client_message(
            conn.root(),
            "MANAGER",
            [0, atom.0, scr.panel.win.0, 0, 0],
        )?;
    }
    Ok(())
}

/// Admit `win` as a tray dock client on `defscr`, in response to a
/// `SYSTEM_TRAY_REQUEST_DOCK` client message.
pub fn dock_tray_client(wm: &mut Wm, conn: &impl XConn, win: WinId) -> Result<()> {
    crate::clients::add_window(wm, conn, win, ClientFlags::TRAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_selection_atom_names_include_the_screen_id() {
        assert_eq!(format!("_NET_SYSTEM_TRAY_S{}", 2), "_NET_SYSTEM_TRAY_S2");
    }
}
