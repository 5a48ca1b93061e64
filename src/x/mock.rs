//! A mock implementation of [`XConn`] for dispatcher and layout tests
//! that never touch a real X server.
use super::atoms::Atom;
use super::event::XEvent;
use super::{OutputInfo, StackMode, WinAttr, XConn};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::ids::WinId;
use crate::model::keymap::{KeyCode, ModMask};

/// Every method defaults to `Error::UnimplementedMock`; a test only
/// overrides the handful of calls its scenario actually exercises.
/// Implementing this trait implements [`XConn`] for free.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_root(&self) -> WinId {
        WinId(1)
    }

    fn mock_intern_atom(&self, name: &str) -> Result<WinId> {
        Err(Error::UnimplementedMock(name.to_string()))
    }

    fn mock_atom_name(&self, atom: WinId) -> Result<String> {
        Err(Error::UnimplementedMock("atom_name".into()))
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        Err(Error::UnimplementedMock("next_event".into()))
    }

    fn mock_flush(&self) {}

    fn mock_as_raw_fd(&self) -> i32 {
        -1
    }

    fn mock_current_outputs(&self) -> Result<Vec<OutputInfo>> {
        Err(Error::UnimplementedMock("current_outputs".into()))
    }

    fn mock_create_window(&self, r: Rect, override_redirect: bool) -> Result<WinId> {
        Err(Error::UnimplementedMock("create_window".into()))
    }

    fn mock_map_window(&self, win: WinId) -> Result<()> {
        Err(Error::UnimplementedMock("map_window".into()))
    }

    fn mock_unmap_window(&self, win: WinId) -> Result<()> {
        Err(Error::UnimplementedMock("unmap_window".into()))
    }

    fn mock_destroy_window(&self, win: WinId) -> Result<()> {
        Err(Error::UnimplementedMock("destroy_window".into()))
    }

    fn mock_configure_window(&self, win: WinId, r: Rect) -> Result<()> {
        Err(Error::UnimplementedMock("configure_window".into()))
    }

    fn mock_restack(&self, win: WinId, mode: StackMode) -> Result<()> {
        Err(Error::UnimplementedMock("restack".into()))
    }

    fn mock_set_window_attr(&self, win: WinId, attr: WinAttr) -> Result<()> {
        Err(Error::UnimplementedMock("set_window_attr".into()))
    }

    fn mock_set_input_focus(&self, win: WinId) -> Result<()> {
        Err(Error::UnimplementedMock("set_input_focus".into()))
    }

    fn mock_query_tree(&self, win: WinId) -> Result<Vec<WinId>> {
        Err(Error::UnimplementedMock("query_tree".into()))
    }

    fn mock_get_geometry(&self, win: WinId) -> Result<Rect> {
        Err(Error::UnimplementedMock("get_geometry".into()))
    }

    fn mock_query_pointer(&self) -> Result<(WinId, i32, i32)> {
        Err(Error::UnimplementedMock("query_pointer".into()))
    }

    fn mock_warp_pointer(&self, win: WinId, x: i32, y: i32) -> Result<()> {
        Err(Error::UnimplementedMock("warp_pointer".into()))
    }

    fn mock_get_text_property(&self, win: WinId, atom: Atom) -> Result<Option<String>> {
        Err(Error::UnimplementedMock("get_text_property".into()))
    }

    fn mock_get_property_u32(&self, win: WinId, atom: Atom) -> Result<Option<Vec<u32>>> {
        Err(Error::UnimplementedMock("get_property_u32".into()))
    }

    fn mock_set_property_u32(&self, win: WinId, atom: Atom, data: &[u32]) -> Result<()> {
        Err(Error::UnimplementedMock("set_property_u32".into()))
    }

    fn mock_delete_property(&self, win: WinId, atom: Atom) -> Result<()> {
        Err(Error::UnimplementedMock("delete_property".into()))
    }

    fn mock_send_client_message(
        &self,
        win: WinId,
        type_atom_name: &str,
        data: [u32; 5],
    ) -> Result<()> {
        Err(Error::UnimplementedMock("send_client_message".into()))
    }

    fn mock_grab_key(&self, mods: ModMask, code: KeyCode) -> Result<()> {
        Err(Error::UnimplementedMock("grab_key".into()))
    }

    fn mock_ungrab_key(&self, mods: ModMask, code: KeyCode) -> Result<()> {
        Err(Error::UnimplementedMock("ungrab_key".into()))
    }

    fn mock_keysym_to_keycode(&self, sym: fwm_keysyms::XKeySym) -> Result<KeyCode> {
        Err(Error::UnimplementedMock("keysym_to_keycode".into()))
    }

    fn mock_grab_button(&self, win: WinId, button: u8, mods: ModMask) -> Result<()> {
        Err(Error::UnimplementedMock("grab_button".into()))
    }

    fn mock_take_selection_ownership(&self, selection_atom: WinId, owner: WinId) -> Result<bool> {
        Err(Error::UnimplementedMock("take_selection_ownership".into()))
    }

    fn mock_window_pid(&self, win: WinId) -> Result<Option<i32>> {
        Err(Error::UnimplementedMock("window_pid".into()))
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn root(&self) -> WinId {
        self.mock_root()
    }

    fn intern_atom(&self, name: &str) -> Result<WinId> {
        self.mock_intern_atom(name)
    }

    fn atom_name(&self, atom: WinId) -> Result<String> {
        self.mock_atom_name(atom)
    }

    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn as_raw_fd(&self) -> i32 {
        self.mock_as_raw_fd()
    }

    fn current_outputs(&self) -> Result<Vec<OutputInfo>> {
        self.mock_current_outputs()
    }

    fn create_window(&self, r: Rect, override_redirect: bool) -> Result<WinId> {
        self.mock_create_window(r, override_redirect)
    }

    fn map_window(&self, win: WinId) -> Result<()> {
        self.mock_map_window(win)
    }

    fn unmap_window(&self, win: WinId) -> Result<()> {
        self.mock_unmap_window(win)
    }

    fn destroy_window(&self, win: WinId) -> Result<()> {
        self.mock_destroy_window(win)
    }

    fn configure_window(&self, win: WinId, r: Rect) -> Result<()> {
        self.mock_configure_window(win, r)
    }

    fn restack(&self, win: WinId, mode: StackMode) -> Result<()> {
        self.mock_restack(win, mode)
    }

    fn set_window_attr(&self, win: WinId, attr: WinAttr) -> Result<()> {
        self.mock_set_window_attr(win, attr)
    }

    fn set_input_focus(&self, win: WinId) -> Result<()> {
        self.mock_set_input_focus(win)
    }

    fn query_tree(&self, win: WinId) -> Result<Vec<WinId>> {
        self.mock_query_tree(win)
    }

    fn get_geometry(&self, win: WinId) -> Result<Rect> {
        self.mock_get_geometry(win)
    }

    fn query_pointer(&self) -> Result<(WinId, i32, i32)> {
        self.mock_query_pointer()
    }

    fn warp_pointer(&self, win: WinId, x: i32, y: i32) -> Result<()> {
        self.mock_warp_pointer(win, x, y)
    }

    fn get_text_property(&self, win: WinId, atom: Atom) -> Result<Option<String>> {
        self.mock_get_text_property(win, atom)
    }

    fn get_property_u32(&self, win: WinId, atom: Atom) -> Result<Option<Vec<u32>>> {
        self.mock_get_property_u32(win, atom)
    }

    fn set_property_u32(&self, win: WinId, atom: Atom, data: &[u32]) -> Result<()> {
        self.mock_set_property_u32(win, atom, data)
    }

    fn delete_property(&self, win: WinId, atom: Atom) -> Result<()> {
        self.mock_delete_property(win, atom)
    }

    fn send_client_message(&self, win: WinId, type_atom_name: &str, data: [u32; 5]) -> Result<()> {
        self.mock_send_client_message(win, type_atom_name, data)
    }

    fn grab_key(&self, mods: ModMask, code: KeyCode) -> Result<()> {
        self.mock_grab_key(mods, code)
    }

    fn ungrab_key(&self, mods: ModMask, code: KeyCode) -> Result<()> {
        self.mock_ungrab_key(mods, code)
    }

    fn keysym_to_keycode(&self, sym: fwm_keysyms::XKeySym) -> Result<KeyCode> {
        self.mock_keysym_to_keycode(sym)
    }

    fn grab_button(&self, win: WinId, button: u8, mods: ModMask) -> Result<()> {
        self.mock_grab_button(win, button, mods)
    }

    fn take_selection_ownership(&self, selection_atom: WinId, owner: WinId) -> Result<bool> {
        self.mock_take_selection_ownership(selection_atom, owner)
    }

    fn window_pid(&self, win: WinId) -> Result<Option<i32>> {
        self.mock_window_pid(win)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysRoot;
    impl MockXConn for AlwaysRoot {}

    #[test]
    fn unimplemented_mock_methods_error_by_default() {
        let conn = AlwaysRoot;
        assert_eq!(conn.root(), WinId(1));
        assert!(conn.intern_atom("WM_NAME").is_err());
    }
}
