//! The real backend: talks to an X server over `x11rb`.
use std::collections::HashMap;
use std::os::unix::io::AsRawFd;

use strum::IntoEnumIterator;
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{
    AtomEnum, ButtonPressEvent, ChangeWindowAttributesAux, ClientMessageData as XcbCmData,
    ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux, EventMask,
    GrabMode, InputFocus, ModMask as XcbModMask, PropMode, StackMode as XcbStackMode,
    WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{COPY_DEPTH_FROM_PARENT, CURRENT_TIME, NONE};

use super::atoms::Atom;
use super::event::{ClientMessage, ConfigureEvent, MouseEvent, PointerChange, PropertyEvent, XEvent};
use super::{OutputInfo, StackMode, WinAttr, XConn};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::ids::WinId;
use crate::model::keymap::{KeyCode, ModMask};

/// `XConn` implementation backed by a live `x11rb::rust_connection::RustConnection`.
///
/// Keeps a numlock-free key grab policy: every key grab is issued once
/// with no extra modifier and once with `Mod2` (NumLock), and keycodes
/// arriving with NumLock held have that bit masked off before being
/// handed to the dispatcher, matching the grab performed.
pub struct X11rbConn {
    conn: RustConnection,
    root: WinId,
    atoms: HashMap<Atom, u32>,
}

const NUMLOCK: u16 = XcbModMask::M2.bits() as u16;

impl X11rbConn {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) =
            RustConnection::connect(None).map_err(|e| Error::TransientX(e.to_string()))?;
        let root = conn.setup().roots[screen_num].root;

        conn.extension_information(x11rb::protocol::randr::X11_EXTENSION_NAME)
            .map_err(|e| Error::TransientX(e.to_string()))?
            .ok_or_else(|| Error::TransientX("server has no RandR extension".into()))?;

        let mask = x11rb::protocol::randr::NotifyMask::OUTPUT_CHANGE
            | x11rb::protocol::randr::NotifyMask::CRTC_CHANGE
            | x11rb::protocol::randr::NotifyMask::SCREEN_CHANGE;
        conn.randr_select_input(root, mask)?;

        let cookies: Vec<_> = Atom::iter()
            .map(|a| conn.intern_atom(false, a.as_ref().as_bytes()).map(|c| (a, c)))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::TransientX(e.to_string()))?;
        let mut atoms = HashMap::new();
        for (a, cookie) in cookies {
            atoms.insert(a, cookie.reply()?.atom);
        }

        conn.flush().map_err(|e| Error::TransientX(e.to_string()))?;

        Ok(Self {
            conn,
            root: WinId(root),
            atoms,
        })
    }

    fn known_atom(&self, a: Atom) -> u32 {
        self.atoms.get(&a).copied().unwrap_or(0)
    }
}

impl AsRawFd for X11rbConn {
    fn as_raw_fd(&self) -> std::os::unix::io::RawFd {
        self.conn.stream().as_raw_fd()
    }
}

impl XConn for X11rbConn {
    fn root(&self) -> WinId {
        self.root
    }

    fn intern_atom(&self, name: &str) -> Result<WinId> {
        if let Ok(known) = name.parse::<Atom>() {
            return Ok(WinId(self.known_atom(known)));
        }
        let reply = self.conn.intern_atom(false, name.as_bytes())?.reply()?;
        Ok(WinId(reply.atom))
    }

    fn atom_name(&self, atom: WinId) -> Result<String> {
        let reply = self.conn.get_atom_name(atom.0)?.reply()?;
        String::from_utf8(reply.name).map_err(|e| Error::BadProperty(e.to_string()))
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let event = self.conn.wait_for_event()?;
            if let Some(translated) = self.translate(event)? {
                return Ok(translated);
            }
        }
    }

    fn flush(&self) {
        let _ = self.conn.flush();
    }

    fn as_raw_fd(&self) -> i32 {
        AsRawFd::as_raw_fd(self)
    }

    fn current_outputs(&self) -> Result<Vec<OutputInfo>> {
        let resources = self.conn.randr_get_screen_resources(self.root.0)?.reply()?;
        let cookies: Vec<_> = resources
            .crtcs
            .iter()
            .map(|c| self.conn.randr_get_crtc_info(*c, 0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::TransientX(e.to_string()))?;

        let mut outputs = Vec::new();
        for (i, cookie) in cookies.into_iter().enumerate() {
            let reply = cookie.reply()?;
            if reply.width == 0 {
                continue;
            }
            outputs.push(OutputInfo {
                name: format!("output-{i}"),
                id: i as u32,
                r: Rect::new(reply.x as i32, reply.y as i32, reply.width as u32, reply.height as u32),
            });
        }
        Ok(outputs)
    }

    fn create_window(&self, r: Rect, override_redirect: bool) -> Result<WinId> {
        let win = self.conn.generate_id()?;
        let aux = CreateWindowAux::new().override_redirect(override_redirect as u32);
        self.conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            win,
            self.root.0,
            r.x as i16,
            r.y as i16,
            r.w as u16,
            r.h as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &aux,
        )?;
        Ok(WinId(win))
    }

    fn map_window(&self, win: WinId) -> Result<()> {
        self.conn.map_window(win.0)?;
        Ok(())
    }

    fn unmap_window(&self, win: WinId) -> Result<()> {
        self.conn.unmap_window(win.0)?;
        Ok(())
    }

    fn destroy_window(&self, win: WinId) -> Result<()> {
        self.conn.destroy_window(win.0)?;
        Ok(())
    }

    fn configure_window(&self, win: WinId, r: Rect) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(r.x)
            .y(r.y)
            .width(r.w)
            .height(r.h);
        self.conn.configure_window(win.0, &aux)?;
        Ok(())
    }

    fn restack(&self, win: WinId, mode: StackMode) -> Result<()> {
        let xcb_mode = match mode {
            StackMode::Above => XcbStackMode::ABOVE,
            StackMode::Below => XcbStackMode::BELOW,
        };
        let aux = ConfigureWindowAux::new().stack_mode(xcb_mode);
        self.conn.configure_window(win.0, &aux)?;
        Ok(())
    }

    fn set_window_attr(&self, win: WinId, attr: WinAttr) -> Result<()> {
        let aux = match attr {
            WinAttr::EventMask(m) => ChangeWindowAttributesAux::new()
                .event_mask(EventMask::from(m)),
            WinAttr::BorderPixel(c) => ChangeWindowAttributesAux::new().border_pixel(c),
            WinAttr::OverrideRedirect(b) => {
                ChangeWindowAttributesAux::new().override_redirect(b as u32)
            }
        };
        self.conn.change_window_attributes(win.0, &aux)?;
        Ok(())
    }

    fn set_input_focus(&self, win: WinId) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::PARENT, win.0, CURRENT_TIME)?;
        let atom = self.known_atom(Atom::NetActiveWindow);
        self.conn
            .change_property32(PropMode::REPLACE, self.root.0, atom, AtomEnum::WINDOW, &[win.0])?;
        Ok(())
    }

    fn query_tree(&self, win: WinId) -> Result<Vec<WinId>> {
        let reply = self.conn.query_tree(win.0)?.reply()?;
        Ok(reply.children.into_iter().map(WinId).collect())
    }

    fn get_geometry(&self, win: WinId) -> Result<Rect> {
        let geo = self.conn.get_geometry(win.0)?.reply()?;
        Ok(Rect::new(geo.x as i32, geo.y as i32, geo.width as u32, geo.height as u32))
    }

    fn query_pointer(&self) -> Result<(WinId, i32, i32)> {
        let reply = self.conn.query_pointer(self.root.0)?.reply()?;
        Ok((WinId(reply.child), reply.root_x as i32, reply.root_y as i32))
    }

    fn warp_pointer(&self, win: WinId, x: i32, y: i32) -> Result<()> {
        self.conn
            .warp_pointer(NONE, win.0, 0, 0, 0, 0, x as i16, y as i16)?;
        Ok(())
    }

    fn get_text_property(&self, win: WinId, atom: Atom) -> Result<Option<String>> {
        let a = self.known_atom(atom);
        let reply = self
            .conn
            .get_property(false, win.0, a, AtomEnum::ANY, 0, 1024)?
            .reply()?;
        if reply.value.is_empty() {
            return Ok(None);
        }
        Ok(String::from_utf8(reply.value).ok())
    }

    fn get_property_u32(&self, win: WinId, atom: Atom) -> Result<Option<Vec<u32>>> {
        let a = self.known_atom(atom);
        let reply = self
            .conn
            .get_property(false, win.0, a, AtomEnum::ANY, 0, 1024)?
            .reply()?;
        Ok(reply.value32().map(|iter| iter.collect()))
    }

    fn set_property_u32(&self, win: WinId, atom: Atom, data: &[u32]) -> Result<()> {
        let a = self.known_atom(atom);
        self.conn
            .change_property32(PropMode::REPLACE, win.0, a, AtomEnum::CARDINAL, data)?;
        Ok(())
    }

    fn delete_property(&self, win: WinId, atom: Atom) -> Result<()> {
        let a = self.known_atom(atom);
        self.conn.delete_property(win.0, a)?;
        Ok(())
    }

    fn send_client_message(&self, win: WinId, type_atom_name: &str, data: [u32; 5]) -> Result<()> {
        let type_ = self.intern_atom(type_atom_name)?;
        let event = ClientMessageEvent {
            response_type: x11rb::protocol::xproto::CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window: win.0,
            type_: type_.0,
            data: XcbCmData::from(data),
        };
        self.conn
            .send_event(false, win.0, EventMask::NO_EVENT, &event)?;
        Ok(())
    }

    fn grab_key(&self, mods: ModMask, code: KeyCode) -> Result<()> {
        for extra in [0u16, NUMLOCK] {
            self.conn.grab_key(
                false,
                self.root.0,
                mods | extra,
                code,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )?;
        }
        Ok(())
    }

    fn ungrab_key(&self, mods: ModMask, code: KeyCode) -> Result<()> {
        for extra in [0u16, NUMLOCK] {
            self.conn.ungrab_key(code, self.root.0, mods | extra)?;
        }
        Ok(())
    }

    fn keysym_to_keycode(&self, sym: fwm_keysyms::XKeySym) -> Result<KeyCode> {
        let setup = self.conn.setup();
        let min = setup.min_keycode;
        let max = setup.max_keycode;
        let reply = self
            .conn
            .get_keyboard_mapping(min, max - min + 1)?
            .reply()?;
        let per = reply.keysyms_per_keycode as usize;
        let target = sym.as_u32();
        for (i, chunk) in reply.keysyms.chunks(per).enumerate() {
            if chunk.iter().any(|&ks| ks == target) {
                return Ok(min + i as u8);
            }
        }
        Err(Error::UnknownKeysym(sym.as_ref().to_string()))
    }

    fn grab_button(&self, win: WinId, button: u8, mods: ModMask) -> Result<()> {
        let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE;
        for extra in [0u16, NUMLOCK] {
            self.conn.grab_button(
                false,
                win.0,
                mask,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                NONE,
                NONE,
                button,
                mods | extra,
            )?;
        }
        Ok(())
    }

    fn take_selection_ownership(&self, selection_atom: WinId, owner: WinId) -> Result<bool> {
        let prior = self
            .conn
            .get_selection_owner(selection_atom.0)?
            .reply()?
            .owner;
        self.conn
            .set_selection_owner(owner.0, selection_atom.0, CURRENT_TIME)?;
        Ok(prior == 0)
    }

    fn window_pid(&self, win: WinId) -> Result<Option<i32>> {
        let atom = self.known_atom(Atom::NetWmPid);
        let reply = self
            .conn
            .get_property(false, win.0, atom, AtomEnum::CARDINAL, 0, 1)?
            .reply()?;
        Ok(reply.value32().and_then(|mut it| it.next()).map(|v| v as i32))
    }
}

impl X11rbConn {
    fn translate(&self, event: Event) -> Result<Option<XEvent>> {
        let is_root = |w: u32| WinId(w) == self.root;
        Ok(match event {
            Event::KeyPress(ev) => {
                let mods = ev.state & !NUMLOCK;
                Some(XEvent::KeyPress(mods, ev.detail))
            }
            Event::ButtonPress(ev) => Some(self.translate_button(ev)),
            Event::MapRequest(ev) => Some(XEvent::MapRequest(WinId(ev.window))),
            Event::UnmapNotify(ev) => Some(XEvent::UnmapNotify(WinId(ev.window))),
            Event::DestroyNotify(ev) => Some(XEvent::Destroy(WinId(ev.window))),
            Event::EnterNotify(ev) => Some(XEvent::Enter(PointerChange {
                win: WinId(ev.event),
                abs: Point::new(ev.root_x as i32, ev.root_y as i32),
            })),
            Event::LeaveNotify(ev) => Some(XEvent::Leave(PointerChange {
                win: WinId(ev.event),
                abs: Point::new(ev.root_x as i32, ev.root_y as i32),
            })),
            Event::Expose(ev) => {
                if ev.count == 0 {
                    Some(XEvent::Expose(WinId(ev.window)))
                } else {
                    None
                }
            }
            Event::FocusIn(ev) => Some(XEvent::FocusIn(WinId(ev.event))),
            Event::ConfigureNotify(ev) => Some(XEvent::ConfigureNotify(ConfigureEvent {
                win: WinId(ev.window),
                r: Rect::new(ev.x as i32, ev.y as i32, ev.width as u32, ev.height as u32),
                is_root: is_root(ev.window),
            })),
            Event::ConfigureRequest(ev) => Some(XEvent::ConfigureRequest(ConfigureEvent {
                win: WinId(ev.window),
                r: Rect::new(ev.x as i32, ev.y as i32, ev.width as u32, ev.height as u32),
                is_root: is_root(ev.window),
            })),
            Event::PropertyNotify(ev) => {
                let name = self.atom_name(WinId(ev.atom))?;
                Some(XEvent::PropertyNotify(PropertyEvent {
                    win: WinId(ev.window),
                    atom_name: name,
                }))
            }
            Event::ClientMessage(ev) => {
                let name = self.atom_name(WinId(ev.type_))?;
                let data = ev.data.as_data32();
                Some(XEvent::ClientMessage(ClientMessage {
                    win: WinId(ev.window),
                    type_atom_name: name,
                    data,
                }))
            }
            Event::MappingNotify(_) => Some(XEvent::MappingNotify),
            Event::RandrScreenChangeNotify(_)
            | Event::RandrNotify(_) => Some(XEvent::RandrNotify),
            _ => None,
        })
    }

    fn translate_button(&self, ev: ButtonPressEvent) -> XEvent {
        XEvent::ButtonPress(MouseEvent {
            win: WinId(ev.event),
            mods: ev.state & !NUMLOCK,
            button: ev.detail,
            x: ev.event_x as i32,
            y: ev.event_y as i32,
        })
    }
}
