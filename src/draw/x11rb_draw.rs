//! `Draw`/`DrawContext` backed directly by X11 core fonts and
//! rendering requests. Good enough for single-color panel text; no
//! RENDER extension, no anti-aliasing.
use std::collections::HashMap;
use std::rc::Rc;

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Char2b, ChangeGCAux, ConnectionExt as _, CreateGCAux, CreateWindowAux, Font, Gcontext,
    Rectangle, WindowClass,
};
use x11rb::rust_connection::RustConnection;

use super::{Color, Draw, DrawContext};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::ids::WinId;

/// Opens windows and tracks registered fonts; one instance is shared
/// (via `Rc`) between the panel, toolbar, and toolbox contexts.
pub struct X11rbDraw {
    conn: Rc<RustConnection>,
    fonts: HashMap<String, Font>,
}

impl X11rbDraw {
    pub fn new(conn: Rc<RustConnection>) -> Self {
        Self {
            conn,
            fonts: HashMap::new(),
        }
    }
}

impl Draw for X11rbDraw {
    type Ctx = X11rbDrawContext;

    fn new_window(&mut self, r: Rect, override_redirect: bool) -> Result<WinId> {
        let id = self.conn.generate_id()?;
        let root = self.conn.setup().roots[0].root;
        let aux = CreateWindowAux::new().override_redirect(override_redirect as u32);
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            id,
            root,
            r.x as i16,
            r.y as i16,
            r.w as u16,
            r.h as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &aux,
        )?;
        Ok(WinId(id))
    }

    fn register_font(&mut self, font_name: &str) -> Result<()> {
        let font = self.conn.generate_id()?;
        self.conn.open_font(font, font_name.as_bytes())?;
        self.fonts.insert(font_name.to_string(), font);
        Ok(())
    }

    fn context_for(&self, win: WinId) -> Result<Self::Ctx> {
        X11rbDrawContext::new(Rc::clone(&self.conn), win.0, self.fonts.clone())
    }

    fn map_window(&self, win: WinId) -> Result<()> {
        self.conn.map_window(win.0)?;
        Ok(())
    }

    fn unmap_window(&self, win: WinId) -> Result<()> {
        self.conn.unmap_window(win.0)?;
        Ok(())
    }

    fn flush(&self, _win: WinId) {
        let _ = self.conn.flush();
    }
}

/// A graphics context bound to one target window.
pub struct X11rbDrawContext {
    conn: Rc<RustConnection>,
    gc: Gcontext,
    target: u32,
    font: Option<Font>,
    fonts: HashMap<String, Font>,
}

impl X11rbDrawContext {
    fn new(conn: Rc<RustConnection>, target: u32, fonts: HashMap<String, Font>) -> Result<Self> {
        let gc = conn.generate_id()?;
        conn.create_gc(gc, target, &CreateGCAux::new())?;
        Ok(Self {
            conn,
            gc,
            target,
            font: None,
            fonts,
        })
    }
}

impl DrawContext for X11rbDrawContext {
    fn font(&mut self, font_name: &str, point_size: i32) -> Result<()> {
        let _ = point_size; // X11 core fonts carry their size in the name
        let font = *self
            .fonts
            .get(font_name)
            .ok_or_else(|| Error::BadConfig(format!("font not registered: {font_name}")))?;
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().font(font))?;
        self.font = Some(font);
        Ok(())
    }

    fn color(&mut self, color: Color) {
        let _ = self
            .conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(color.as_pixel()));
    }

    fn clear(&mut self) {
        let _ = self.conn.clear_area(false, self.target, 0, 0, 0, 0);
    }

    fn rectangle(&self, x: f64, y: f64, w: f64, h: f64) {
        let rect = Rectangle {
            x: x as i16,
            y: y as i16,
            width: w as u16,
            height: h as u16,
        };
        let _ = self.conn.poly_rectangle(self.target, self.gc, &[rect]);
    }

    fn text(&self, s: &str, x: f64, y: f64) -> Result<(f64, f64)> {
        let (w, h) = self.text_extent(s)?;
        self.conn
            .image_text8(self.target, self.gc, x as i16, y as i16, s.as_bytes())?;
        Ok((w, h))
    }

    fn text_extent(&self, s: &str) -> Result<(f64, f64)> {
        let font = self
            .font
            .ok_or_else(|| Error::BadConfig("no font set before measuring text".into()))?;
        let text: Vec<Char2b> = s.bytes().map(|b| Char2b { byte1: 0, byte2: b }).collect();
        let extents = self.conn.query_text_extents(font, &text)?.reply()?;
        let width = extents.overall_width as f64;
        let height = (extents.overall_ascent + extents.overall_descent) as f64;
        Ok((width, height))
    }

    fn flush(&self) {
        let _ = self.conn.flush();
    }
}
