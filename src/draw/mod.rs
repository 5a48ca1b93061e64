//! The text/panel renderer (toolbar, toolbox, and the per-screen panel
//! all draw through this trait rather than touching x11rb directly).
pub mod x11rb_draw;

pub use x11rb_draw::{X11rbDraw, X11rbDrawContext};

use crate::error::Result;
use crate::geometry::Rect;
use crate::ids::WinId;

/// An RGB color, stored as 0.0-1.0 floats so it can be lightened for
/// hover/focus states without clipping arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    /// `0xRRGGBB`, the format the on-disk color files use.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f64 / 255.0;
        let g = ((hex >> 8) & 0xff) as f64 / 255.0;
        let b = (hex & 0xff) as f64 / 255.0;
        Self { r, g, b }
    }

    fn as_pixel(&self) -> u32 {
        let (r, g, b) = (self.r * 255., self.g * 255., self.b * 255.);
        let (r, g, b) = (r as u32, g as u32, b as u32);
        (r << 16) | (g << 8) | b
    }
}

/// Creates windows and drawing contexts for the panel, toolbar, and
/// toolbox. One implementation per backend; `x11rb_draw` is the only
/// one used outside of tests.
pub trait Draw {
    type Ctx: DrawContext;

    fn new_window(&mut self, r: Rect, override_redirect: bool) -> Result<WinId>;
    fn register_font(&mut self, font_name: &str) -> Result<()>;
    fn context_for(&self, win: WinId) -> Result<Self::Ctx>;
    fn map_window(&self, win: WinId) -> Result<()>;
    fn unmap_window(&self, win: WinId) -> Result<()>;
    fn flush(&self, win: WinId);
}

/// A single drawable surface: set a font and color, then clear,
/// outline, and label it. Mirrors the handful of primitives the
/// original's text/panel renderer used directly against Xlib.
pub trait DrawContext {
    fn font(&mut self, font_name: &str, point_size: i32) -> Result<()>;
    fn color(&mut self, color: Color);
    fn clear(&mut self);
    fn rectangle(&self, x: f64, y: f64, w: f64, h: f64);
    fn text(&self, s: &str, x: f64, y: f64) -> Result<(f64, f64)>;
    fn text_extent(&self, s: &str) -> Result<(f64, f64)>;
    fn flush(&self);
}
