//! A tiling/floating hybrid window manager for X11.
pub mod arena;
pub mod clients;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod dock;
pub mod draw;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod home;
pub mod ids;
pub mod keymap;
pub mod layout;
pub mod model;
pub mod panel;
pub mod screens;
pub mod session;
pub mod spawn;
pub mod tray;
pub mod ui;
pub mod wm;
pub mod x;

pub use error::{Error, Result};
