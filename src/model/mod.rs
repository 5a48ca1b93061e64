//! The data model: screens, tags, clients, and the small singleton UI
//! widgets (toolbar, toolbox), plus their invariants.
pub mod client;
pub mod keymap;
pub mod pending_config;
pub mod screen;
pub mod tag;
pub mod toolbar;
pub mod toolbox;

pub use client::{Client, ClientFlags, WinPos};
pub use keymap::{Action, Arg, Direction, KeyCode, Keymap, ModMask};
pub use pending_config::PendingConfig;
pub use screen::{Panel, PanelItem, PanelItemKind, Screen};
pub use tag::{Tag, TagState};
pub use toolbar::Toolbar;
pub use toolbox::{Gravity, Toolbox};
