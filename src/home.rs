//! Resolves `FWM_HOME` and exposes typed accessors onto the
//! directory-of-files layout described in the external interfaces
//! table. Nothing here reads file contents; see [`crate::config`] for
//! that.
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// The directories and well-known files rooted at `FWM_HOME`
/// (default `.`), created with mode 0700 on first use.
#[derive(Debug, Clone)]
pub struct HomeDirs {
    root: PathBuf,
}

impl HomeDirs {
    pub fn from_env() -> Self {
        let root = std::env::var("FWM_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_dir(&self) -> PathBuf {
        self.root.join(".session")
    }

    pub fn screens_dir(&self) -> PathBuf {
        self.root.join("screens")
    }

    pub fn screen_dock_dir(&self, scr: u8) -> PathBuf {
        self.screens_dir().join(scr.to_string()).join("dock")
    }

    pub fn screen_dock_left_gravity_dir(&self, scr: u8) -> PathBuf {
        self.screen_dock_dir(scr).join("left-gravity")
    }

    pub fn screen_tags_dir(&self, scr: u8) -> PathBuf {
        self.screens_dir().join(scr.to_string()).join("tags")
    }

    pub fn screen_tag_dir(&self, scr: u8, tag: u8) -> PathBuf {
        self.screen_tags_dir(scr).join(tag.to_string())
    }

    pub fn exclusive_dir(&self) -> PathBuf {
        self.root.join("exclusive")
    }

    pub fn ignore_dir(&self) -> PathBuf {
        self.root.join("ignore")
    }

    pub fn special_dir(&self, kind: SpecialKind) -> PathBuf {
        self.root.join(kind.dirname())
    }

    pub fn keys_dir(&self) -> PathBuf {
        self.root.join("keys")
    }

    pub fn colors_dir(&self) -> PathBuf {
        self.root.join("colors")
    }

    pub fn panel_dir(&self) -> PathBuf {
        self.root.join("panel")
    }

    pub fn panel_top_marker(&self) -> PathBuf {
        self.panel_dir().join("top")
    }

    pub fn panel_menu_program(&self) -> PathBuf {
        self.panel_dir().join("menu")
    }

    pub fn autostart_program(&self) -> PathBuf {
        self.root.join("autostart")
    }

    pub fn lock_program(&self) -> PathBuf {
        self.root.join("lock")
    }

    pub fn control_fifo(&self, display: &str) -> PathBuf {
        self.root.join(format!(".control:{display}"))
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    pub fn tmp_dump(&self, name: &str) -> PathBuf {
        self.tmp_dir().join(name)
    }

    pub fn tmp_seq(&self) -> PathBuf {
        self.tmp_dir().join(".seq")
    }

    /// Ensure the fixed top-level directories exist, mode 0700. Called
    /// once at startup; per-screen/per-tag subdirectories are created
    /// lazily as screens and tags come into being.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            self.session_dir(),
            self.screens_dir(),
            self.exclusive_dir(),
            self.ignore_dir(),
            self.keys_dir(),
            self.colors_dir(),
            self.panel_dir(),
            self.tmp_dir(),
        ] {
            ensure_dir_0700(&dir)?;
        }
        for kind in SpecialKind::ALL {
            ensure_dir_0700(&self.special_dir(*kind))?;
        }
        Ok(())
    }
}

/// The per-class special-placement folders consulted in `add_window`'s
/// special-flags pass, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Popup,
}

impl SpecialKind {
    pub const ALL: &'static [SpecialKind] = &[
        SpecialKind::Center,
        SpecialKind::TopLeft,
        SpecialKind::TopRight,
        SpecialKind::BottomLeft,
        SpecialKind::BottomRight,
        SpecialKind::Popup,
    ];

    fn dirname(self) -> &'static str {
        match self {
            SpecialKind::Center => "center",
            SpecialKind::TopLeft => "top-left",
            SpecialKind::TopRight => "top-right",
            SpecialKind::BottomLeft => "bottom-left",
            SpecialKind::BottomRight => "bottom-right",
            SpecialKind::Popup => "popup",
        }
    }
}

#[cfg(unix)]
fn ensure_dir_0700(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.exists() {
        return Ok(());
    }
    fs::DirBuilder::new().mode(0o700).create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn ensure_dir_0700(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_and_dock_paths_are_rooted_under_home() {
        let home = HomeDirs { root: PathBuf::from("/tmp/fwm-test-home") };
        assert_eq!(home.session_dir(), PathBuf::from("/tmp/fwm-test-home/.session"));
        assert_eq!(
            home.screen_dock_dir(0),
            PathBuf::from("/tmp/fwm-test-home/screens/0/dock")
        );
        assert_eq!(
            home.control_fifo(":0"),
            PathBuf::from("/tmp/fwm-test-home/.control::0")
        );
    }
}
