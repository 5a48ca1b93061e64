//! Crate-wide error type.
//!
//! Mirrors the taxonomy in the error handling design: fatal errors
//! abort `main`, everything else is constructed, logged at the call site
//! that handles it, and never unwinds across the event loop.
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while running the window manager.
#[derive(Debug, Error)]
pub enum Error {
    /// Unable to open a connection to the X server.
    #[error("unable to connect to the X server: {0}")]
    NoXConnection(String),

    /// `setsid` failed at startup.
    #[error("setsid failed: {0}")]
    Setsid(String),

    /// The X server reported no root screen.
    #[error("X server returned no root screen")]
    NoRootScreen,

    /// A request to the X server failed or errored.
    #[error("X request failed: {0}")]
    TransientX(String),

    /// A window referenced by an event or command no longer exists.
    #[error("window {0:#x} is gone")]
    WinGone(u32),

    /// A request with a specific, named effect failed.
    #[error("request failed: {0}")]
    ReqFailed(String),

    /// A queried property was missing, empty, or of the wrong type.
    #[error("bad property {0}")]
    BadProperty(String),

    /// Filesystem I/O failure (config, session, control plane, dumps).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration value could not be parsed; callers should treat
    /// this the same as "missing" per the error handling design.
    #[error("bad config: {0}")]
    BadConfig(String),

    /// A key binding referenced an unknown modifier letter.
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),

    /// A key binding referenced an unknown keysym name.
    #[error("unknown keysym: {0}")]
    UnknownKeysym(String),

    /// Mock wire-adapter call hit an unimplemented default in tests.
    #[error("unimplemented mock call: {0}")]
    UnimplementedMock(String),

    /// Installing the `SIGCHLD` reaper failed at startup.
    #[error("signal setup failed: {0}")]
    SignalSetup(String),
}

impl From<x11rb::errors::ConnectionError> for Error {
    fn from(e: x11rb::errors::ConnectionError) -> Self {
        Error::TransientX(e.to_string())
    }
}

impl From<x11rb::errors::ReplyError> for Error {
    fn from(e: x11rb::errors::ReplyError) -> Self {
        Error::TransientX(e.to_string())
    }
}

impl From<x11rb::errors::ReplyOrIdError> for Error {
    fn from(e: x11rb::errors::ReplyOrIdError) -> Self {
        Error::TransientX(e.to_string())
    }
}
