//! Process entry point: parse the environment, bring up the X
//! connection and the ambient subsystems, then hand off to
//! [`fwm::dispatch::run`] for the lifetime of the process.
use std::rc::Rc;

use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;
use x11rb::rust_connection::RustConnection;

use fwm::config::Theme;
use fwm::draw::X11rbDraw;
use fwm::error::{Error, Result};
use fwm::home::HomeDirs;
use fwm::keymap;
use fwm::wm::Wm;
use fwm::x::{Atom, Atoms, X11rbConn, XConn};

fn init_logging() {
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if let Ok(path) = std::env::var("FWM_LOG") {
        if let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) {
            subscriber.with_writer(move || file.try_clone().expect("clone log file")).init();
            return;
        }
    }
    subscriber.init();
}

/// Publish the atoms `add_window`/`dispatch` need looked up by id rather
/// than by round-tripping through `atom_name` on every event.
fn intern_known_atoms(conn: &impl XConn) -> Result<Atoms> {
    let mut atoms = Atoms::new();
    for atom in Atom::iter() {
        let id = conn.intern_atom(atom.as_ref())?;
        atoms.insert(atom, id);
    }
    Ok(atoms)
}

fn main() -> Result<()> {
    init_logging();
    let home = HomeDirs::from_env();
    home.ensure_layout()?;

    nix::unistd::setsid().map_err(|e| Error::Setsid(e.to_string()))?;
    fwm::spawn::install_sigchld_reaper()?;

    let display = std::env::var("DISPLAY").unwrap_or_default();

    let conn = X11rbConn::connect().map_err(|e| Error::NoXConnection(e.to_string()))?;
    let atoms = intern_known_atoms(&conn)?;
    conn.set_property_u32(
        conn.root(),
        Atom::NetSupported,
        &[atoms.get(Atom::NetActiveWindow).map(|w| w.0).unwrap_or(0)],
    )?;

    let draw_conn = Rc::new(
        RustConnection::connect(None)
            .map(|(c, _)| c)
            .map_err(|e| Error::NoXConnection(e.to_string()))?,
    );
    let mut draw = X11rbDraw::new(draw_conn);

    let theme = Theme::load(&home);
    let mut wm = Wm::new(home, theme, atoms);

    wm.keymaps = fwm::config::load_keymap(&wm.home, keymap::default_bindings());
    keymap::grab_all(&conn, &mut wm.keymaps)?;
    let toolbar_keys = keymap::resolve_toolbar_keys(&conn)?;
    keymap::grab_toolbar_keys(&conn, &toolbar_keys)?;
    wm.toolbar_keys = toolbar_keys;

    fwm::screens::init_outputs(&mut wm, &conn, &mut draw)?;

    if let Ok(cmd) = std::fs::read_to_string(wm.home.autostart_program()) {
        fwm::spawn::spawn(cmd.trim().to_string());
    }

    fwm::dispatch::run(&mut wm, &conn, &mut draw, &display)
}
