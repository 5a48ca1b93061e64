//! The dual-fd main loop: a single `poll(2)` wait over the X connection
//! and the control FIFO, and the per-event-kind handlers it dispatches
//! to, per §4.1 and §4.7.
use std::io::{BufRead, BufReader};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags};
use tracing::{debug, info, warn};

use crate::draw::Draw;
use crate::error::Result;
use crate::ids::{ScreenId, WinId};
use crate::model::{Arg, ClientFlags, Direction};
use crate::wm::Wm;
use crate::x::event::{ClientMessage, ConfigureEvent, MouseEvent, PointerChange, PropertyEvent};
use crate::x::{Atom, XConn, XEvent};

/// How long `MapRequest` waits before placing a window, giving its
/// initial size hints and class property time to land on the server.
const MAP_REQUEST_DEBOUNCE: Duration = Duration::from_millis(10);

/// Run the event loop until the process is killed. Owns the control
/// FIFO's read end, re-creating it after each writer closes (one-shot
/// semantics, per [`crate::control::open_fifo`]).
pub fn run(wm: &mut Wm, conn: &impl XConn, draw: &mut impl Draw, display: &str) -> Result<()> {
    let mut control_reader = BufReader::new(crate::control::open_fifo(&wm.home, display)?);

    loop {
        let x_fd = conn.as_raw_fd();
        let control_fd = control_reader.get_ref().as_raw_fd();
        let mut fds = [
            PollFd::new(x_fd, PollFlags::POLLIN),
            PollFd::new(control_fd, PollFlags::POLLIN),
        ];

        match poll(&mut fds, -1) {
            Ok(_) => {}
            Err(Errno::EINTR) => continue,
            Err(e) => {
                warn!(error = %e, "poll failed, backing off");
                std::thread::sleep(Duration::from_secs(1));
                continue;
            }
        }

        let x_ready = fds[0]
            .revents()
            .map(|r| r.contains(PollFlags::POLLIN))
            .unwrap_or(false);
        let control_ready = fds[1]
            .revents()
            .map(|r| r.contains(PollFlags::POLLIN))
            .unwrap_or(false);

        if x_ready {
            drain_x_events(wm, conn, draw)?;
        }

        if control_ready {
            drain_control_commands(wm, conn, &mut control_reader);
            control_reader = BufReader::new(crate::control::open_fifo(&wm.home, display)?);
        }

        run_post_batch(wm, conn, draw)?;
    }
}

fn drain_control_commands(wm: &mut Wm, conn: &impl XConn, reader: &mut BufReader<std::fs::File>) {
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if let Err(e) = crate::control::dispatch_line(wm, conn, &line) {
                    warn!(%e, "control command failed");
                }
            }
            Err(e) => {
                warn!(%e, "control fifo read failed");
                break;
            }
        }
    }
}

/// Events arrive one at a time from [`XConn::next_event`], which blocks
/// when the queue is empty; a zero-timeout `poll` on the same fd stands
/// in for a non-blocking peek so a burst delivered between two readiness
/// notifications is fully drained before this returns.
fn drain_x_events(wm: &mut Wm, conn: &impl XConn, draw: &mut impl Draw) -> Result<()> {
    loop {
        let event = conn.next_event()?;
        handle_event(wm, conn, draw, event)?;

        let mut fds = [PollFd::new(conn.as_raw_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, 0) {
            Ok(n) if n > 0 => continue,
            _ => break,
        }
    }
    Ok(())
}

fn run_post_batch(wm: &mut Wm, conn: &impl XConn, draw: &mut impl Draw) -> Result<()> {
    if wm.needs_rescan {
        rescan_unmanaged(wm, conn)?;
        wm.needs_rescan = false;
    }
    if wm.needs_reinit_outputs {
        crate::screens::init_outputs(wm, conn, draw)?;
        wm.needs_reinit_outputs = false;
    }
    if let Some(scr_id) = wm.needs_panel_refresh.take() {
        crate::panel::layout_items(wm, draw, scr_id)?;
        crate::panel::redraw(wm, draw, scr_id)?;
    }
    Ok(())
}

/// Re-enumerate the root's children and admit any that aren't already
/// managed. Triggered by a client-leader admission.
fn rescan_unmanaged(wm: &mut Wm, conn: &impl XConn) -> Result<()> {
    let children = conn.query_tree(conn.root())?;
    for win in children {
        if wm.win_to_client.contains_key(&win) {
            continue;
        }
        crate::clients::add_window(wm, conn, win, ClientFlags::empty())?;
    }
    Ok(())
}

fn handle_event(wm: &mut Wm, conn: &impl XConn, draw: &mut impl Draw, event: XEvent) -> Result<()> {
    match event {
        XEvent::ClientMessage(msg) => handle_client_message(wm, conn, msg),
        XEvent::ConfigureNotify(_) => Ok(()),
        XEvent::ConfigureRequest(ev) => handle_configure_request(wm, conn, ev),
        XEvent::Enter(ev) => handle_enter(wm, conn, draw, ev),
        XEvent::Leave(ev) => handle_leave(wm, conn, ev),
        XEvent::Expose(win) => handle_expose(wm, draw, win),
        XEvent::FocusIn(win) => {
            debug!(win = win.0, "FocusIn");
            Ok(())
        }
        XEvent::Destroy(win) => {
            if let Some(cli) = wm.client_for_window(win).map(|c| c.id) {
                crate::clients::free_client(wm, cli);
            }
            Ok(())
        }
        XEvent::KeyPress(mods, code) => handle_key_press(wm, conn, mods, code),
        XEvent::ButtonPress(ev) => handle_button_press(wm, conn, ev),
        XEvent::MappingNotify => handle_mapping_notify(wm, conn),
        XEvent::MapRequest(win) => {
            std::thread::sleep(MAP_REQUEST_DEBOUNCE);
            crate::clients::add_window(wm, conn, win, ClientFlags::empty())
        }
        XEvent::UnmapNotify(win) => handle_unmap(wm, conn, win),
        XEvent::PropertyNotify(ev) => handle_property_notify(wm, conn, draw, ev),
        XEvent::RandrNotify => {
            info!("outputs changed; run `reinit-outputs` to apply");
            Ok(())
        }
    }
}

fn handle_client_message(wm: &mut Wm, conn: &impl XConn, msg: ClientMessage) -> Result<()> {
    match msg.type_atom_name.as_str() {
        "_NET_SYSTEM_TRAY_OPCODE" => {
            const SYSTEM_TRAY_REQUEST_DOCK: u32 = 0;
            if msg.data[1] == SYSTEM_TRAY_REQUEST_DOCK {
                crate::tray::dock_tray_client(wm, conn, WinId(msg.data[2]))?;
            }
            Ok(())
        }
        "_NET_WM_STATE" => {
            let wants_fullscreen = [msg.data[1], msg.data[2]].iter().any(|&a| {
                Some(WinId(a)) == wm.atoms.get(Atom::NetWmStateFullscreen)
                    || Some(WinId(a)) == wm.atoms.get(Atom::NetWmStateMaximizedVert)
            });
            if wants_fullscreen {
                if let Some(cli) = wm.client_for_window(msg.win).map(|c| c.id) {
                    let arg = Arg { cli: Some(cli), data: 0 };
                    crate::layout::place_window(wm, conn, arg, crate::model::WinPos::Fill)?;
                }
            }
            Ok(())
        }
        "_NET_ACTIVE_WINDOW" => {
            if let Some((scr, tag, cli)) = wm
                .client_for_window(msg.win)
                .map(|c| (c.scr, c.tag, c.id))
            {
                crate::focus::focus_tag(wm, conn, scr, tag)?;
                crate::focus::raise_client(wm, conn, Arg { cli: Some(cli), data: 0 })?;
            }
            Ok(())
        }
        other => {
            debug!(type_atom = other, "unhandled client message");
            Ok(())
        }
    }
}

fn handle_configure_request(wm: &mut Wm, conn: &impl XConn, ev: ConfigureEvent) -> Result<()> {
    if ev.is_root {
        return Ok(());
    }
    match wm.client_for_window(ev.win).map(|c| c.id) {
        Some(cli) => crate::layout::client_moveresize(wm, conn, cli, ev.r.x, ev.r.y, ev.r.w, ev.r.h),
        None => {
            // An unmanaged window configuring itself before its first
            // map; honor the request directly and let MapRequest admit
            // it as a client once it actually maps.
            conn.configure_window(ev.win, ev.r)
        }
    }
}

fn handle_enter(wm: &mut Wm, conn: &impl XConn, draw: &impl Draw, ev: PointerChange) -> Result<()> {
    wm.curscr = wm.screen_at(ev.abs);
    let Some(cli) = wm.client_for_window(ev.win).map(|c| c.id) else {
        return Ok(());
    };
    let is_popup = wm.client(cli).map(|c| c.is_popup()).unwrap_or(false);
    if is_popup {
        return Ok(());
    }
    let scr = wm.client(cli).map(|c| c.scr);
    crate::focus::raise_client_with(wm, conn, Arg { cli: Some(cli), data: 1 }, false)?;
    if let Some(scr) = scr {
        crate::panel::redraw(wm, draw, scr)?;
    }
    Ok(())
}

/// Transient popups (tooltips, dropdown menus) close themselves when
/// the pointer leaves, since they rarely get a dedicated close action.
fn handle_leave(wm: &mut Wm, conn: &impl XConn, ev: PointerChange) -> Result<()> {
    let Some(c) = wm.client_for_window(ev.win) else {
        return Ok(());
    };
    if !c.is_popup() {
        return Ok(());
    }
    let win = c.win;
    let cli = c.id;
    conn.unmap_window(win)?;
    conn.destroy_window(win)?;
    crate::clients::free_client(wm, cli);
    Ok(())
}

fn handle_expose(wm: &Wm, draw: &impl Draw, win: WinId) -> Result<()> {
    let scr_id = wm
        .screens
        .iter()
        .position(|s| s.panel.win == win)
        .map(ScreenId);
    if let Some(scr_id) = scr_id {
        crate::panel::redraw(wm, draw, scr_id)?;
    }
    Ok(())
}

fn handle_key_press(wm: &mut Wm, conn: &impl XConn, mods: crate::model::keymap::ModMask, code: crate::model::keymap::KeyCode) -> Result<()> {
    if wm.toolbar.visible {
        let keys = wm.toolbar_keys;
        if crate::keymap::dispatch_toolbar_key(wm, conn, &keys, code)? {
            return Ok(());
        }
    }
    crate::keymap::dispatch_key_press(wm, conn, conn.root(), mods, code)
}

/// The modifier bit a move-drag is armed with; matches the root grab's
/// `MOD` binding in [`crate::keymap`].
const ALT: crate::model::keymap::ModMask = 1 << 3;

fn handle_button_press(wm: &mut Wm, conn: &impl XConn, ev: MouseEvent) -> Result<()> {
    let dragging = wm
        .client_for_window(ev.win)
        .filter(|c| c.flags.contains(ClientFlags::MOVE))
        .map(|c| (c.id, c.w, c.h));
    if let Some((cli, w, h)) = dragging {
        if let Some(c) = wm.client_mut(cli) {
            c.flags.remove(ClientFlags::MOVE);
        }
        let x = ev.x - (w / 2) as i32;
        let y = ev.y - (h / 2) as i32;
        return crate::layout::client_moveresize(wm, conn, cli, x, y, w, h);
    }

    // `ALT`-modified press on a client arms a move: the wire adapter
    // doesn't surface `MotionNotify`, so the drag is modeled as two
    // clicks (arm, then drop at the second click's position) rather
    // than a continuous follow.
    if ev.mods & ALT != 0 && ev.button == 1 {
        let armable = wm
            .client_for_window(ev.win)
            .filter(|c| !c.is_popup() && !c.is_dock())
            .map(|c| c.id);
        if let Some(cli) = armable {
            if let Some(c) = wm.client_mut(cli) {
                c.flags.insert(ClientFlags::MOVE);
            }
            return Ok(());
        }
    }

    if wm.toolbox.win == Some(ev.win) {
        return crate::ui::toolbox_pressed(wm, conn, 0);
    }

    if wm.toolbar.win == Some(ev.win) {
        let item = wm
            .toolbar
            .items
            .iter()
            .position(|it| ev.x >= it.x && ev.x < it.x + it.w as i32);
        if let Some(i) = item {
            wm.toolbar.focused = i;
            return crate::ui::fire_focused_toolbar_item(wm, conn);
        }
        return Ok(());
    }

    let scr_id = wm
        .screens
        .iter()
        .position(|s| s.panel.win == ev.win)
        .map(ScreenId);
    if let Some(scr_id) = scr_id {
        return handle_panel_click(wm, conn, scr_id, ev);
    }

    if let Some(cli) = wm.client_for_window(ev.win).map(|c| c.id) {
        crate::focus::raise_client(wm, conn, Arg { cli: Some(cli), data: 0 })?;
    }
    Ok(())
}

/// Button presses on one of the panel's five regions, per §4.3/§4.7:
/// the menu spawns `panel/menu`, a tag label focuses that tag, the
/// title cycles windows on the current tag, and the divider reveals the
/// toolbar for the tag's front client.
fn handle_panel_click(wm: &mut Wm, conn: &impl XConn, scr_id: ScreenId, ev: MouseEvent) -> Result<()> {
    use crate::model::screen::PanelItemKind;

    let rel_x = ev.x - wm.screen(scr_id).x;
    let Some(kind) = wm.screen(scr_id).panel.item_at(rel_x) else {
        return Ok(());
    };

    match kind {
        PanelItemKind::Menu => {
            if let Ok(cmd) = std::fs::read_to_string(wm.home.panel_menu_program()) {
                crate::spawn::spawn(cmd.trim().to_string());
            }
            Ok(())
        }
        PanelItemKind::Tags => {
            let clicked = wm
                .screen(scr_id)
                .tags
                .iter()
                .find(|t| rel_x >= t.x && rel_x < t.x + t.w as i32)
                .map(|t| crate::ids::TagId(t.id as usize));
            match clicked {
                Some(tag) => crate::focus::focus_tag(wm, conn, scr_id, tag),
                None => Ok(()),
            }
        }
        PanelItemKind::Title => crate::focus::switch_window(wm, conn, scr_id, Direction::Next, true),
        PanelItemKind::Divider => {
            let front = wm.screen(scr_id).current_tag().front;
            match front {
                Some(cli) => crate::ui::show_toolbar_for(wm, conn, cli),
                None => Ok(()),
            }
        }
        PanelItemKind::Dock => Ok(()),
    }
}

fn handle_mapping_notify(wm: &mut Wm, conn: &impl XConn) -> Result<()> {
    crate::keymap::grab_all(conn, &mut wm.keymaps)?;
    let keys = crate::keymap::resolve_toolbar_keys(conn)?;
    crate::keymap::grab_toolbar_keys(conn, &keys)?;
    wm.toolbar_keys = keys;
    Ok(())
}

/// The original distinguishes a WM-initiated hide (tag switch) from a
/// client withdrawing itself by tracking a per-window "ignore next
/// unmap" counter; `WM_STATE` stands in for that here, since
/// [`crate::focus::focus_tag`] always sets it to `IconicState` before
/// unmapping a window it's hiding itself.
fn handle_unmap(wm: &mut Wm, conn: &impl XConn, win: WinId) -> Result<()> {
    const ICONIC_STATE: u32 = 3;
    if conn.get_geometry(win).is_err() {
        if let Some(cli) = wm.client_for_window(win).map(|c| c.id) {
            crate::clients::free_client(wm, cli);
        }
        return Ok(());
    }
    let hidden_by_us = conn
        .get_property_u32(win, Atom::WmState)
        .ok()
        .flatten()
        .and_then(|v| v.first().copied())
        == Some(ICONIC_STATE);
    if hidden_by_us {
        return Ok(());
    }
    if let Some(cli) = wm.client_for_window(win).map(|c| c.id) {
        crate::clients::free_client(wm, cli);
    }
    Ok(())
}

fn handle_property_notify(wm: &mut Wm, conn: &impl XConn, draw: &impl Draw, ev: PropertyEvent) -> Result<()> {
    match ev.atom_name.as_str() {
        "WM_NAME" | "_NET_WM_NAME" if ev.win == conn.root() => {
            if let Some(line) = conn.get_text_property(conn.root(), Atom::WmName)? {
                crate::control::dispatch_line(wm, conn, &line)?;
            }
            Ok(())
        }
        "WM_NAME" | "_NET_WM_NAME" => {
            let title = conn.get_text_property(ev.win, Atom::WmName)?;
            let scr = wm.client_for_window(ev.win).map(|c| c.scr);
            if let Some(title) = title {
                if let Some(c) = wm.client_for_window_mut(ev.win) {
                    c.title = title;
                }
            }
            if let Some(scr) = scr {
                crate::panel::redraw(wm, draw, scr)?;
            }
            Ok(())
        }
        "XFree86_has_VT" => {
            let ids: Vec<ScreenId> = (0..wm.screens.len()).map(ScreenId).collect();
            for id in ids {
                crate::panel::redraw(wm, draw, id)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
