//! Fire-and-forget shell spawning for key bindings and the panel menu,
//! plus the `SIGCHLD` reaper that keeps spawned children from zombying.
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::warn;

use crate::error::{Error, Result};

extern "C" fn reap_children(_: i32) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => continue,
            Ok(_) => break,
        }
    }
}

/// Install the process-wide `SIGCHLD` handler. Called once at startup,
/// before any spawn can occur.
pub fn install_sigchld_reaper() -> Result<()> {
    unsafe {
        signal::signal(Signal::SIGCHLD, SigHandler::Handler(reap_children))
            .map_err(|e| Error::SignalSetup(e.to_string()))?;
    }
    Ok(())
}

/// Run `cmd` via `sh -c` on a detached background thread. Never blocks
/// the caller; a spawn failure is logged and otherwise ignored.
pub fn spawn(cmd: impl Into<String>) {
    let cmd = cmd.into();
    std::thread::spawn(move || {
        if let Err(e) = std::process::Command::new("sh").arg("-c").arg(&cmd).spawn() {
            warn!(%cmd, error = %e, "spawn failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_of_a_trivial_command_does_not_panic() {
        spawn("true");
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
}
