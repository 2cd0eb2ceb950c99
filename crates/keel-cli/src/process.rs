//! Managed server process lifecycle for the development loop.

use std::io;
use std::path::{Path, PathBuf};

use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Owns at most one live managed server process.
///
/// The handle is single-writer by construction: only the server pipeline's
/// post-build hook holds the manager, and that hook is never re-entered
/// because rebuilds are serialized per target.
///
/// `restart` is a best-effort, non-blocking handoff: the old process is
/// signaled but not awaited, so its shutdown may overlap the new process's
/// startup. Accepted trade-off favoring dev-loop latency over strict
/// non-overlap.
pub struct DevProcessManager {
    runtime: PathBuf,
    current: Option<Child>,
}

impl DevProcessManager {
    /// Create a manager that launches entries with `runtime` (e.g. `node`).
    pub fn new(runtime: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            current: None,
        }
    }

    /// Signal the current process (if any) and spawn a replacement running
    /// `entry`. After return exactly one handle is current.
    pub fn restart(&mut self, entry: &Path) -> io::Result<()> {
        if let Some(mut old) = self.current.take() {
            // Best effort; a process that already exited is fine.
            if let Err(err) = signal_terminate(&mut old) {
                warn!("failed to signal previous server process: {err}");
            }
        }

        let child = Command::new(&self.runtime).arg(entry).spawn()?;
        info!(
            pid = ?child.id(),
            entry = %entry.display(),
            "server process started"
        );
        self.current = Some(child);
        Ok(())
    }

    /// PID of the current managed process, if one is running.
    pub fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().and_then(Child::id)
    }
}

/// Ask a child to terminate without waiting for it to exit.
#[cfg(unix)]
fn signal_terminate(child: &mut Child) -> io::Result<()> {
    let Some(pid) = child.id() else {
        // Already exited and reaped.
        return Ok(());
    };
    let ret = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn signal_terminate(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}
