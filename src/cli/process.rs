use std::{env, path::Path, process::Stdio};

use anyhow::{bail, Context, Result};
use sysinfo::{get_current_pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System, UpdateKind};
use tracing::{debug, info, warn};

use crate::{daemon::instance_lock::InstanceLock, utils::dir::lock_path};

use super::daemon_path::to_daemon_path;

fn daemon_executable() -> Result<std::path::PathBuf> {
    let current = env::current_exe().context("Can't operate without an executable")?;
    Ok(to_daemon_path(current))
}

/// Terminates every running daemon started from `daemon_exe`. Returns how many were stopped.
pub fn kill_previous_servers(daemon_exe: &Path) -> usize {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
    );
    let current_id = get_current_pid()
        .inspect_err(|e| warn!("Can't get current pid {e}"))
        .ok();

    let mut stopped = 0;
    for (pid, process) in system.processes().iter() {
        if Some(*pid) == current_id {
            continue;
        }
        if process.exe().filter(|v| *v == daemon_exe).is_none() {
            continue;
        }

        info!("Stopping daemon {pid}");
        // This will forcefully terminate the process on Windows.
        if process.kill_with(Signal::Term).is_none() {
            process.kill();
        }
        process.wait();
        stopped += 1;
    }
    stopped
}

/// Starts the daemon binary for `app_dir`. The daemon detaches by itself, so this only waits
/// until the detaching is done.
pub fn start_daemon_process(app_dir: &Path) -> Result<()> {
    let daemon = daemon_executable()?;
    let mut command = std::process::Command::new(&daemon);
    command.arg("--dir").arg(app_dir);
    command.stdin(Stdio::null());

    debug!("Spawning {daemon:?}");
    let status = command
        .status()
        .with_context(|| format!("Failed to run {daemon:?}"))?;
    if !status.success() {
        bail!("Daemon exited with {status}");
    }
    Ok(())
}

/// Stops previous daemons and starts a new one.
pub fn restart_daemon(app_dir: &Path) -> Result<()> {
    let stopped = kill_previous_servers(&daemon_executable()?);
    debug!("Stopped {stopped} daemons before restart");
    start_daemon_process(app_dir)
}

pub fn stop_daemons() -> Result<usize> {
    Ok(kill_previous_servers(&daemon_executable()?))
}

/// Starts a daemon unless one already holds the lock of `app_dir`.
pub async fn ensure_daemon_running(app_dir: &Path) -> Result<()> {
    if InstanceLock::is_held(&lock_path(app_dir)).await? {
        debug!("Daemon is already running");
        return Ok(());
    }
    info!("Daemon isn't running, starting it");
    start_daemon_process(app_dir)
}
