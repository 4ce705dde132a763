//! Contains logic for listing processes running on the machine.
//! [SystemProcessLister] is the main artifact of this module, it's backed by `sysinfo` and works
//! the same way on every supported platform.

use std::{ffi::OsStr, path::Path, sync::Arc};

use anyhow::{bail, Result};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    /// Name reported by the OS. On Linux this is truncated to 15 characters.
    pub name: Arc<str>,
    /// File name of the executable, if it can be read. For example `okular` for
    /// `/usr/bin/okular`.
    pub exe_name: Option<Arc<str>>,
}

impl RunningProcess {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            exe_name: None,
        }
    }

    pub fn with_exe(self, exe: &Path) -> Self {
        Self {
            exe_name: exe.file_name().map(os_to_arc),
            ..self
        }
    }
}

fn os_to_arc(value: &OsStr) -> Arc<str> {
    value.to_string_lossy().into()
}

/// Intended to serve as a contract for anything that can tell which processes are running.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessLister {
    fn list_processes(&mut self) -> Result<Vec<RunningProcess>>;
}

/// [ProcessLister] backed by `sysinfo`. The [System] is kept between polls so refreshing only
/// touches what changed.
pub struct SystemProcessLister {
    system: System,
}

impl SystemProcessLister {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessLister {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLister for SystemProcessLister {
    fn list_processes(&mut self) -> Result<Vec<RunningProcess>> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
        );

        let processes = self
            .system
            .processes()
            .values()
            .map(|process| {
                let running = RunningProcess {
                    name: os_to_arc(process.name()),
                    exe_name: None,
                };
                match process.exe() {
                    Some(exe) => running.with_exe(exe),
                    None => running,
                }
            })
            .collect::<Vec<_>>();

        // At the very least our own process has to be visible, so an empty list means the
        // process table couldn't be read.
        if processes.is_empty() {
            bail!("Process list is empty");
        }
        trace!("Listed {} processes", processes.len());
        Ok(processes)
    }
}
