use std::path::{Path, PathBuf};

use crate::fsutil;

use super::{Error, Result};

/// Read access to a table of live processes and their cgroup membership.
///
/// The table is racy by nature: a process listed by [`list_pids`] may be gone
/// by the time [`read_cgroup`] is called for it.
///
/// [`list_pids`]: ProcessTable::list_pids
/// [`read_cgroup`]: ProcessTable::read_cgroup
pub trait ProcessTable {
    /// Lists the identifiers of all currently live processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the table itself cannot be read.
    fn list_pids(&self) -> Result<Vec<u32>>;

    /// Returns the raw cgroup membership text of a process, or `None` if it
    /// is not available (the process exited, or the file is unreadable).
    fn read_cgroup(&self, pid: u32) -> Option<String>;
}

/// A [`ProcessTable`] backed by a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    /// Creates a table reading from the procfs mounted at `root`, e.g. `/proc`
    /// or a host's `/proc` bind-mounted into a container.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProcessTable for ProcFs {
    fn list_pids(&self) -> Result<Vec<u32>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| Error::ListProcesses {
            path: self.root.clone(),
            source,
        })?;

        let mut pids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::ListProcesses {
                path: self.root.clone(),
                source,
            })?;
            // Non-numeric entries (`self`, `meminfo`, ...) are not processes.
            if let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse().ok()) {
                pids.push(pid);
            }
        }

        Ok(pids)
    }

    fn read_cgroup(&self, pid: u32) -> Option<String> {
        match fsutil::read_to_string_lossy(self.root.join(pid.to_string()).join("cgroup")) {
            Ok(contents) => Some(contents),
            Err(err) => {
                log::trace!("process {} skipped: {}", pid, err);
                None
            }
        }
    }
}
