//! Process table access.
//!
//! Lists live processes and reads their cgroup membership, by default from
//! `/proc`. The location is configurable so a containerized deployment can
//! point it at the host's procfs (see [`crate::config`]).
mod error;
mod table;

pub use error::{Error, Result};
pub use table::{ProcFs, ProcessTable};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{Error, ProcessTable, Result};

    /// In-memory process table whose contents can be swapped between ticks.
    #[derive(Debug, Default)]
    pub(crate) struct StaticTable {
        processes: Mutex<Option<HashMap<u32, String>>>,
    }

    impl StaticTable {
        pub(crate) fn new<S: Into<String>>(processes: impl IntoIterator<Item = (u32, S)>) -> Self {
            let table = Self::default();
            table.set(processes);
            table
        }

        pub(crate) fn set<S: Into<String>>(&self, processes: impl IntoIterator<Item = (u32, S)>) {
            let processes = processes
                .into_iter()
                .map(|(pid, text)| (pid, text.into()))
                .collect();
            *self.processes.lock().unwrap() = Some(processes);
        }

        /// Makes every following listing fail, as an unreadable procfs would.
        pub(crate) fn break_listing(&self) {
            *self.processes.lock().unwrap() = None;
        }
    }

    impl ProcessTable for StaticTable {
        fn list_pids(&self) -> Result<Vec<u32>> {
            match self.processes.lock().unwrap().as_ref() {
                Some(processes) => Ok(processes.keys().copied().collect()),
                None => Err(Error::ListProcesses {
                    path: "/static".into(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                }),
            }
        }

        fn read_cgroup(&self, pid: u32) -> Option<String> {
            self.processes
                .lock()
                .unwrap()
                .as_ref()
                .and_then(|processes| processes.get(&pid).cloned())
        }
    }

    /// Cgroup file contents of a process in the given docker container.
    pub(crate) fn docker(container_id: &str) -> String {
        format!("1:name=systemd:/docker/{container_id}\n0::/system.slice/docker.service\n")
    }
}
