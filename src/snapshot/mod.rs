//! Pid to container snapshots and the diffs between them.
use std::collections::HashMap;
use std::collections::hash_map;

use crate::container::ContainerID;

mod builder;
mod diff;

pub use builder::build_snapshot;
pub use diff::Diff;

/// Container membership of every live, containerized process at one instant.
///
/// Holds at most one entry per pid. Processes that are not in a container, or
/// whose membership could not be read, have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: HashMap<u32, ContainerID>,
}

impl Snapshot {
    pub fn get(&self, pid: u32) -> Option<&ContainerID> {
        self.entries.get(&pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.entries.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, u32, ContainerID> {
        self.entries.iter()
    }

    pub(crate) fn insert(&mut self, pid: u32, container_id: ContainerID) {
        self.entries.insert(pid, container_id);
    }

    pub(crate) fn remove(&mut self, pid: u32) {
        self.entries.remove(&pid);
    }
}

impl FromIterator<(u32, ContainerID)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (u32, ContainerID)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a u32, &'a ContainerID);
    type IntoIter = hash_map::Iter<'a, u32, ContainerID>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
