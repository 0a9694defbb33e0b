use std::collections::HashMap;

use crate::container::ContainerID;

use super::Snapshot;

/// The changes that take a published [`Snapshot`] to a newer one.
///
/// The key sets of `to_upsert` and `to_remove` are disjoint: a pid that is
/// still present with a different container is overwritten, not removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub to_upsert: HashMap<u32, ContainerID>,
    pub to_remove: HashMap<u32, ContainerID>,
}

impl Diff {
    /// Computes the diff from `previous` to `next`.
    pub fn between(previous: &Snapshot, next: &Snapshot) -> Self {
        let to_upsert = next
            .iter()
            .filter(|(pid, container_id)| previous.get(**pid) != Some(*container_id))
            .map(|(pid, container_id)| (*pid, container_id.clone()))
            .collect();

        let to_remove = previous
            .iter()
            .filter(|(pid, _)| !next.contains(**pid))
            .map(|(pid, container_id)| (*pid, container_id.clone()))
            .collect();

        Self {
            to_upsert,
            to_remove,
        }
    }

    /// Returns `true` if applying the diff would not change anything.
    pub fn is_empty(&self) -> bool {
        self.to_upsert.is_empty() && self.to_remove.is_empty()
    }
}
