//! Publishing of the pid to container mapping into a fixed-capacity map.
//!
//! The map is read by a kernel-resident observer by pid. Entries are keyed by
//! the pid as 4 little-endian bytes and hold the container id bytes, see
//! [`encoding`]. Two backends implement [`PidMapStore`]:
//!
//! - [`Bpftool`] drives a pinned BPF hash map through the `bpftool` utility.
//! - [`MemoryStore`] keeps the map in process, for dry runs.
mod apply;
mod bpftool;
pub mod encoding;
mod error;
mod memory;

pub use apply::{ApplyReport, apply};
pub use bpftool::Bpftool;
pub use error::{Error, Operation, Result};
pub use memory::MemoryStore;

use crate::container::{CONTAINER_ID_MAX_LEN, ContainerID};

/// `BPF_F_NO_PREALLOC`: allocate hash map entries on demand.
pub const BPF_F_NO_PREALLOC: u32 = 1;

/// Shape of the published map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSpec {
    pub name: String,
    pub key_size: usize,
    pub value_size: usize,
    pub max_entries: u32,
    pub flags: u32,
}

impl Default for MapSpec {
    fn default() -> Self {
        Self {
            name: "pidmap".to_owned(),
            key_size: std::mem::size_of::<u32>(),
            value_size: CONTAINER_ID_MAX_LEN,
            max_entries: 65536,
            flags: BPF_F_NO_PREALLOC,
        }
    }
}

/// A key-value store the pid mapping is published to.
///
/// Every successful call is visible to readers of the store immediately.
pub trait PidMapStore {
    /// Returns the shape of the map.
    fn spec(&self) -> &MapSpec;

    /// Creates the map, replacing any existing one.
    fn create(&self) -> impl Future<Output = Result<()>> + Send;

    /// Deletes the entry of `pid`.
    fn delete(&self, pid: u32) -> impl Future<Output = Result<()>> + Send;

    /// Inserts or overwrites the entry of `pid`.
    fn upsert(
        &self,
        pid: u32,
        container_id: &ContainerID,
    ) -> impl Future<Output = Result<()>> + Send;
}
