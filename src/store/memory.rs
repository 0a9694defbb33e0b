use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::container::ContainerID;

use super::encoding::{encode_key, encode_value};
use super::{Error, MapSpec, PidMapStore, Result};

/// An in-process pid map with the same layout and capacity rules as the
/// kernel map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    spec: MapSpec,
    entries: DashMap<[u8; 4], Vec<u8>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(spec: MapSpec) -> Self {
        Self {
            spec,
            entries: DashMap::default(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the encoded value stored for `pid`.
    pub fn get(&self, pid: u32) -> Option<Vec<u8>> {
        self.entries
            .get(&encode_key(pid))
            .map(|entry| entry.value().clone())
    }

    /// Returns all entries, decoded by key.
    pub fn entries(&self) -> HashMap<u32, Vec<u8>> {
        self.entries
            .iter()
            .map(|entry| (u32::from_le_bytes(*entry.key()), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of store operations issued so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PidMapStore for MemoryStore {
    fn spec(&self) -> &MapSpec {
        &self.spec
    }

    async fn create(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.entries.clear();
        Ok(())
    }

    async fn delete(&self, pid: u32) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.entries.remove(&encode_key(pid));
        Ok(())
    }

    async fn upsert(&self, pid: u32, container_id: &ContainerID) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let key = encode_key(pid);
        let value = encode_value(container_id, self.spec.value_size)?;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.spec.max_entries as usize
        {
            return Err(Error::CapacityExceeded {
                pid,
                max_entries: self.spec.max_entries,
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ContainerID {
        ContainerID::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_delete() {
        let store = MemoryStore::new(MapSpec::default());
        store.upsert(42, &id("abc")).await.unwrap();

        let value = store.get(42).unwrap();
        assert_eq!(value.len(), 64);
        assert_eq!(&value[..3], b"abc");
        assert!(value[3..].iter().all(|b| *b == 0));

        store.delete(42).await.unwrap();
        assert!(store.is_empty());
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = MemoryStore::new(MapSpec::default());
        store.upsert(1, &id("a")).await.unwrap();
        let once = store.entries();
        store.upsert(1, &id("a")).await.unwrap();
        assert_eq!(store.entries(), once);
    }

    #[tokio::test]
    async fn test_capacity_is_enforced_for_new_keys_only() {
        let store = MemoryStore::new(MapSpec {
            max_entries: 2,
            ..MapSpec::default()
        });
        store.upsert(1, &id("a")).await.unwrap();
        store.upsert(2, &id("b")).await.unwrap();
        store.upsert(2, &id("c")).await.unwrap();

        let err = store.upsert(3, &id("d")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded {
                pid: 3,
                max_entries: 2
            }
        ));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_create_resets_entries() {
        let store = MemoryStore::new(MapSpec::default());
        store.upsert(1, &id("a")).await.unwrap();
        store.create().await.unwrap();
        assert!(store.is_empty());
    }
}
