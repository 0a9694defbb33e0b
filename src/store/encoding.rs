//! Binary layout of map entries.
//!
//! Keys are the pid as 4 little-endian bytes. Values are the raw bytes of the
//! container id, zero-padded to the map's fixed value width.

use crate::container::ContainerID;

use super::{Error, Result};

pub fn encode_key(pid: u32) -> [u8; 4] {
    pid.to_le_bytes()
}

/// Encodes a container id as a value of exactly `width` bytes.
///
/// # Errors
///
/// Returns [`Error::ValueTooLong`] if the id is longer than `width`.
pub fn encode_value(container_id: &ContainerID, width: usize) -> Result<Vec<u8>> {
    let raw = container_id.as_bytes();
    if raw.len() > width {
        return Err(Error::ValueTooLong {
            len: raw.len(),
            width,
        });
    }
    let mut value = vec![0u8; width];
    value[..raw.len()].copy_from_slice(raw);
    Ok(value)
}

/// Formats bytes as the space-separated hex arguments `bpftool` expects.
pub fn hex_args(bytes: &[u8]) -> impl Iterator<Item = String> + '_ {
    bytes.iter().map(|b| format!("{b:02x}"))
}
