use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod error;

pub use error::{Error, Result};

/// The maximum allowed length for a [`ContainerID`] in bytes.
///
/// Matches the fixed value width of the published pid map.
pub const CONTAINER_ID_MAX_LEN: usize = 64;

/// A validated container identifier.
///
/// # Examples
///
/// ```
/// # use pidmap::container::ContainerID;
/// let raw_id = "bf4e1697bc0f3fcd6aca1f359853ea2f0ae527ef2b14867f1a2ce3a44bf842e4";
/// let container_id = ContainerID::new(raw_id).unwrap();
/// assert_eq!(container_id.as_ref(), raw_id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// Over-length ids are rejected rather than truncated, so two distinct
    /// containers can never collapse onto the same published value.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyContainerID`] if the input is empty.
    /// - [`Error::ContainerIDTooLong`] if the input exceeds [`CONTAINER_ID_MAX_LEN`] bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pidmap::container::{ContainerID, Error};
    /// let too_long = "a".repeat(65);
    /// assert!(matches!(
    ///     ContainerID::new(&too_long),
    ///     Err(Error::ContainerIDTooLong { len: 65, .. })
    /// ));
    /// ```
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() {
            return Err(Error::EmptyContainerID);
        }
        if src.len() > CONTAINER_ID_MAX_LEN {
            return Err(Error::ContainerIDTooLong {
                id: src.to_owned(),
                len: src.len(),
                max: CONTAINER_ID_MAX_LEN,
            });
        }

        Ok(Self(src.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for ContainerID {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
