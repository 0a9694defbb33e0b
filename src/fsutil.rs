use std::io;
use std::path::{Path, PathBuf};

/// Error that occurs when reading a file fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to read file `{path}`: {source}")]
pub struct FileReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Reads the whole file at the given path into a string.
///
/// Invalid UTF-8 sequences are replaced with `U+FFFD`, so one bad byte does
/// not make the rest of the file unreadable.
///
/// # Errors
///
/// Returns a [`FileReadError`] if the file cannot be opened or read.
///
/// # Example
/// ```no_run
/// # use pidmap::fsutil;
/// let contents = fsutil::read_to_string_lossy("/proc/self/cgroup")?;
/// # Ok::<(), fsutil::FileReadError>(())
/// ```
pub fn read_to_string_lossy(path: impl AsRef<Path>) -> Result<String, FileReadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| FileReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
