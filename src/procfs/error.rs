use std::path::PathBuf;

/// Errors that abort a scan of the process table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list processes in `{path}`: {source}")]
    ListProcesses {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
