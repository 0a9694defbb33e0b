use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors reported by a pid map store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to remove stale pin `{path}`: {source}")]
    RemovePin {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run `{program}` for map {op}: {source}")]
    Spawn {
        program: PathBuf,
        op: Operation,
        #[source]
        source: std::io::Error,
    },
    #[error("map {op} failed ({status}): {output}")]
    Command {
        op: Operation,
        status: ExitStatus,
        output: String,
    },
    #[error("value of {len} bytes does not fit the map's {width} byte value width")]
    ValueTooLong { len: usize, width: usize },
    #[error("map is full ({max_entries} entries), cannot insert pid {pid}")]
    CapacityExceeded { pid: u32, max_entries: u32 },
}

/// A single kind of store operation, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
    Upsert,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Upsert => "update",
        };
        write!(f, "{name}")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
