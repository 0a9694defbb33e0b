//! One reconciliation tick: scan the process table, diff against what was
//! published last, apply the difference to the store.
use std::sync::Arc;

use crate::procfs::{self, ProcessTable};
use crate::snapshot::{Diff, Snapshot, build_snapshot};
use crate::store::{self, ApplyReport, PidMapStore};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to scan process table: {0}")]
    Scan(#[from] procfs::Error),
    #[error("snapshot task failed: {0}")]
    SnapshotTask(#[from] tokio::task::JoinError),
    #[error("failed to publish pid map: {0}")]
    Apply(#[from] store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What a successful tick did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing changed; the store was not touched.
    Unchanged,
    Applied(ApplyReport),
}

/// Keeps a store converged to the container membership of live processes.
///
/// Owns the baseline of the next diff: the snapshot it believes the store
/// holds. It starts empty, matching a freshly created store.
#[derive(Debug)]
pub struct Reconciler<T, S> {
    table: Arc<T>,
    store: Arc<S>,
    published: Snapshot,
}

impl<T, S> Reconciler<T, S>
where
    T: ProcessTable + Send + Sync + 'static,
    S: PidMapStore + Send + Sync,
{
    pub fn new(table: Arc<T>, store: Arc<S>) -> Self {
        Self {
            table,
            store,
            published: Snapshot::default(),
        }
    }

    /// The snapshot the store is believed to hold.
    pub fn published(&self) -> &Snapshot {
        &self.published
    }

    /// Runs one scan, diff and apply cycle.
    ///
    /// The scan reads the whole process table and runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// - [`Error::Scan`] if the process table cannot be listed. The store and
    ///   the baseline are left untouched.
    /// - [`Error::Apply`] if a store operation fails. The baseline then
    ///   reflects the operations that did succeed, so the next tick retries
    ///   the rest. A removal that keeps failing does not stop new or changed
    ///   entries from being published.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        let table = Arc::clone(&self.table);
        let next = tokio::task::spawn_blocking(move || build_snapshot(table.as_ref())).await??;

        let diff = Diff::between(&self.published, &next);
        if diff.is_empty() {
            return Ok(TickOutcome::Unchanged);
        }

        let report = store::apply(self.store.as_ref(), &diff, &mut self.published).await?;
        self.published = next;
        Ok(TickOutcome::Applied(report))
    }
}
