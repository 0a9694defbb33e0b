use crate::snapshot::{Diff, Snapshot};

use super::{PidMapStore, Result};

/// Number of entries written by a successful [`apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub removed: usize,
    pub upserted: usize,
}

/// Applies a diff to the store: all removals first, then all upserts.
///
/// `published` tracks what the store is believed to hold. Every operation
/// that succeeds is folded into it, so after an error it still describes the
/// partially converged store and the next diff against it re-issues exactly
/// the operations that did not go through.
///
/// An empty diff issues no store calls.
///
/// # Errors
///
/// Each batch stops at its first failing operation; entries applied before it
/// are not rolled back. A failed removal batch does not hold back the upserts.
/// The first error encountered is returned.
pub async fn apply<S>(store: &S, diff: &Diff, published: &mut Snapshot) -> Result<ApplyReport>
where
    S: PidMapStore + ?Sized,
{
    let mut report = ApplyReport::default();
    if diff.is_empty() {
        return Ok(report);
    }

    log::info!(
        "applying pid map diff: +{} -{}",
        diff.to_upsert.len(),
        diff.to_remove.len()
    );

    let removals = remove_all(store, diff, published, &mut report).await;
    let upserts = upsert_all(store, diff, published, &mut report).await;
    removals.and(upserts).map(|()| report)
}

async fn remove_all<S>(
    store: &S,
    diff: &Diff,
    published: &mut Snapshot,
    report: &mut ApplyReport,
) -> Result<()>
where
    S: PidMapStore + ?Sized,
{
    for &pid in diff.to_remove.keys() {
        store.delete(pid).await.map_err(|err| {
            log::error!("failed to remove pid {} from map: {}", pid, err);
            err
        })?;
        published.remove(pid);
        report.removed += 1;
    }
    Ok(())
}

async fn upsert_all<S>(
    store: &S,
    diff: &Diff,
    published: &mut Snapshot,
    report: &mut ApplyReport,
) -> Result<()>
where
    S: PidMapStore + ?Sized,
{
    for (&pid, container_id) in &diff.to_upsert {
        store.upsert(pid, container_id).await.map_err(|err| {
            log::error!(
                "failed to update pid {} (container `{}`) in map: {}",
                pid,
                container_id,
                err
            );
            err
        })?;
        published.insert(pid, container_id.clone());
        report.upserted += 1;
    }
    Ok(())
}
