//! Lifecycle of the background reconciliation loop.
//!
//! Ticks run strictly one after another: the interval is waited out after a
//! tick has finished, so a slow tick delays the next one instead of
//! overlapping with it. A stop request is only observed between ticks.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::ResultOkLogExt;
use crate::procfs::ProcessTable;
use crate::reconciler::{Reconciler, TickOutcome};
use crate::store::{self, PidMapStore};

/// Default delay between two reconciliation ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reconciliation loop is already running")]
    AlreadyRunning,
    #[error("failed to create pid map: {0}")]
    CreateStore(#[source] store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
enum State {
    Stopped,
    Running {
        stop_tx: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
}

/// Drives a [`Reconciler`] on a fixed interval between [`start`] and [`stop`].
///
/// Dropping a running scheduler also ends the loop, after its current tick.
///
/// [`start`]: Scheduler::start
/// [`stop`]: Scheduler::stop
#[derive(Debug)]
pub struct Scheduler<T, S> {
    table: Arc<T>,
    store: Arc<S>,
    interval: Duration,
    state: State,
}

impl<T, S> Scheduler<T, S>
where
    T: ProcessTable + Send + Sync + 'static,
    S: PidMapStore + Send + Sync + 'static,
{
    pub fn new(table: Arc<T>, store: Arc<S>, interval: Duration) -> Self {
        Self {
            table,
            store,
            interval,
            state: State::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Creates the store and starts the reconciliation loop.
    ///
    /// The loop starts from an empty baseline, matching the freshly created
    /// store, so the first tick publishes every containerized process.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyRunning`] if the loop was started before and not stopped.
    /// - [`Error::CreateStore`] if the store cannot be created; nothing is started.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }

        self.store.create().await.map_err(Error::CreateStore)?;
        log::info!("created pid map `{}`", self.store.spec().name);

        let (stop_tx, stop_rx) = watch::channel(false);
        let reconciler = Reconciler::new(Arc::clone(&self.table), Arc::clone(&self.store));
        let handle = tokio::spawn(reconcile_loop(reconciler, self.interval, stop_rx));
        self.state = State::Running { stop_tx, handle };
        log::info!(
            "started reconciliation loop (interval {}ms)",
            self.interval.as_millis()
        );

        Ok(())
    }

    /// Stops the reconciliation loop.
    ///
    /// Waits for a tick that is already in progress to finish. Does nothing
    /// if the loop is not running.
    pub async fn stop(&mut self) {
        let State::Running { stop_tx, handle } = std::mem::replace(&mut self.state, State::Stopped)
        else {
            return;
        };

        // The loop also ends if it has already gone and dropped the receiver.
        let _ = stop_tx.send(true);
        if let Err(err) = handle.await {
            log::error!("reconciliation loop ended abnormally: {}", err);
        }
        log::info!("stopped reconciliation loop");
    }
}

async fn reconcile_loop<T, S>(
    mut reconciler: Reconciler<T, S>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) where
    T: ProcessTable + Send + Sync + 'static,
    S: PidMapStore + Send + Sync,
{
    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        match reconciler.tick().await.ok_log() {
            Some(TickOutcome::Applied(report)) => log::debug!(
                "pid map converged: {} removed, {} upserted, {} published",
                report.removed,
                report.upserted,
                reconciler.published().len()
            ),
            Some(TickOutcome::Unchanged) => log::trace!("pid map unchanged"),
            None => {}
        }
    }
}
