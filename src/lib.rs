//! pidmap: publishes which container every process belongs to.
//!
//! Once per interval the process table is scanned, each process's container
//! id is recovered from its cgroup membership, and the difference to the
//! previous scan is written into a pinned BPF hash map keyed by pid, where
//! kernel-side programs can look it up.
use std::sync::Arc;
use std::time::Duration;

use config::{Config, StoreKind};
use procfs::ProcFs;
use scheduler::Scheduler;
use store::{Bpftool, MapSpec, MemoryStore, PidMapStore};

pub mod cgroup;
pub mod config;
pub mod container;
pub mod error;
pub mod fsutil;
pub mod procfs;
pub mod reconciler;
pub mod scheduler;
pub mod snapshot;
pub mod store;

// Running inside a container requires the host's procfs to be mounted (and
// pointed to with `HOSTPROC`), otherwise only the container's own processes
// are visible. Creating and updating the BPF map needs `CAP_BPF` (or
// `CAP_SYS_ADMIN`) and a mounted bpffs at the pin path's parent.

/// Runs the pid map daemon until interrupted.
///
/// Reads the [`Config`] from the environment, creates the map, reconciles it
/// on the configured interval and stops after the current tick on `SIGINT`.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid configuration values.
/// - Failure to create the map (e.g., `bpftool` missing or lacking privileges).
/// - Failure to install the interrupt handler.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    log::debug!("Configuration: {:?}", config);

    let table = Arc::new(ProcFs::new(&config.proc_root));
    log::info!("Reading processes from `{}`", table.root().display());
    match config.store {
        StoreKind::Bpftool => {
            let store = Bpftool::new(&config.bpftool, &config.pin_path, MapSpec::default());
            log::info!("Publishing to pinned map `{}`", store.pin_path().display());
            serve(table, Arc::new(store), config.interval).await
        }
        StoreKind::Memory => {
            log::warn!("Using in-memory pid map, nothing is published to the kernel");
            let store = MemoryStore::new(MapSpec::default());
            serve(table, Arc::new(store), config.interval).await
        }
    }
}

async fn serve<S>(
    table: Arc<ProcFs>,
    store: Arc<S>,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: PidMapStore + Send + Sync + 'static,
{
    let mut scheduler = Scheduler::new(table, store, interval);
    scheduler.start().await?;

    tokio::signal::ctrl_c().await?;
    log::info!("Received interrupt, stopping");
    scheduler.stop().await;

    Ok(())
}
