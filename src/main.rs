/// Entry point for the pidmap daemon.
///
/// Keeps a pinned BPF hash map from pid to container id in sync with the
/// processes running on the host. Logging is configured through `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if initialization fails (e.g., invalid configuration or
/// the map cannot be created).
///
/// # Examples
///
/// ```bash
/// RUST_LOG=info HOSTPROC=/host/proc cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    pidmap::run().await
}
