//! Batch job: fill empty `PreferredHostname` values in the record store from
//! the managed-device directory's configured device names.
//!
//! No arguments; all configuration comes from the environment. Exits 1 when
//! configuration is incomplete or either external system is unreachable.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleetgate_sync::{JobEnvironment, SyncDeviceNamesJob};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let environment = match JobEnvironment::from_env() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let store = match environment.build_store() {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to construct the record-store gateway");
            std::process::exit(1);
        }
    };
    if let Err(e) = store.test_connection().await {
        error!(error = %e, "Record store is unreachable");
        std::process::exit(1);
    }

    let directory = match environment.build_directory() {
        Ok(directory) => directory,
        Err(e) => {
            error!(error = %e, "Failed to construct the directory gateway");
            std::process::exit(1);
        }
    };
    if let Err(e) = directory.test_connection().await {
        error!(error = %e, "Managed-device directory is unreachable");
        std::process::exit(1);
    }

    let job = SyncDeviceNamesJob::new(store, directory);
    match job.run().await {
        Ok(counters) => info!(%counters, "Device name sync finished"),
        Err(e) => {
            error!(error = %e, "Device name sync failed");
            std::process::exit(1);
        }
    }
}
