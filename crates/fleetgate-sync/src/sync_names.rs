//! Variant A: fill missing preferred hostnames from the directory.

use tracing::{error, info, warn};

use fleetgate_graph::ManagedDeviceDirectory;
use fleetgate_store::{PatchOperation, RecordStore};

use crate::counters::RunCounters;
use crate::error::SyncResult;

/// Copies the directory's configured device name into any matching store
/// record whose `PreferredHostname` is still empty.
///
/// Matching is by case-insensitive trimmed equality on
/// (Make, Model, SerialNumber). Records that already carry a hostname are
/// left untouched, which makes re-runs no-ops.
pub struct SyncDeviceNamesJob<S, D> {
    store: S,
    directory: D,
}

impl<S, D> SyncDeviceNamesJob<S, D>
where
    S: RecordStore,
    D: ManagedDeviceDirectory,
{
    /// Creates the job over already-connected gateways.
    pub fn new(store: S, directory: D) -> Self {
        Self { store, directory }
    }

    /// Runs the job to completion and returns the run counters.
    ///
    /// The directory listing is fully drained before any record is acted on.
    /// A failure of either initial listing aborts the run; per-record
    /// failures are logged and the loop continues.
    pub async fn run(&self) -> SyncResult<RunCounters> {
        info!("Retrieving all managed devices from the directory");
        let managed_devices = self.directory.list_managed_devices().await?;
        info!(
            count = managed_devices.len(),
            "Retrieved managed devices from the directory"
        );

        let mut counters = RunCounters::new();

        for managed in &managed_devices {
            if !managed.has_identity() {
                warn!(id = ?managed.id, "Skipping directory entry - incomplete identity tuple");
                counters.skipped += 1;
                continue;
            }
            let device_name = match managed.device_name.as_deref() {
                Some(name) if !name.is_empty() => name,
                _ => {
                    warn!(id = ?managed.id, "Skipping directory entry - no device name");
                    counters.skipped += 1;
                    continue;
                }
            };

            let manufacturer = managed.manufacturer.as_deref().unwrap_or_default();
            let model = managed.model.as_deref().unwrap_or_default();
            let serial = managed.serial_number.as_deref().unwrap_or_default();

            match self.process_entry(manufacturer, model, serial, device_name).await {
                Ok(outcome) => match outcome {
                    EntryOutcome::Updated => counters.updated += 1,
                    EntryOutcome::AlreadySet => counters.skipped += 1,
                    EntryOutcome::NotFound => counters.not_found += 1,
                },
                Err(e) => {
                    error!(
                        manufacturer,
                        model,
                        serial,
                        error = %e,
                        "Error processing directory entry, continuing"
                    );
                }
            }
        }

        info!(
            updated = counters.updated,
            not_found = counters.not_found,
            skipped = counters.skipped,
            "Sync completed"
        );
        Ok(counters)
    }

    async fn process_entry(
        &self,
        manufacturer: &str,
        model: &str,
        serial: &str,
        device_name: &str,
    ) -> SyncResult<EntryOutcome> {
        let Some(device) = self.store.find_device(manufacturer, model, serial).await? else {
            warn!(
                manufacturer,
                model, serial, "No matching device record in the store"
            );
            return Ok(EntryOutcome::NotFound);
        };

        if !device.preferred_hostname.is_empty() {
            info!(
                device_id = %device.id,
                hostname = %device.preferred_hostname,
                "Device already has a preferred hostname, skipping"
            );
            return Ok(EntryOutcome::AlreadySet);
        }

        info!(device_id = %device.id, hostname = device_name, "Filling preferred hostname");
        self.store
            .patch_device(
                &device.id.to_string(),
                &device.partition_key,
                &[PatchOperation::add("/PreferredHostname", device_name)],
            )
            .await?;

        Ok(EntryOutcome::Updated)
    }
}

enum EntryOutcome {
    Updated,
    AlreadySet,
    NotFound,
}
