//! Variant B: enforce the directory's device name as hostname-of-record.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use tracing::{error, info, warn};

use fleetgate_graph::ManagedDeviceDirectory;
use fleetgate_store::{DeviceSummary, PatchOperation, RecordStore};

use crate::counters::RunCounters;
use crate::error::SyncResult;
use crate::report::{ExceptionReport, ExceptionRow};

/// Result of one enforcement run.
#[derive(Debug)]
pub struct EnforceOutcome {
    pub counters: RunCounters,
    pub exceptions: ExceptionReport,
    /// Where the exception artifact was written.
    pub report_path: PathBuf,
}

/// Overwrites each store record's `PreferredHostname` with the directory's
/// configured device name whenever the two differ.
///
/// Processing is two sequential passes over explicit queues: a check pass
/// that matches every device against the directory, then an update pass that
/// patches the records found to differ. The exception report reflects only
/// match-phase failures; a failed patch is logged and dropped for this run.
pub struct EnforceHostnamesJob<S, D> {
    store: S,
    directory: D,
    report_dir: PathBuf,
}

impl<S, D> EnforceHostnamesJob<S, D>
where
    S: RecordStore,
    D: ManagedDeviceDirectory,
{
    /// Creates the job; the exception artifact is written into `report_dir`.
    pub fn new(store: S, directory: D, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            directory,
            report_dir: report_dir.into(),
        }
    }

    /// Runs the job to completion.
    ///
    /// Both store queries happen up front; a failure there aborts the run
    /// before any directory lookup. Per-device lookup and patch failures are
    /// absorbed and the queues keep draining.
    pub async fn run(&self) -> SyncResult<EnforceOutcome> {
        let mut to_check: VecDeque<DeviceSummary> =
            self.store.list_device_summaries().await?.into();
        info!(count = to_check.len(), "Queued device records for hostname check");

        let tag_names: HashMap<String, String> = self
            .store
            .list_tags()
            .await?
            .into_iter()
            .map(|tag| (tag.id.to_string(), tag.name))
            .collect();
        info!(count = tag_names.len(), "Loaded tag names for report labeling");

        let mut counters = RunCounters::new();
        let mut exceptions = ExceptionReport::new();
        let mut to_update: VecDeque<DeviceSummary> = VecDeque::new();

        // Check pass: match every record against the directory.
        while let Some(mut device) = to_check.pop_front() {
            let matches = match self
                .directory
                .find_managed_devices(&device.make, &device.model, &device.serial_number)
                .await
            {
                Ok(matches) => matches,
                Err(e) => {
                    error!(
                        device_id = %device.id,
                        error = %e,
                        "Directory lookup failed, recording exception and continuing"
                    );
                    exceptions.push(self.exception_row(&device, &tag_names));
                    continue;
                }
            };

            let Some(first) = matches.first() else {
                warn!(
                    make = %device.make,
                    model = %device.model,
                    serial = %device.serial_number,
                    "Device not enrolled in the directory"
                );
                counters.not_found += 1;
                exceptions.push(self.exception_row(&device, &tag_names));
                continue;
            };

            let directory_hostname = first.device_name.clone().unwrap_or_default();
            // Exact comparison: hostname case is meaningful to the directory.
            if directory_hostname == device.preferred_hostname {
                counters.skipped += 1;
                continue;
            }

            device.preferred_hostname = directory_hostname;
            to_update.push_back(device);
        }

        // Update pass: patch the records that differ.
        while let Some(device) = to_update.pop_front() {
            let id = device.id.to_string();
            match self
                .store
                .patch_device(
                    &id,
                    &id,
                    &[PatchOperation::replace(
                        "/PreferredHostname",
                        device.preferred_hostname.as_str(),
                    )],
                )
                .await
            {
                Ok(()) => {
                    counters.updated += 1;
                    info!(
                        device_id = %id,
                        hostname = %device.preferred_hostname,
                        "Updated preferred hostname"
                    );
                }
                Err(e) => {
                    // Left unupdated for this run; the next run retries.
                    error!(device_id = %id, error = %e, "Failed to patch preferred hostname");
                }
            }
        }

        let report_path = exceptions.persist(&self.report_dir)?;
        info!(
            path = %report_path.display(),
            unmatched = exceptions.len(),
            "Wrote exception report"
        );
        for row in exceptions.rows() {
            info!(
                tag = %row.tag,
                make = %row.make,
                model = %row.model,
                serial = %row.serial_number,
                "Unenrolled device"
            );
        }
        info!(updated = counters.updated, "Enforcement completed");

        Ok(EnforceOutcome {
            counters,
            exceptions,
            report_path,
        })
    }

    fn exception_row(
        &self,
        device: &DeviceSummary,
        tag_names: &HashMap<String, String>,
    ) -> ExceptionRow {
        // Label with the tag name when it resolves, otherwise the raw id.
        let tag = device
            .tags
            .first()
            .map(|id| tag_names.get(id).cloned().unwrap_or_else(|| id.clone()))
            .unwrap_or_default();

        ExceptionRow::unmatched(
            tag,
            device.make.as_str(),
            device.model.as_str(),
            device.serial_number.as_str(),
        )
    }
}
