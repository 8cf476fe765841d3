//! Device reconciliation jobs for fleetgate.
//!
//! Two batch jobs keep the record store's `PreferredHostname` field
//! consistent with the managed-device directory:
//!
//! - [`SyncDeviceNamesJob`] fills empty preferred hostnames from the
//!   directory's configured device names.
//! - [`EnforceHostnamesJob`] treats the directory's device name as
//!   authoritative, overwriting stored hostnames that differ and reporting
//!   devices it cannot match in the directory.
//!
//! Both jobs are idempotent: a re-run with no underlying change performs zero
//! updates. Per-record failures are logged and counted but never abort a run;
//! only a failure to reach either external system at startup is fatal.

mod counters;
mod enforce;
mod env;
mod error;
mod report;
mod sync_names;

pub use counters::RunCounters;
pub use enforce::{EnforceHostnamesJob, EnforceOutcome};
pub use env::{EnvError, JobEnvironment};
pub use error::{SyncError, SyncResult};
pub use report::{ExceptionReport, ExceptionRow, REPORT_FILE_NAME};
pub use sync_names::SyncDeviceNamesJob;
