//! Core domain model and validation rules for fleetgate.
//!
//! Fleetgate lets delegated administrators enroll devices by tag, while batch
//! jobs keep the device inventory consistent with the managed-device
//! directory. This crate holds the pieces both sides share:
//!
//! - The [`Device`] and [`DeviceTag`] records as stored in the record store.
//! - The validation rule set ([`validate_device`], [`validate_import_row`])
//!   producing a structured [`ErrorMap`] rather than failing on the first
//!   violation.
//! - Tag naming policies ([`policy`]): per-tag rename requirement and an
//!   operator-supplied hostname pattern, compiled defensively since the
//!   pattern is data, not code.
//!
//! No I/O happens here; the gateways live in `fleetgate-graph` and
//! `fleetgate-store`.

mod device;
mod error_map;
pub mod policy;
mod tag;
mod validation;

pub use device::{Device, DeviceImportRow, DeviceOs, DeviceStatus, ImportAction};
pub use error_map::ErrorMap;
pub use policy::{CompiledPolicy, PolicyCache, PolicyError};
pub use tag::DeviceTag;
pub use validation::{resolve_tag, validate_device, validate_import_row};
