//! Record-store trait seam and patch primitives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fleetgate_core::{Device, DeviceTag};

use crate::error::StoreResult;

/// Partial-patch operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Adds the field, creating it when absent.
    Add,
    /// Replaces an existing field value.
    Replace,
}

/// A single `(op, path, value)` patch operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: serde_json::Value,
}

impl PatchOperation {
    /// Add operation for a field path.
    #[must_use]
    pub fn add(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: value.into(),
        }
    }

    /// Replace operation for a field path.
    #[must_use]
    pub fn replace(path: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Projection used when sweeping all devices: identity fields are lowered
/// server-side so hostname enforcement can match without re-normalizing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceSummary {
    #[serde(rename = "id")]
    pub id: Uuid,
    pub preferred_hostname: String,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub tags: Vec<String>,
}

/// The record store as the validation engine and jobs see it.
///
/// Queries fully drain server pagination before returning; patches are one
/// round trip per record with no batching contract.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Finds the first device matching the identity tuple, comparing each
    /// field case-insensitively after trimming.
    async fn find_device(
        &self,
        make: &str,
        model: &str,
        serial_number: &str,
    ) -> StoreResult<Option<Device>>;

    /// Lists a summary projection of every device record.
    async fn list_device_summaries(&self) -> StoreResult<Vec<DeviceSummary>>;

    /// Lists every device tag.
    async fn list_tags(&self) -> StoreResult<Vec<DeviceTag>>;

    /// Applies a partial patch to one device document.
    async fn patch_device(
        &self,
        id: &str,
        partition_key: &str,
        operations: &[PatchOperation],
    ) -> StoreResult<()>;
}
