//! Device records as stored in the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operating system reported for a device.
///
/// Stored as an integer in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeviceOs {
    Windows,
    MacOs,
    Linux,
    Unknown,
}

impl From<DeviceOs> for u8 {
    fn from(os: DeviceOs) -> Self {
        match os {
            DeviceOs::Windows => 0,
            DeviceOs::MacOs => 1,
            DeviceOs::Linux => 2,
            DeviceOs::Unknown => 3,
        }
    }
}

impl TryFrom<u8> for DeviceOs {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Windows),
            1 => Ok(Self::MacOs),
            2 => Ok(Self::Linux),
            3 => Ok(Self::Unknown),
            other => Err(format!("unknown DeviceOs discriminant {other}")),
        }
    }
}

impl std::fmt::Display for DeviceOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::MacOs => write!(f, "macOS"),
            Self::Linux => write!(f, "Linux"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Lifecycle state of a device record.
///
/// Added when an administrator creates the record, Synced once the corporate
/// identifier has been pushed to the directory, MarkedForDeletion when queued
/// for removal. Stored as an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeviceStatus {
    #[default]
    Added,
    Synced,
    MarkedForDeletion,
}

impl From<DeviceStatus> for u8 {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Added => 0,
            DeviceStatus::Synced => 1,
            DeviceStatus::MarkedForDeletion => 2,
        }
    }
}

impl TryFrom<u8> for DeviceStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Added),
            1 => Ok(Self::Synced),
            2 => Ok(Self::MarkedForDeletion),
            other => Err(format!("unknown DeviceStatus discriminant {other}")),
        }
    }
}

/// A device record owned by the record store.
///
/// `(Make, Model, SerialNumber)` is the natural key used for matching against
/// the managed-device directory. It is not declared unique in storage, so
/// consumers must tolerate zero or multiple matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Device {
    #[serde(rename = "id")]
    pub id: Uuid,
    pub partition_key: String,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub preferred_hostname: String,
    #[serde(rename = "OS")]
    pub os: Option<DeviceOs>,
    /// Tag ids. Exactly one is valid; zero or multiple is a validation error.
    pub tags: Vec<String>,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub status: DeviceStatus,
    pub corporate_identity: String,
    #[serde(rename = "CorporateIdentityID")]
    pub corporate_identity_id: String,
    pub last_corp_identity_sync: Option<DateTime<Utc>>,
    pub added_by: Option<String>,
    #[serde(rename = "ModifiedUTC")]
    pub modified_utc: DateTime<Utc>,
    #[serde(rename = "MarkedToDeleteUTC")]
    pub marked_to_delete_utc: Option<DateTime<Utc>>,
}

impl Device {
    /// Creates a fresh device record with a generated id.
    #[must_use]
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            partition_key: id.to_string(),
            make: String::new(),
            model: String::new(),
            serial_number: String::new(),
            preferred_hostname: String::new(),
            os: None,
            tags: Vec::new(),
            record_type: "Device".to_string(),
            status: DeviceStatus::Added,
            corporate_identity: String::new(),
            corporate_identity_id: String::new(),
            last_corp_identity_sync: None,
            added_by: None,
            modified_utc: Utc::now(),
            marked_to_delete_utc: None,
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

/// Action requested for a bulk-imported row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    #[default]
    Add,
    Remove,
}

/// A transient candidate row from bulk import.
///
/// Carries the caller-selected tags directly instead of tag ids; validated by
/// building an equivalent [`Device`] and running the same rule set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceImportRow {
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub preferred_hostname: String,
    #[serde(rename = "OS")]
    pub os: Option<DeviceOs>,
    pub action: ImportAction,
}
