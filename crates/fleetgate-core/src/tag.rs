//! Device tags: administrative groupings carrying a naming policy.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An administrative grouping of devices.
///
/// Tags are created and edited elsewhere; the validation engine and the
/// reconciliation jobs only read them. `device_name_regex` is operator
/// supplied and must be treated as untrusted: it is not guaranteed to be a
/// syntactically valid pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceTag {
    #[serde(rename = "id")]
    pub id: Uuid,
    pub name: String,
    pub device_rename_enabled: bool,
    pub device_name_regex: Option<String>,
}

impl DeviceTag {
    /// Creates a tag with a generated id and no naming policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            device_rename_enabled: false,
            device_name_regex: None,
        }
    }
}

impl Default for DeviceTag {
    fn default() -> Self {
        Self::new(String::new())
    }
}
