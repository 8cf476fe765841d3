//! Managed-device listing and lookup.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::GraphClient;
use crate::error::GraphResult;

/// Fields projected from the directory for reconciliation.
const DEVICE_SELECT_FIELDS: &str = "id,manufacturer,model,serialNumber,deviceName";

/// A managed-device entry as the directory reports it.
///
/// Ephemeral read-only projection; never persisted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDevice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
}

impl ManagedDevice {
    /// True when the identity tuple (manufacturer, model, serial number) is
    /// fully populated.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        [&self.manufacturer, &self.model, &self.serial_number]
            .iter()
            .all(|f| f.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

/// The managed-device directory as the reconciliation jobs see it.
#[async_trait]
pub trait ManagedDeviceDirectory: Send + Sync {
    /// Lists every managed device, fully draining pagination before
    /// returning.
    async fn list_managed_devices(&self) -> GraphResult<Vec<ManagedDevice>>;

    /// Finds managed devices matching the identity tuple.
    ///
    /// All three fields participate in the filter. Zero matches is an
    /// expected steady state, not an error.
    async fn find_managed_devices(
        &self,
        manufacturer: &str,
        model: &str,
        serial_number: &str,
    ) -> GraphResult<Vec<ManagedDevice>>;
}

/// Directory gateway over the Graph device-management API.
pub struct IntuneDirectory {
    client: GraphClient,
}

impl IntuneDirectory {
    /// Wraps a Graph client.
    #[must_use]
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    fn devices_url(&self) -> String {
        format!("{}/deviceManagement/managedDevices", self.client.base_url())
    }

    /// Verifies the directory is reachable and the credential is accepted.
    ///
    /// Jobs call this before processing any record; a failure here aborts
    /// the whole run.
    pub async fn test_connection(&self) -> GraphResult<()> {
        let url = format!("{}?$top=1&$select=id", self.devices_url());
        let _: crate::client::ODataResponse<ManagedDevice> = self.client.get(&url).await?;
        Ok(())
    }
}

/// Escapes a value for use inside an `OData` string literal.
fn odata_quote(value: &str) -> String {
    value.replace('\'', "''")
}

#[async_trait]
impl ManagedDeviceDirectory for IntuneDirectory {
    #[instrument(skip(self))]
    async fn list_managed_devices(&self) -> GraphResult<Vec<ManagedDevice>> {
        let url = format!("{}?$select={}", self.devices_url(), DEVICE_SELECT_FIELDS);

        let mut devices = Vec::new();
        self.client
            .get_all_pages(&url, |page: Vec<ManagedDevice>| {
                debug!(count = page.len(), "Received managed-device page");
                devices.extend(page);
            })
            .await?;

        Ok(devices)
    }

    #[instrument(skip(self))]
    async fn find_managed_devices(
        &self,
        manufacturer: &str,
        model: &str,
        serial_number: &str,
    ) -> GraphResult<Vec<ManagedDevice>> {
        let filter = format!(
            "serialNumber eq '{}' and manufacturer eq '{}' and model eq '{}'",
            odata_quote(serial_number),
            odata_quote(manufacturer),
            odata_quote(model),
        );
        let url = format!(
            "{}?$filter={}&$select=deviceName",
            self.devices_url(),
            urlencoding::encode(&filter)
        );

        let mut devices = Vec::new();
        self.client
            .get_all_pages(&url, |page: Vec<ManagedDevice>| devices.extend(page))
            .await?;

        Ok(devices)
    }
}
