//! In-memory fake gateways for exercising the reconciliation jobs.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fleetgate_core::{Device, DeviceTag};
use fleetgate_graph::{GraphError, GraphResult, ManagedDevice, ManagedDeviceDirectory};
use fleetgate_store::{DeviceSummary, PatchOp, PatchOperation, RecordStore, StoreError, StoreResult};

/// Shared-state fake record store. Patches mutate the underlying devices so
/// repeated job runs observe their own writes.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    devices: Vec<Device>,
    tags: Vec<DeviceTag>,
    fail_patch_ids: HashSet<String>,
    patch_count: u32,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&self, device: Device) {
        self.state.lock().unwrap().devices.push(device);
    }

    pub fn add_tag(&self, tag: DeviceTag) {
        self.state.lock().unwrap().tags.push(tag);
    }

    /// Makes every patch against the given record id fail.
    pub fn fail_patches_for(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_patch_ids
            .insert(id.to_string());
    }

    pub fn hostname_of(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .find(|d| d.id.to_string() == id)
            .map(|d| d.preferred_hostname.clone())
    }

    pub fn patch_count(&self) -> u32 {
        self.state.lock().unwrap().patch_count
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn find_device(
        &self,
        make: &str,
        model: &str,
        serial_number: &str,
    ) -> StoreResult<Option<Device>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .devices
            .iter()
            .find(|d| {
                d.make.trim().eq_ignore_ascii_case(make.trim())
                    && d.model.trim().eq_ignore_ascii_case(model.trim())
                    && d.serial_number
                        .trim()
                        .eq_ignore_ascii_case(serial_number.trim())
            })
            .cloned())
    }

    async fn list_device_summaries(&self) -> StoreResult<Vec<DeviceSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .devices
            .iter()
            .map(|d| DeviceSummary {
                id: d.id,
                preferred_hostname: d.preferred_hostname.clone(),
                make: d.make.to_lowercase(),
                model: d.model.to_lowercase(),
                serial_number: d.serial_number.to_lowercase(),
                tags: d.tags.clone(),
            })
            .collect())
    }

    async fn list_tags(&self) -> StoreResult<Vec<DeviceTag>> {
        Ok(self.state.lock().unwrap().tags.clone())
    }

    async fn patch_device(
        &self,
        id: &str,
        _partition_key: &str,
        operations: &[PatchOperation],
    ) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_patch_ids.contains(id) {
            return Err(StoreError::Api {
                status: 500,
                message: "injected patch failure".to_string(),
            });
        }

        let device = state
            .devices
            .iter_mut()
            .find(|d| d.id.to_string() == id)
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("no document {id}"),
            })?;

        for op in operations {
            assert!(matches!(op.op, PatchOp::Add | PatchOp::Replace));
            assert_eq!(op.path, "/PreferredHostname");
            device.preferred_hostname = op.value.as_str().unwrap_or_default().to_string();
        }
        state.patch_count += 1;
        Ok(())
    }
}

/// Fake managed-device directory with injectable lookup failures.
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

#[derive(Default)]
struct DirectoryState {
    entries: Vec<ManagedDevice>,
    fail_serials: HashSet<String>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&self, entry: ManagedDevice) {
        self.state.lock().unwrap().entries.push(entry);
    }

    /// Makes lookups for the given serial number fail.
    pub fn fail_lookups_for(&self, serial: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_serials
            .insert(serial.to_lowercase());
    }
}

pub fn managed_entry(manufacturer: &str, model: &str, serial: &str, name: &str) -> ManagedDevice {
    ManagedDevice {
        id: Some(format!("md-{serial}")),
        manufacturer: Some(manufacturer.to_string()),
        model: Some(model.to_string()),
        serial_number: Some(serial.to_string()),
        device_name: Some(name.to_string()),
    }
}

#[async_trait]
impl ManagedDeviceDirectory for FakeDirectory {
    async fn list_managed_devices(&self) -> GraphResult<Vec<ManagedDevice>> {
        Ok(self.state.lock().unwrap().entries.clone())
    }

    async fn find_managed_devices(
        &self,
        manufacturer: &str,
        model: &str,
        serial_number: &str,
    ) -> GraphResult<Vec<ManagedDevice>> {
        let state = self.state.lock().unwrap();
        if state.fail_serials.contains(&serial_number.to_lowercase()) {
            return Err(GraphError::Api {
                code: "ServiceUnavailable".to_string(),
                message: "injected lookup failure".to_string(),
            });
        }

        // Directory-side filters compare case-insensitively.
        Ok(state
            .entries
            .iter()
            .filter(|e| {
                field_eq(&e.manufacturer, manufacturer)
                    && field_eq(&e.model, model)
                    && field_eq(&e.serial_number, serial_number)
            })
            .cloned()
            .collect())
    }
}

fn field_eq(field: &Option<String>, expected: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case(expected))
}

/// A store device with the identity tuple set.
pub fn store_device(make: &str, model: &str, serial: &str, hostname: &str) -> Device {
    let mut device = Device::new();
    device.make = make.to_string();
    device.model = model.to_string();
    device.serial_number = serial.to_string();
    device.preferred_hostname = hostname.to_string();
    device
}
