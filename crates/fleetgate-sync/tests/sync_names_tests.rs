mod common;

use common::{managed_entry, store_device, FakeDirectory, FakeStore};
use fleetgate_sync::SyncDeviceNamesJob;

#[tokio::test]
async fn fills_empty_hostname_from_directory_name() {
    let store = FakeStore::new();
    let device = store_device("Acme", "X1", "SN1", "");
    let id = device.id.to_string();
    store.add_device(device);

    let directory = FakeDirectory::new();
    directory.add_entry(managed_entry("Acme", "X1", "SN1", "HOST-1"));

    let job = SyncDeviceNamesJob::new(store.clone(), directory);
    let counters = job.run().await.unwrap();

    assert_eq!(counters.updated, 1);
    assert_eq!(counters.not_found, 0);
    assert_eq!(store.hostname_of(&id).as_deref(), Some("HOST-1"));
}

#[tokio::test]
async fn matches_identity_case_insensitively_with_whitespace() {
    let store = FakeStore::new();
    let device = store_device("  acme  ", "x1", " sn1 ", "");
    let id = device.id.to_string();
    store.add_device(device);

    let directory = FakeDirectory::new();
    directory.add_entry(managed_entry("ACME", "X1", "SN1", "HOST-1"));

    let job = SyncDeviceNamesJob::new(store.clone(), directory);
    let counters = job.run().await.unwrap();

    assert_eq!(counters.updated, 1);
    assert_eq!(store.hostname_of(&id).as_deref(), Some("HOST-1"));
}

#[tokio::test]
async fn leaves_existing_hostname_untouched() {
    let store = FakeStore::new();
    let device = store_device("Acme", "X1", "SN1", "KEEP-ME");
    let id = device.id.to_string();
    store.add_device(device);

    let directory = FakeDirectory::new();
    directory.add_entry(managed_entry("Acme", "X1", "SN1", "HOST-1"));

    let job = SyncDeviceNamesJob::new(store.clone(), directory);
    let counters = job.run().await.unwrap();

    assert_eq!(counters.updated, 0);
    assert_eq!(counters.skipped, 1);
    assert_eq!(store.hostname_of(&id).as_deref(), Some("KEEP-ME"));
}

#[tokio::test]
async fn rerun_performs_no_further_updates() {
    let store = FakeStore::new();
    store.add_device(store_device("Acme", "X1", "SN1", ""));

    let directory = FakeDirectory::new();
    directory.add_entry(managed_entry("Acme", "X1", "SN1", "HOST-1"));

    let job = SyncDeviceNamesJob::new(store.clone(), directory);
    let first = job.run().await.unwrap();
    let second = job.run().await.unwrap();

    assert_eq!(first.updated, 1);
    assert_eq!(second.updated, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(store.patch_count(), 1);
}

#[tokio::test]
async fn skips_entries_with_incomplete_identity_or_missing_name() {
    let store = FakeStore::new();
    store.add_device(store_device("Acme", "X1", "SN1", ""));

    let directory = FakeDirectory::new();
    // Missing manufacturer.
    let mut incomplete = managed_entry("", "X1", "SN0", "HOST-0");
    incomplete.manufacturer = None;
    directory.add_entry(incomplete);
    // No configured name.
    let mut unnamed = managed_entry("Acme", "X1", "SN1", "");
    unnamed.device_name = None;
    directory.add_entry(unnamed);

    let job = SyncDeviceNamesJob::new(store.clone(), directory);
    let counters = job.run().await.unwrap();

    assert_eq!(counters.updated, 0);
    assert_eq!(counters.skipped, 2);
    assert_eq!(store.patch_count(), 0);
}

#[tokio::test]
async fn counts_entries_with_no_matching_record() {
    let store = FakeStore::new();

    let directory = FakeDirectory::new();
    directory.add_entry(managed_entry("Acme", "X1", "SN-MISSING", "HOST-1"));

    let job = SyncDeviceNamesJob::new(store, directory);
    let counters = job.run().await.unwrap();

    assert_eq!(counters.updated, 0);
    assert_eq!(counters.not_found, 1);
}

#[tokio::test]
async fn patch_failure_does_not_abort_the_run() {
    let store = FakeStore::new();
    let failing = store_device("Acme", "X1", "SN1", "");
    store.fail_patches_for(&failing.id.to_string());
    store.add_device(failing);
    let healthy = store_device("Acme", "X2", "SN2", "");
    let healthy_id = healthy.id.to_string();
    store.add_device(healthy);

    let directory = FakeDirectory::new();
    directory.add_entry(managed_entry("Acme", "X1", "SN1", "HOST-1"));
    directory.add_entry(managed_entry("Acme", "X2", "SN2", "HOST-2"));

    let job = SyncDeviceNamesJob::new(store.clone(), directory);
    let counters = job.run().await.unwrap();

    assert_eq!(counters.updated, 1);
    assert_eq!(store.hostname_of(&healthy_id).as_deref(), Some("HOST-2"));
}
