//! Record-store gateway for fleetgate.
//!
//! The record store is the document database holding `Device` and `DeviceTag`
//! records. This crate exposes it through the [`RecordStore`] trait: typed
//! queries that fully drain server pagination, and single-document partial
//! patches with add/replace semantics. It also ships the Cosmos SQL-API
//! implementation ([`CosmosStore`]) authenticated with an AAD bearer token.

mod auth;
mod config;
mod cosmos;
mod error;
mod records;

pub use auth::AadTokenCache;
pub use config::{StoreConfig, StoreCredentials, DEFAULT_CONTAINER, DEFAULT_DATABASE};
pub use cosmos::CosmosStore;
pub use error::{StoreError, StoreResult};
pub use records::{DeviceSummary, PatchOp, PatchOperation, RecordStore};
