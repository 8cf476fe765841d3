//! Managed-device directory gateway for fleetgate.
//!
//! Talks to the Microsoft Graph device-management API: `OAuth2` client
//! credentials authentication, multi-cloud endpoint selection (Commercial and
//! US Government), paginated listing with server-side field projection, and
//! filtered lookup by device identity tuple.
//!
//! The reconciliation jobs consume this crate through the
//! [`ManagedDeviceDirectory`] trait so tests can substitute fakes.

mod auth;
mod client;
mod config;
mod directory;
mod error;

pub use auth::TokenCache;
pub use client::{GraphClient, ODataResponse};
pub use config::{CloudEnvironment, GraphConfig, GraphCredentials};
pub use directory::{IntuneDirectory, ManagedDevice, ManagedDeviceDirectory};
pub use error::{GraphError, GraphResult};
