//! Record-store configuration.

use secrecy::SecretString;

use crate::error::{StoreError, StoreResult};

/// Fallback container holding device and tag records.
pub const DEFAULT_CONTAINER: &str = "DeviceData";
/// Fallback database name.
pub const DEFAULT_DATABASE: &str = "DelegationStationData";

/// Client-credentials material for the store's AAD application.
#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Configuration for the record-store gateway.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Account endpoint, e.g. `https://myaccount.documents.azure.com`.
    pub endpoint: String,
    pub database: String,
    pub container: String,
    /// Login authority used to acquire the AAD token.
    pub login_endpoint: String,
    pub tenant_id: String,
}

impl StoreConfig {
    /// Creates a configuration with the default database and container names.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint or tenant id is blank.
    pub fn new(
        endpoint: impl Into<String>,
        login_endpoint: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> StoreResult<Self> {
        let endpoint = endpoint.into();
        let tenant_id = tenant_id.into();
        if endpoint.trim().is_empty() {
            return Err(StoreError::Config("store endpoint must not be empty".into()));
        }
        if tenant_id.trim().is_empty() {
            return Err(StoreError::Config("tenant id must not be empty".into()));
        }
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            database: DEFAULT_DATABASE.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            login_endpoint: login_endpoint.into(),
            tenant_id,
        })
    }

    /// Overrides the database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Overrides the container name.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Token scope for the account.
    #[must_use]
    pub fn token_scope(&self) -> String {
        format!("{}/.default", self.endpoint)
    }

    /// URL of the documents collection.
    #[must_use]
    pub fn docs_url(&self) -> String {
        format!(
            "{}/dbs/{}/colls/{}/docs",
            self.endpoint, self.database, self.container
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_docs_url() {
        let config = StoreConfig::new(
            "https://acct.documents.azure.com/",
            "https://login.microsoftonline.us",
            "tenant",
        )
        .unwrap();
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert_eq!(config.container, DEFAULT_CONTAINER);
        assert_eq!(
            config.docs_url(),
            "https://acct.documents.azure.com/dbs/DelegationStationData/colls/DeviceData/docs"
        );
        assert_eq!(
            config.token_scope(),
            "https://acct.documents.azure.com/.default"
        );
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        assert!(StoreConfig::new("", "https://login", "tenant").is_err());
        assert!(StoreConfig::new("https://acct", "https://login", " ").is_err());
    }

    #[test]
    fn overrides_apply() {
        let config = StoreConfig::new("https://acct", "https://login", "tenant")
            .unwrap()
            .with_database("OtherDb")
            .with_container("OtherColl");
        assert!(config.docs_url().contains("/dbs/OtherDb/colls/OtherColl/"));
    }
}
