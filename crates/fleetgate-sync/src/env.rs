//! Job configuration from environment variables.
//!
//! Both batch binaries read the same variables. Required values fail fast
//! with a clear message; optional ones fall back to defaults with a logged
//! warning.

use std::env;
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::warn;

use fleetgate_graph::{
    CloudEnvironment, GraphClient, GraphConfig, GraphCredentials, IntuneDirectory, TokenCache,
};
use fleetgate_store::{AadTokenCache, CosmosStore, StoreConfig, StoreCredentials};

use crate::error::SyncResult;

/// Environment loading failure.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a job needs to reach both external systems.
pub struct JobEnvironment {
    pub store_config: StoreConfig,
    pub store_credentials: StoreCredentials,
    pub graph_config: GraphConfig,
    pub graph_credentials: GraphCredentials,
}

fn required(name: &'static str) -> Result<String, EnvError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(EnvError::Missing(name)),
    }
}

fn defaulted(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            warn!(
                variable = name,
                default, "Environment variable is unset, using default value"
            );
            default.to_string()
        }
    }
}

impl JobEnvironment {
    /// Loads the shared job configuration, failing on the first missing
    /// required variable.
    pub fn from_env() -> Result<Self, EnvError> {
        let endpoint = required("COSMOS_ENDPOINT")?;
        let database = defaulted("COSMOS_DATABASE_NAME", fleetgate_store::DEFAULT_DATABASE);
        let container = defaulted("COSMOS_CONTAINER_NAME", fleetgate_store::DEFAULT_CONTAINER);

        let cloud = CloudEnvironment::from_env_str(
            &env::var("AzureEnvironment").unwrap_or_default(),
        );
        let tenant_id = required("AzureAd__TenantId")?;
        let client_id = required("AzureAd__ClientId")?;
        let client_secret: SecretString = required("AzureApp__ClientSecret")?.into();

        let graph_config = GraphConfig::new(cloud, tenant_id.clone())
            .map_err(|e| EnvError::Invalid(e.to_string()))?;
        let store_config = StoreConfig::new(endpoint, cloud.login_endpoint(), tenant_id)
            .map_err(|e| EnvError::Invalid(e.to_string()))?
            .with_database(database)
            .with_container(container);

        Ok(Self {
            store_config,
            store_credentials: StoreCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            },
            graph_config,
            graph_credentials: GraphCredentials {
                client_id,
                client_secret,
            },
        })
    }

    /// Builds the record-store gateway.
    pub fn build_store(&self) -> SyncResult<CosmosStore> {
        let token_cache = Arc::new(AadTokenCache::new(
            &self.store_config,
            self.store_credentials.clone(),
        ));
        Ok(CosmosStore::new(&self.store_config, token_cache)?)
    }

    /// Builds the directory gateway.
    pub fn build_directory(&self) -> SyncResult<IntuneDirectory> {
        let token_cache = Arc::new(TokenCache::new(
            &self.graph_config,
            self.graph_credentials.clone(),
        ));
        let client = GraphClient::new(&self.graph_config, token_cache)?;
        Ok(IntuneDirectory::new(client))
    }
}
