//! Directory gateway configuration.

use secrecy::SecretString;

use crate::error::{GraphError, GraphResult};

/// Azure cloud the tenant lives in.
///
/// Selects both the login authority and the Graph endpoint. Deployments
/// default to the government cloud unless explicitly configured for the
/// public one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloudEnvironment {
    /// Public (commercial) Azure.
    Commercial,
    /// Azure US Government.
    #[default]
    UsGovernment,
}

impl CloudEnvironment {
    /// Parses the `AzureEnvironment` setting. Anything other than
    /// `AzurePublicCloud` selects the government cloud.
    #[must_use]
    pub fn from_env_str(value: &str) -> Self {
        if value == "AzurePublicCloud" {
            Self::Commercial
        } else {
            Self::UsGovernment
        }
    }

    /// Login authority base URL.
    #[must_use]
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://login.microsoftonline.com",
            Self::UsGovernment => "https://login.microsoftonline.us",
        }
    }

    /// Graph API base URL.
    #[must_use]
    pub fn graph_endpoint(&self) -> &'static str {
        match self {
            Self::Commercial => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
        }
    }
}

/// Client-credentials material for the Graph application registration.
#[derive(Debug, Clone)]
pub struct GraphCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Configuration for the directory gateway.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub cloud: CloudEnvironment,
    pub tenant_id: String,
    pub api_version: String,
    /// Endpoint overrides, used by tests against a mock server.
    login_endpoint_override: Option<String>,
    graph_endpoint_override: Option<String>,
}

impl GraphConfig {
    /// Creates a configuration for a tenant in the given cloud.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the tenant id is blank.
    pub fn new(cloud: CloudEnvironment, tenant_id: impl Into<String>) -> GraphResult<Self> {
        let tenant_id = tenant_id.into();
        if tenant_id.trim().is_empty() {
            return Err(GraphError::Config("tenant id must not be empty".into()));
        }
        Ok(Self {
            cloud,
            tenant_id,
            api_version: "v1.0".to_string(),
            login_endpoint_override: None,
            graph_endpoint_override: None,
        })
    }

    /// Overrides both endpoints, pointing the gateway at a test server.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        login_endpoint: impl Into<String>,
        graph_endpoint: impl Into<String>,
    ) -> Self {
        self.login_endpoint_override = Some(login_endpoint.into());
        self.graph_endpoint_override = Some(graph_endpoint.into());
        self
    }

    /// Login authority base URL in effect.
    #[must_use]
    pub fn login_endpoint(&self) -> &str {
        self.login_endpoint_override
            .as_deref()
            .unwrap_or_else(|| self.cloud.login_endpoint())
    }

    /// Graph base URL in effect.
    #[must_use]
    pub fn graph_endpoint(&self) -> &str {
        self.graph_endpoint_override
            .as_deref()
            .unwrap_or_else(|| self.cloud.graph_endpoint())
    }

    /// Graph base URL including the API version segment.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.graph_endpoint(), self.api_version)
    }

    /// Token scope for the client-credentials flow.
    #[must_use]
    pub fn token_scope(&self) -> String {
        format!("{}/.default", self.graph_endpoint())
    }
}
