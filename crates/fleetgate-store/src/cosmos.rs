//! Cosmos SQL-API implementation of the record store.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use fleetgate_core::{Device, DeviceTag};

use crate::auth::AadTokenCache;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::records::{DeviceSummary, PatchOperation, RecordStore};

const COSMOS_API_VERSION: &str = "2018-12-31";

/// A parameterized SQL-API query.
#[derive(Debug, Serialize)]
struct QueryBody {
    query: String,
    parameters: Vec<QueryParameter>,
}

#[derive(Debug, Serialize)]
struct QueryParameter {
    name: String,
    value: serde_json::Value,
}

/// One page of query results.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    #[serde(rename = "Documents", default = "Vec::new")]
    documents: Vec<T>,
}

#[derive(Debug, Serialize)]
struct PatchBody<'a> {
    operations: &'a [PatchOperation],
}

/// Record-store gateway over the Cosmos SQL API.
///
/// One shared HTTP client and token cache per run; every query drains the
/// server's continuation tokens before returning.
pub struct CosmosStore {
    http_client: reqwest::Client,
    token_cache: Arc<AadTokenCache>,
    docs_url: String,
}

impl CosmosStore {
    /// Creates a store gateway for the configured account.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built.
    pub fn new(config: &StoreConfig, token_cache: Arc<AadTokenCache>) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_cache,
            docs_url: config.docs_url(),
        })
    }

    /// Verifies the store is reachable and the credential is accepted.
    ///
    /// Jobs call this before processing any record; a failure here aborts
    /// the whole run.
    pub async fn test_connection(&self) -> StoreResult<()> {
        let _: Vec<serde_json::Value> = self
            .query_first_page("SELECT TOP 1 c.id FROM c", Vec::new())
            .await?;
        Ok(())
    }

    async fn auth_header(&self) -> StoreResult<String> {
        let token = self.token_cache.get_token().await?;
        Ok(urlencoding::encode(&format!("type=aad&ver=1.0&sig={token}")).into_owned())
    }

    fn rfc1123_now() -> String {
        chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
    }

    async fn query_request(
        &self,
        body: &QueryBody,
        continuation: Option<&str>,
    ) -> StoreResult<reqwest::Response> {
        let mut request = self
            .http_client
            .post(&self.docs_url)
            .header("Authorization", self.auth_header().await?)
            .header("x-ms-date", Self::rfc1123_now())
            .header("x-ms-version", COSMOS_API_VERSION)
            .header("x-ms-documentdb-isquery", "True")
            .header("x-ms-documentdb-query-enablecrosspartition", "True")
            .header("Content-Type", "application/query+json")
            .json(body);

        if let Some(token) = continuation {
            request = request.header("x-ms-continuation", token);
        }

        Ok(request.send().await?)
    }

    /// Runs a query and drains every continuation page.
    async fn query_all<T: DeserializeOwned>(
        &self,
        query: &str,
        parameters: Vec<(&str, serde_json::Value)>,
    ) -> StoreResult<Vec<T>> {
        let body = QueryBody {
            query: query.to_string(),
            parameters: parameters
                .into_iter()
                .map(|(name, value)| QueryParameter {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        };

        let mut documents = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self.query_request(&body, continuation.as_deref()).await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(StoreError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let next = response
                .headers()
                .get("x-ms-continuation")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let page: QueryResponse<T> = response.json().await?;
            debug!(count = page.documents.len(), "Received store page");
            documents.extend(page.documents);

            match next {
                Some(token) if !token.is_empty() => continuation = Some(token),
                _ => return Ok(documents),
            }
        }
    }

    /// Runs a query but stops at the first non-empty page.
    async fn query_first_page<T: DeserializeOwned>(
        &self,
        query: &str,
        parameters: Vec<(&str, serde_json::Value)>,
    ) -> StoreResult<Vec<T>> {
        let body = QueryBody {
            query: query.to_string(),
            parameters: parameters
                .into_iter()
                .map(|(name, value)| QueryParameter {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        };

        let mut continuation: Option<String> = None;
        loop {
            let response = self.query_request(&body, continuation.as_deref()).await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(StoreError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let next = response
                .headers()
                .get("x-ms-continuation")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let page: QueryResponse<T> = response.json().await?;
            if !page.documents.is_empty() {
                return Ok(page.documents);
            }

            match next {
                Some(token) if !token.is_empty() => continuation = Some(token),
                _ => return Ok(Vec::new()),
            }
        }
    }
}

#[async_trait]
impl RecordStore for CosmosStore {
    #[instrument(skip(self))]
    async fn find_device(
        &self,
        make: &str,
        model: &str,
        serial_number: &str,
    ) -> StoreResult<Option<Device>> {
        let devices: Vec<Device> = self
            .query_first_page(
                "SELECT * FROM c WHERE c.Type='Device' \
                 AND LOWER(c.Make) = LOWER(@make) \
                 AND LOWER(c.Model) = LOWER(@model) \
                 AND LOWER(c.SerialNumber) = LOWER(@serialNumber)",
                vec![
                    ("@make", make.trim().into()),
                    ("@model", model.trim().into()),
                    ("@serialNumber", serial_number.trim().into()),
                ],
            )
            .await?;

        Ok(devices.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn list_device_summaries(&self) -> StoreResult<Vec<DeviceSummary>> {
        self.query_all(
            "SELECT c.id as id, c.PreferredHostname as PreferredHostname, \
             LOWER(c.Make) as Make, LOWER(c.Model) as Model, \
             LOWER(c.SerialNumber) as SerialNumber, c.Tags as Tags \
             FROM c WHERE c.Type='Device'",
            Vec::new(),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_tags(&self) -> StoreResult<Vec<DeviceTag>> {
        self.query_all(
            "SELECT * FROM c WHERE c.PartitionKey='DeviceTag'",
            Vec::new(),
        )
        .await
    }

    #[instrument(skip(self, operations))]
    async fn patch_device(
        &self,
        id: &str,
        partition_key: &str,
        operations: &[PatchOperation],
    ) -> StoreResult<()> {
        let url = format!("{}/{}", self.docs_url, id);
        let partition_header =
            serde_json::to_string(&serde_json::json!([partition_key]))?;

        let response = self
            .http_client
            .patch(&url)
            .header("Authorization", self.auth_header().await?)
            .header("x-ms-date", Self::rfc1123_now())
            .header("x-ms-version", COSMOS_API_VERSION)
            .header("x-ms-documentdb-partitionkey", partition_header)
            .json(&PatchBody { operations })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
