//! Graph HTTP client with retry and pagination handling.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::TokenCache;
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};

/// `OData` error response envelope.
#[derive(Debug, Deserialize)]
struct ODataError {
    error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    code: String,
    message: String,
}

/// A page of a paginated Graph response.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Read-only Graph API client.
///
/// Injects a bearer token per request, retries transient failures (502, 503,
/// 504) with exponential backoff, and honors `Retry-After` on 429 up to a
/// bounded number of attempts.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_cache: Arc<TokenCache>,
    base_url: String,
    max_retries: u32,
}

impl GraphClient {
    /// Creates a Graph client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built.
    pub fn new(config: &GraphConfig, token_cache: Arc<TokenCache>) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_cache,
            base_url: config.base_url(),
            max_retries: 5,
        })
    }

    /// Base URL for request construction, including API version.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request with token injection and retry handling.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> GraphResult<T> {
        let mut retries = 0;
        let mut rate_limit_attempts = 0u32;
        let mut delay = Duration::from_secs(1);

        loop {
            let token = self.token_cache.get_token().await?;

            let response = self
                .http_client
                .get(url)
                .bearer_auth(&token)
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if rate_limit_attempts >= self.max_retries {
                    return Err(GraphError::MaxRetriesExceeded {
                        attempts: rate_limit_attempts,
                    });
                }
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(retry_after, "Rate limited by Graph, backing off");
                tokio::time::sleep(Duration::from_secs(retry_after)).await;
                rate_limit_attempts += 1;
                continue;
            }

            if matches!(
                status,
                reqwest::StatusCode::BAD_GATEWAY
                    | reqwest::StatusCode::SERVICE_UNAVAILABLE
                    | reqwest::StatusCode::GATEWAY_TIMEOUT
            ) && retries < self.max_retries
            {
                retries += 1;
                warn!(
                    %status,
                    retry = retries,
                    max = self.max_retries,
                    "Transient Graph error, retrying after {:?}", delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                continue;
            }

            if status.is_success() {
                return response.json().await.map_err(GraphError::from);
            }

            let error_body = response.text().await.unwrap_or_default();
            if let Ok(odata_error) = serde_json::from_str::<ODataError>(&error_body) {
                return Err(GraphError::Api {
                    code: odata_error.error.code,
                    message: odata_error.error.message,
                });
            }
            return Err(GraphError::Api {
                code: status.to_string(),
                message: error_body,
            });
        }
    }

    /// Fully drains a paginated response, passing each page to the callback.
    ///
    /// Pages are followed through `@odata.nextLink` until exhausted; callers
    /// never observe a partial result set.
    pub async fn get_all_pages<T, F>(&self, initial_url: &str, mut callback: F) -> GraphResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>),
    {
        let mut url = initial_url.to_string();

        loop {
            debug!(%url, "Fetching directory page");
            let response: ODataResponse<T> = self.get(&url).await?;

            callback(response.value);

            match response.next_link {
                Some(next) => url = next,
                None => return Ok(()),
            }
        }
    }
}
