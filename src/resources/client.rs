use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::error::ResourceError;
use crate::config::BackendConfig;

const APPLICATION_JSON: &str = "application/json";

/// HTTP gateway to the backend. Holds no state beyond the connection pool:
/// no caching, no retries.
#[derive(Clone)]
pub struct ResourceClient {
    base_url: Url,
    client: reqwest::Client,
}

/// Outcome of [`ResourceClient::test_connection`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub success: bool,
    /// HTTP status, or 0 when the server could not be reached.
    pub status: u16,
    pub message: String,
}

impl ResourceClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ResourceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ResourceError::Config(format!("'{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ResourceError::Config(format!(
                "'{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()
            .map_err(|e| ResourceError::Config(e.to_string()))?;

        info!(
            "Resource client targeting {} (timeout {} ms)",
            base_url, config.timeout_in_ms
        );
        Ok(ResourceClient { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus path segments; each segment is percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ResourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResourceError::Config(format!("'{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ResourceError> {
        let request = self.request(Method::GET, segments)?;
        let response = self.execute(request).await?;
        read_json(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ResourceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, segments)?.json(body);
        let response = self.execute(request).await?;
        read_json(response).await
    }

    /// Like `send_json`, but the reply is plain text.
    pub(crate) async fn send_json_for_text<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<String, ResourceError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(method, segments)?.json(body);
        let response = self.execute(request).await?;
        Ok(response.text().await?)
    }

    /// A call without a request body whose reply is JSON.
    pub(crate) async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<T, ResourceError> {
        let request = self.request(method, segments)?;
        let response = self.execute(request).await?;
        read_json(response).await
    }

    /// A call whose reply body is ignored.
    pub(crate) async fn call(&self, method: Method, segments: &[&str]) -> Result<(), ResourceError> {
        let request = self.request(method, segments)?;
        self.execute(request).await.map(|_| ())
    }

    /// Multipart upload. No explicit content type: reqwest sets the boundary.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: Form,
    ) -> Result<T, ResourceError> {
        let url = self.endpoint(segments)?;
        let request = self
            .client
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .multipart(form);
        let response = self.execute(request).await?;
        read_json(response).await
    }

    /// Checks that the backend answers at all. Never fails; the outcome is in the result.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let request = match self.request(Method::GET, &["recipes"]) {
            Ok(request) => request,
            Err(e) => {
                return ConnectionStatus {
                    success: false,
                    status: 0,
                    message: format!("Connection error: {}", e),
                }
            }
        };

        match request.send().await {
            Ok(response) => {
                let success = response.status().is_success();
                ConnectionStatus {
                    success,
                    status: response.status().as_u16(),
                    message: if success {
                        "Connection successful!".to_string()
                    } else {
                        "Connection failed".to_string()
                    },
                }
            }
            Err(e) => ConnectionStatus {
                success: false,
                status: 0,
                message: format!("Connection error: {}", e),
            },
        }
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ResourceError> {
        let url = self.endpoint(segments)?;
        Ok(self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, APPLICATION_JSON))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ResourceError> {
        let request = request
            .build()
            .map_err(|e| ResourceError::Config(e.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!("{} {}", method, url);

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    event_name = "resources.request.failed",
                    method = %method,
                    url = %url,
                    "Network error: {}",
                    e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(
                event_name = "resources.request.failed",
                method = %method,
                url = %url,
                status = status.as_u16(),
                "Backend returned an error status"
            );
            return Err(ResourceError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ResourceError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ResourceError::Decode(e.to_string()))
}
