//! Shared HTTP client for provider adapters with retry logic

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{Error, ProviderStage, Result};

/// reqwest client with a per-provider timeout and optional exponential backoff
#[derive(Clone)]
pub struct HttpClient {
    /// HTTP client
    client: Client,
    /// Service name used in error messages
    service: &'static str,
    /// Maximum retries after the first attempt
    max_retries: u32,
}

impl HttpClient {
    /// Create a client for `service`
    pub fn new(service: &'static str, timeout_secs: u64, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create {} HTTP client: {}", service, e)))?;

        Ok(Self {
            client,
            service,
            max_retries,
        })
    }

    /// Service name used in error messages
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Retry an operation with exponential backoff
    pub async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < self.max_retries => {
                    let delay = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        service = self.service,
                        "Request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt + 1,
                        self.max_retries + 1,
                        delay,
                        e
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a request, retrying transport failures; any status is returned
    pub async fn send<B>(&self, stage: ProviderStage, build: B) -> Result<Response>
    where
        B: Fn(&Client) -> RequestBuilder,
    {
        self.retry_request(|| {
            let request = build(&self.client);
            async move {
                request
                    .send()
                    .await
                    .map_err(|e| self.error(stage, format!("request failed: {}", e)))
            }
        })
        .await
    }

    /// Send a request and decode a successful JSON response.
    ///
    /// Transport failures, 429 and 5xx responses are retried; any other
    /// non-success status fails on the first attempt.
    pub async fn send_json<T, B>(&self, stage: ProviderStage, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn(&Client) -> RequestBuilder,
    {
        let response = self
            .retry_request(|| {
                let request = build(&self.client);
                async move {
                    let response = request
                        .send()
                        .await
                        .map_err(|e| self.error(stage, format!("request failed: {}", e)))?;
                    if is_retryable_status(response.status()) {
                        return self.check_status(stage, response).await;
                    }
                    Ok(response)
                }
            })
            .await?;

        self.check_status(stage, response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| self.error(stage, format!("invalid response body: {}", e)))
    }

    /// Turn a non-success response into an error carrying the body
    pub async fn check_status(&self, stage: ProviderStage, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(self.error(stage, format!("HTTP {}: {}", status, body.trim())))
    }

    /// Error of `stage` prefixed with the service name
    pub fn error(&self, stage: ProviderStage, message: impl std::fmt::Display) -> Error {
        Error::provider(stage, format!("{} {}", self.service, message))
    }
}

/// Statuses worth another attempt: rate limiting and server errors
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
