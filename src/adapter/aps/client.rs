//! APS HTTP Client
//!
//! 共有の `reqwest::Client`、エンドポイント組み立て、ベアラー認証付きリクエスト

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::adapter::auth::token_provider::TokenProvider;
use crate::domain::entities::credentials::AccessToken;

use super::error::ApiError;
use super::retry::{with_retry, RetryPolicy};

/// Request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Slowest uplink a signed part upload is expected to survive
pub const MIN_UPLOAD_BYTES_PER_SEC: u64 = 128 * 1024;

/// Build the shared HTTP client
pub fn build_http_client(timeout: Duration) -> Result<Client, ApiError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Timeout for one signed part PUT: the request timeout plus the transfer
/// time of `part_len` bytes at `MIN_UPLOAD_BYTES_PER_SEC`.
pub fn signed_upload_timeout(request_timeout: Duration, part_len: usize) -> Duration {
    let transfer_secs = u64::try_from(part_len).unwrap_or(u64::MAX) / MIN_UPLOAD_BYTES_PER_SEC;
    request_timeout.saturating_add(Duration::from_secs(transfer_secs))
}

pub fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))
}

/// Append path segments to `base`. Each segment is percent-encoded,
/// so an object key containing `/` stays a single segment.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-success response into `ApiError::Status`
pub async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::status(status, &body))
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// APS API client shared by the OSS and Design Automation repositories
pub struct ApsClient {
    http: Client,
    base_url: Url,
    tokens: Arc<TokenProvider>,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl ApsClient {
    pub fn new(http: Client, base_url: Url, tokens: Arc<TokenProvider>) -> Self {
        Self {
            http,
            base_url,
            tokens,
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Timeout the shared client was built with. Signed uploads extend it
    /// by the size of the part.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint(&self.base_url, segments)
    }

    async fn token(&self) -> Result<Arc<AccessToken>, ApiError> {
        Ok(self.tokens.get_token().await?)
    }

    /// Send with a bearer token. On 401 the token is invalidated and the
    /// request is sent once more with a fresh one.
    pub async fn send_authorized<F>(&self, build: &F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.token().await?;
        let response = build(&self.http)
            .bearer_auth(token.secret())
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!("Request was rejected with 401, refreshing access token");
        self.tokens.invalidate(&token).await;
        let token = self.token().await?;

        Ok(build(&self.http)
            .bearer_auth(token.secret())
            .send()
            .await?)
    }

    /// Authorized request with status check. Idempotent calls are retried
    /// on transient failures, others get a single attempt.
    pub async fn execute<F>(
        &self,
        operation: &str,
        idempotent: bool,
        build: F,
    ) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let policy = if idempotent {
            self.retry
        } else {
            RetryPolicy::none()
        };
        let build = &build;

        with_retry(&policy, operation, || async move {
            let response = self.send_authorized(build).await?;
            debug!("{}: HTTP {}", operation, response.status());
            check_status(response).await
        })
        .await
    }

    pub async fn execute_json<T, F>(
        &self,
        operation: &str,
        idempotent: bool,
        build: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        read_json(self.execute(operation, idempotent, build).await?).await
    }

    /// Raw PUT to a pre-signed URL. No bearer token is attached.
    pub async fn put_signed(&self, url: &str, body: Bytes) -> Result<(), ApiError> {
        let url = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))?;
        let timeout = signed_upload_timeout(self.request_timeout, body.len());
        let url = &url;
        let body = &body;

        with_retry(&self.retry, "signed upload", || async move {
            let response = self
                .http
                .put(url.clone())
                .timeout(timeout)
                .body(body.clone())
                .send()
                .await?;
            check_status(response).await.map(|_| ())
        })
        .await
    }
}
