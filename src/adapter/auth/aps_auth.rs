//! APS Authentication
//!
//! クライアント資格情報（2-legged）によるトークン交換

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::{Client, Url};

use crate::adapter::aps::client::{endpoint, read_json};
use crate::adapter::aps::error::ApiError;
use crate::adapter::aps::models::TokenResponse;
use crate::adapter::aps::retry::{with_retry, RetryPolicy};
use crate::adapter::config::DEFAULT_SCOPE;
use crate::domain::entities::credentials::{AccessToken, Credentials};
use crate::domain::errors::{JobError, JobResult};
use crate::domain::repositories::token_repository::TokenRepository;

pub const TOKEN_PATH: [&str; 3] = ["authentication", "v2", "token"];

/// Exchanges client credentials at the APS authentication endpoint
pub struct ApsTokenRepository {
    http: Client,
    token_url: Url,
    scope: String,
    retry: RetryPolicy,
}

impl ApsTokenRepository {
    pub fn new(http: Client, base_url: &Url) -> Result<Self, ApiError> {
        Ok(Self {
            http,
            token_url: endpoint(base_url, &TOKEN_PATH)?,
            scope: DEFAULT_SCOPE.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("scope", self.scope.as_str()),
        ];
        let form = &form;

        with_retry(&self.retry, "token exchange", || async move {
            debug!("POST {}", self.token_url);
            let response = self
                .http
                .post(self.token_url.clone())
                .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
                .form(form)
                .send()
                .await?;
            read_json::<TokenResponse>(response).await
        })
        .await
    }
}

#[async_trait]
impl TokenRepository for ApsTokenRepository {
    async fn exchange(&self, credentials: &Credentials) -> JobResult<AccessToken> {
        let response = self
            .request_token(credentials)
            .await
            .map_err(|e| JobError::Auth(e.to_string()))?;

        if response.access_token.is_empty() {
            return Err(JobError::Auth(
                "token response has an empty access_token".to_string(),
            ));
        }

        debug!(
            "Token exchange succeeded (type: {}, expires_in: {:?})",
            response.token_type.as_deref().unwrap_or("Bearer"),
            response.expires_in
        );

        Ok(AccessToken::issued_at(
            response.access_token,
            response.expires_in,
            Utc::now(),
        ))
    }
}
