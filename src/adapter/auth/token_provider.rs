//! Token Provider
//!
//! ベアラートークンのキャッシュと単一フライトでの取得

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::domain::entities::credentials::{AccessToken, Credentials};
use crate::domain::errors::JobResult;
use crate::domain::repositories::token_repository::TokenRepository;

/// Caches one access token for the process lifetime.
///
/// The mutex is held across the exchange, so concurrent callers wait for
/// the in-flight request instead of issuing their own.
pub struct TokenProvider {
    repository: Arc<dyn TokenRepository>,
    credentials: Credentials,
    cached: Mutex<Option<Arc<AccessToken>>>,
}

impl TokenProvider {
    pub fn new(repository: Arc<dyn TokenRepository>, credentials: Credentials) -> Self {
        Self {
            repository,
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Return the cached token, exchanging credentials when absent or stale.
    pub async fn get_token(&self) -> JobResult<Arc<AccessToken>> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh_at(Utc::now()) {
                return Ok(token.clone());
            }
            debug!("Access token is about to expire, refreshing");
        }

        let token = Arc::new(self.repository.exchange(&self.credentials).await?);
        info!(
            "Obtained access token for client {}",
            self.credentials.client_id()
        );
        *cached = Some(token.clone());

        Ok(token)
    }

    /// Drop the cached token if it is still `stale`.
    ///
    /// A token already replaced by another caller is kept.
    pub async fn invalidate(&self, stale: &AccessToken) {
        let mut cached = self.cached.lock().await;
        if cached.as_ref().is_some_and(|token| token.same_value(stale)) {
            debug!("Invalidating rejected access token");
            *cached = None;
        }
    }
}
