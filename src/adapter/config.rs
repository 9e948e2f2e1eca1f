//! Configuration
//!
//! 設定ファイル（任意）と環境変数から実行時設定を読み込む

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::time::Duration;

use crate::application::use_cases::stage_objects::DEFAULT_PART_SIZE;
use crate::domain::entities::credentials::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://developer.api.autodesk.com";
pub const DEFAULT_REGION: &str = "us-east";
pub const DEFAULT_SCOPE: &str = "data:read data:write bucket:create bucket:read code:all";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

pub const ENV_CLIENT_ID: &str = "APS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "APS_CLIENT_SECRET";
pub const ENV_BUCKET_NAME: &str = "APS_BUCKET_NAME";
pub const ENV_BASE_URL: &str = "APS_BASE_URL";
pub const ENV_REGION: &str = "APS_REGION";

#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub bucket_name: String,
    pub base_url: String,
    pub region: String,
    pub scope: String,
    pub poll_interval_secs: u64,
    pub part_size_bytes: usize,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            bucket_name: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            part_size_bytes: DEFAULT_PART_SIZE,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("bucket_name", &self.bucket_name)
            .field("base_url", &self.base_url)
            .field("region", &self.region)
            .field("scope", &self.scope)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("part_size_bytes", &self.part_size_bytes)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

/// Expands tilde in path and returns the full path
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}

impl Config {
    /// Load configuration: optional JSON file, then `.env`, then environment variables.
    pub fn load(path: Option<&str>) -> Result<Self> {
        // .env is optional
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config file: {}", expanded))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", expanded))?;
        Ok(config)
    }

    /// Override fields with non-empty values returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 5] = [
            (ENV_CLIENT_ID, &mut self.client_id),
            (ENV_CLIENT_SECRET, &mut self.client_secret),
            (ENV_BUCKET_NAME, &mut self.bucket_name),
            (ENV_BASE_URL, &mut self.base_url),
            (ENV_REGION, &mut self.region),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            bail!(
                "APS credentials are missing: set {} and {} (environment or .env) or provide them in the config file",
                ENV_CLIENT_ID,
                ENV_CLIENT_SECRET
            );
        }
        if self.bucket_name.trim().is_empty() {
            bail!("Bucket name is missing: set {}", ENV_BUCKET_NAME);
        }
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
