//! # DownloadGrant Value Object
//!
//! 署名付きダウンロードURL（キャッシュしない）

use std::time::Duration;

/// 署名付きダウンロードURLと有効期間
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadGrant {
    pub url: String,
    pub expires_in: Duration,
}

impl DownloadGrant {
    pub fn new(url: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            url: url.into(),
            expires_in,
        }
    }
}
