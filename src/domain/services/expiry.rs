//! # Download Expiry Policy
//!
//! 署名付きダウンロードURLの有効期限（分単位）の変換

use std::time::Duration;

use crate::domain::errors::{JobError, JobResult};

/// 最小有効期限（秒）
pub const MIN_EXPIRY_SECS: u64 = 60;
/// 最大有効期限（秒）。サービス側の上限は60分
pub const MAX_EXPIRY_SECS: u64 = 60 * 60;

/// 有効期限ポリシー
pub struct ExpiryPolicy;

impl ExpiryPolicy {
    /// 秒を分に変換する（切り捨て）
    ///
    /// 60秒未満は0分に丸められてしまうため拒否する
    ///
    /// # Errors
    ///
    /// 60秒未満、または3600秒を超える場合に `JobError::Staging`
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::services::expiry::ExpiryPolicy;
    ///
    /// assert_eq!(ExpiryPolicy::minutes_for(3600).unwrap(), 60);
    /// assert_eq!(ExpiryPolicy::minutes_for(90).unwrap(), 1);
    /// assert!(ExpiryPolicy::minutes_for(30).is_err());
    /// ```
    pub fn minutes_for(expires_in_secs: u64) -> JobResult<u32> {
        if expires_in_secs < MIN_EXPIRY_SECS {
            return Err(JobError::Staging(format!(
                "download URL expiry must be at least {}s (got {}s)",
                MIN_EXPIRY_SECS, expires_in_secs
            )));
        }
        if expires_in_secs > MAX_EXPIRY_SECS {
            return Err(JobError::Staging(format!(
                "download URL expiry must be at most {}s (got {}s)",
                MAX_EXPIRY_SECS, expires_in_secs
            )));
        }
        Ok((expires_in_secs / 60) as u32)
    }

    /// 実際に適用される有効期間
    pub fn effective_duration(minutes: u32) -> Duration {
        Duration::from_secs(u64::from(minutes) * 60)
    }
}
