//! # Bucket Entity
//!
//! ストレージバケット（名前空間）

use std::fmt;

use crate::domain::errors::{JobError, JobResult};

/// バケットキーの最小長
pub const MIN_BUCKET_KEY_LEN: usize = 3;
/// バケットキーの最大長
pub const MAX_BUCKET_KEY_LEN: usize = 128;

/// バケットの保持ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// 24時間で削除
    Transient,
    /// 30日で削除
    Temporary,
    /// 削除されない
    Persistent,
}

impl RetentionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPolicy::Transient => "transient",
            RetentionPolicy::Temporary => "temporary",
            RetentionPolicy::Persistent => "persistent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "transient" => Some(RetentionPolicy::Transient),
            "temporary" => Some(RetentionPolicy::Temporary),
            "persistent" => Some(RetentionPolicy::Persistent),
            _ => None,
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// バケット詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: String,
    pub policy: Option<RetentionPolicy>,
}

impl Bucket {
    /// バケットキーを検証する
    ///
    /// 使用できる文字は小文字英数字と `-`, `_`, `.` のみ、長さは3〜128文字
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::entities::bucket::Bucket;
    ///
    /// assert!(Bucket::validate_key("my-da-bucket_01").is_ok());
    /// assert!(Bucket::validate_key("My Bucket").is_err());
    /// assert!(Bucket::validate_key("ab").is_err());
    /// ```
    pub fn validate_key(key: &str) -> JobResult<()> {
        if key.len() < MIN_BUCKET_KEY_LEN || key.len() > MAX_BUCKET_KEY_LEN {
            return Err(JobError::Staging(format!(
                "bucket key '{}' must be {}-{} characters",
                key, MIN_BUCKET_KEY_LEN, MAX_BUCKET_KEY_LEN
            )));
        }

        let valid = key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(JobError::Staging(format!(
                "bucket key '{}' may only contain lowercase letters, digits, '-', '_' and '.'",
                key
            )));
        }

        Ok(())
    }
}

/// バケット作成の結果
///
/// 既存バケットへの重複作成はエラーではなく `AlreadyExists` として扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCreation {
    Created,
    AlreadyExists,
}
