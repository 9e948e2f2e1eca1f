//! # Credentials and Access Token
//!
//! クライアント資格情報とベアラートークン

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// 有効期限の何秒前からトークンを古いとみなすか
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

/// クライアント資格情報
///
/// プロセス起動時に一度だけ与えられ、以降は不変
#[derive(Debug)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

/// ベアラートークン
///
/// `expires_at` が無い場合は401を受け取るまで有効とみなす
#[derive(Debug)]
pub struct AccessToken {
    value: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: SecretString::from(value.into()),
            expires_at,
        }
    }

    /// 交換レスポンスの `expires_in`（秒）から作成
    ///
    /// 表現できない `expires_in` は期限なしとして扱う
    pub fn issued_at(value: impl Into<String>, expires_in: Option<u64>, now: DateTime<Utc>) -> Self {
        let expires_at = expires_in.and_then(|secs| {
            let delta = Duration::try_seconds(i64::try_from(secs).ok()?)?;
            now.checked_add_signed(delta)
        });
        Self::new(value, expires_at)
    }

    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// 指定時刻においてまだ使えるかどうか
    ///
    /// # 例
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use da_runner::domain::entities::credentials::AccessToken;
    ///
    /// let now = Utc::now();
    /// let token = AccessToken::issued_at("abc", Some(3599), now);
    /// assert!(token.is_fresh_at(now));
    /// assert!(!token.is_fresh_at(now + Duration::seconds(3550)));
    ///
    /// let untracked = AccessToken::new("abc", None);
    /// assert!(untracked.is_fresh_at(now + Duration::days(365)));
    /// ```
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                expires_at.signed_duration_since(now) > Duration::seconds(TOKEN_EXPIRY_SKEW_SECS)
            }
            None => true,
        }
    }

    /// 同じトークン値かどうか
    pub fn same_value(&self, other: &AccessToken) -> bool {
        self.secret() == other.secret()
    }
}
