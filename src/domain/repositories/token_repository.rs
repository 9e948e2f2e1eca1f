//! # Token Repository Trait
//!
//! クライアント資格情報とベアラートークンの交換を抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::credentials::{AccessToken, Credentials};
use crate::domain::errors::JobResult;

/// トークンリポジトリ
///
/// キャッシュは持たない。キャッシュと単一フライト制御は `TokenProvider` が担当する。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// 資格情報をトークンに交換する
    ///
    /// # Errors
    ///
    /// 非成功ステータス、またはトークンを含まないレスポンスの場合に `JobError::Auth`
    async fn exchange(&self, credentials: &Credentials) -> JobResult<AccessToken>;
}
