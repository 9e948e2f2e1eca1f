//! # Storage Repository Trait
//!
//! バケットとオブジェクトに対する操作を抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::bucket::{Bucket, BucketCreation, RetentionPolicy};
use crate::domain::entities::object_key::ObjectKey;
use crate::domain::entities::upload_session::UploadSession;
use crate::domain::errors::JobResult;

/// ストレージリポジトリ
///
/// 署名付きURLによる2段階アップロード（セッション要求 → PUT → 完了通知）と
/// 署名付きダウンロードURLの発行を担当する。
/// エラーはすべて `JobError::Staging`（認証失敗のみ `JobError::Auth`）。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// バケット詳細を取得する
    ///
    /// # Returns
    ///
    /// 存在しない場合は `None`
    async fn bucket_details(&self, bucket_key: &str) -> JobResult<Option<Bucket>>;

    /// バケットを作成する
    ///
    /// # Returns
    ///
    /// 既に存在する場合は `BucketCreation::AlreadyExists`（エラーではない）
    async fn create_bucket(
        &self,
        bucket_key: &str,
        policy: RetentionPolicy,
    ) -> JobResult<BucketCreation>;

    /// 署名付きアップロードセッションを要求する
    ///
    /// # Arguments
    ///
    /// * `bucket_key` - バケットキー
    /// * `object_key` - オブジェクトキー
    /// * `parts` - 要求するパート数（1以上）
    async fn request_upload(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        parts: usize,
    ) -> JobResult<UploadSession>;

    /// 署名付きURLへコンテンツをそのままPUTする
    ///
    /// 署名付きURLなのでベアラートークンは付与しない
    async fn put_part(&self, url: &str, content: Vec<u8>) -> JobResult<()>;

    /// `uploadKey` を送り返してアップロードを完了する
    async fn complete_upload(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        upload_key: &str,
    ) -> JobResult<()>;

    /// 署名付きダウンロードURLを要求する
    ///
    /// # Arguments
    ///
    /// * `minutes` - 有効期限（分単位）
    async fn signed_download(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        minutes: u32,
    ) -> JobResult<String>;
}
