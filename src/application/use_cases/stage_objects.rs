//! # Object Staging Use Case
//!
//! バケットの確保、署名付きURLによるアップロード、ダウンロードURLの発行

use std::sync::Arc;

use futures::future::try_join_all;
use log::{debug, info, warn};

use crate::domain::entities::bucket::{Bucket, BucketCreation, RetentionPolicy};
use crate::domain::entities::download_grant::DownloadGrant;
use crate::domain::entities::object_key::ObjectKey;
use crate::domain::entities::upload_session::UploadSession;
use crate::domain::errors::{JobError, JobResult};
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::services::expiry::ExpiryPolicy;

/// デフォルトのパートサイズ（100 MiB）
pub const DEFAULT_PART_SIZE: usize = 100 * 1024 * 1024;

/// オブジェクトステージングクライアント
///
/// ファイル本体はストレージへ直接PUTし、ジョブAPIを経由しない
pub struct ObjectStagingClient<S: StorageRepository> {
    repository: Arc<S>,
    part_size: usize,
    policy: RetentionPolicy,
}

impl<S: StorageRepository> ObjectStagingClient<S> {
    /// 新しいクライアントを作成
    ///
    /// # Arguments
    ///
    /// * `repository` - ストレージリポジトリ
    pub fn new(repository: Arc<S>) -> Self {
        Self {
            repository,
            part_size: DEFAULT_PART_SIZE,
            policy: RetentionPolicy::Transient,
        }
    }

    /// パートサイズを指定（0は分割なし）
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    /// バケットが存在することを保証する
    ///
    /// 詳細取得は参考情報にすぎない。取得に失敗した場合（存在しない場合を含む）は
    /// 作成を試み、「既に存在する」は成功として扱う。
    ///
    /// # Errors
    ///
    /// バケットキーが不正、または作成自体が失敗した場合にエラーを返す
    pub async fn ensure_bucket(&self, bucket_key: &str) -> JobResult<()> {
        Bucket::validate_key(bucket_key)?;

        match self.repository.bucket_details(bucket_key).await {
            Ok(Some(_)) => {
                debug!("Bucket {} already exists", bucket_key);
                return Ok(());
            }
            Ok(None) => {
                info!("Bucket {} not found, creating ({})", bucket_key, self.policy);
            }
            Err(e) => {
                warn!(
                    "Bucket check for {} failed, attempting creation: {}",
                    bucket_key, e
                );
            }
        }

        match self.repository.create_bucket(bucket_key, self.policy).await? {
            BucketCreation::Created => info!("Created bucket {}", bucket_key),
            BucketCreation::AlreadyExists => {
                info!("Bucket {} was created concurrently, reusing it", bucket_key)
            }
        }

        Ok(())
    }

    /// オブジェクトをアップロードする
    ///
    /// セッション要求 → 各パートのPUT → `uploadKey` による完了通知の順で実行する。
    /// チェックサムによる再検証は行わない。
    ///
    /// # Arguments
    ///
    /// * `bucket_key` - バケットキー
    /// * `object_key` - オブジェクトキー
    /// * `content` - アップロードする内容
    ///
    /// # Returns
    ///
    /// アップロードしたオブジェクトキー
    pub async fn upload_object(
        &self,
        bucket_key: &str,
        object_key: ObjectKey,
        content: &[u8],
    ) -> JobResult<ObjectKey> {
        let parts = UploadSession::required_parts(content.len(), self.part_size);
        let session = self
            .repository
            .request_upload(bucket_key, &object_key, parts)
            .await?;

        if session.part_count() < parts {
            return Err(JobError::Staging(format!(
                "upload session for {} returned {} URL(s), {} required",
                object_key,
                session.part_count(),
                parts
            )));
        }

        let chunks = UploadSession::split_content(content, self.part_size);
        let (urls, upload_key) = session.into_parts();

        for (index, (url, chunk)) in urls.iter().zip(chunks).enumerate() {
            debug!(
                "Uploading part {}/{} of {} ({} bytes)",
                index + 1,
                parts,
                object_key,
                chunk.len()
            );
            self.repository.put_part(url, chunk.to_vec()).await?;
        }

        self.repository
            .complete_upload(bucket_key, &object_key, &upload_key)
            .await?;

        info!(
            "Uploaded {} to bucket {} ({} bytes, {} part(s))",
            object_key,
            bucket_key,
            content.len(),
            parts
        );

        Ok(object_key)
    }

    /// 複数のオブジェクトを並行してアップロードする
    ///
    /// 各オブジェクトは独立したセッションを使う。最初の失敗で中断する。
    pub async fn upload_objects(
        &self,
        bucket_key: &str,
        objects: Vec<(ObjectKey, Vec<u8>)>,
    ) -> JobResult<Vec<ObjectKey>> {
        try_join_all(
            objects
                .iter()
                .map(|(key, content)| self.upload_object(bucket_key, key.clone(), content)),
        )
        .await
    }

    /// 署名付きダウンロードURLを発行する
    ///
    /// # Arguments
    ///
    /// * `expires_in_secs` - 有効期限（秒、60〜3600）。分単位に切り捨てられる
    ///
    /// # Errors
    ///
    /// 有効期限が範囲外、または要求が失敗した場合に `JobError::Staging`
    pub async fn download_url(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        expires_in_secs: u64,
    ) -> JobResult<DownloadGrant> {
        let minutes = ExpiryPolicy::minutes_for(expires_in_secs)?;
        let url = self
            .repository
            .signed_download(bucket_key, object_key, minutes)
            .await?;

        Ok(DownloadGrant::new(
            url,
            ExpiryPolicy::effective_duration(minutes),
        ))
    }
}
