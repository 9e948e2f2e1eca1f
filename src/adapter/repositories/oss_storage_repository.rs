//! OSS Storage Repository Implementation
//!
//! StorageRepositoryのAPS OSS実装（署名付きURLによるアップロード/ダウンロード）

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;

use crate::adapter::aps::client::ApsClient;
use crate::adapter::aps::error::ApiError;
use crate::adapter::aps::models::{
    BucketDetailsResponse, CompleteUploadRequest, CreateBucketRequest, SignedDownloadResponse,
    SignedUploadResponse,
};
use crate::domain::entities::bucket::{Bucket, BucketCreation, RetentionPolicy};
use crate::domain::entities::object_key::ObjectKey;
use crate::domain::entities::upload_session::UploadSession;
use crate::domain::errors::{JobError, JobResult};
use crate::domain::repositories::storage_repository::StorageRepository;

/// OSSストレージリポジトリ
pub struct OssStorageRepository {
    client: Arc<ApsClient>,
}

impl OssStorageRepository {
    /// 新しいリポジトリを作成
    pub fn new(client: Arc<ApsClient>) -> Self {
        Self { client }
    }

    fn staging_error(e: ApiError) -> JobError {
        e.into_job_error(JobError::Staging)
    }

    fn object_endpoint(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        action: &str,
    ) -> JobResult<reqwest::Url> {
        self.client
            .endpoint(&[
                "oss",
                "v2",
                "buckets",
                bucket_key,
                "objects",
                object_key.as_str(),
                action,
            ])
            .map_err(Self::staging_error)
    }
}

#[async_trait]
impl StorageRepository for OssStorageRepository {
    async fn bucket_details(&self, bucket_key: &str) -> JobResult<Option<Bucket>> {
        let url = self
            .client
            .endpoint(&["oss", "v2", "buckets", bucket_key, "details"])
            .map_err(Self::staging_error)?;

        let result = self
            .client
            .execute_json::<BucketDetailsResponse, _>("bucket details", true, |http| {
                http.get(url.clone())
            })
            .await;

        match result {
            Ok(details) => Ok(Some(Bucket {
                key: details.bucket_key,
                policy: details.policy_key.as_deref().and_then(RetentionPolicy::parse),
            })),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(Self::staging_error(e)),
        }
    }

    async fn create_bucket(
        &self,
        bucket_key: &str,
        policy: RetentionPolicy,
    ) -> JobResult<BucketCreation> {
        let url = self
            .client
            .endpoint(&["oss", "v2", "buckets"])
            .map_err(Self::staging_error)?;
        let body = CreateBucketRequest {
            bucket_key,
            policy_key: policy.as_str(),
        };

        let result = self
            .client
            .execute("bucket create", true, |http| http.post(url.clone()).json(&body))
            .await;

        match result {
            Ok(_) => Ok(BucketCreation::Created),
            Err(e) if e.is_conflict() => Ok(BucketCreation::AlreadyExists),
            Err(e) => Err(Self::staging_error(e)),
        }
    }

    async fn request_upload(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        parts: usize,
    ) -> JobResult<UploadSession> {
        let mut url = self.object_endpoint(bucket_key, object_key, "signeds3upload")?;
        url.query_pairs_mut()
            .append_pair("parts", &parts.max(1).to_string());

        let response: SignedUploadResponse = self
            .client
            .execute_json("signed upload request", true, |http| http.get(url.clone()))
            .await
            .map_err(Self::staging_error)?;

        if response.urls.is_empty() {
            return Err(JobError::Staging(format!(
                "upload session for {} has no URLs",
                object_key
            )));
        }

        debug!(
            "Upload session for {}: {} URL(s)",
            object_key,
            response.urls.len()
        );
        Ok(UploadSession::new(response.upload_key, response.urls))
    }

    async fn put_part(&self, url: &str, content: Vec<u8>) -> JobResult<()> {
        self.client
            .put_signed(url, Bytes::from(content))
            .await
            .map_err(Self::staging_error)
    }

    async fn complete_upload(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        upload_key: &str,
    ) -> JobResult<()> {
        let url = self.object_endpoint(bucket_key, object_key, "signeds3upload")?;
        let body = CompleteUploadRequest { upload_key };

        self.client
            .execute("upload finalize", false, |http| {
                http.post(url.clone()).json(&body)
            })
            .await
            .map(|_| ())
            .map_err(Self::staging_error)
    }

    async fn signed_download(
        &self,
        bucket_key: &str,
        object_key: &ObjectKey,
        minutes: u32,
    ) -> JobResult<String> {
        let mut url = self.object_endpoint(bucket_key, object_key, "signeds3download")?;
        url.query_pairs_mut()
            .append_pair("minutesExpiration", &minutes.to_string());

        let response: SignedDownloadResponse = self
            .client
            .execute_json("signed download request", true, |http| {
                http.get(url.clone())
            })
            .await
            .map_err(Self::staging_error)?;

        Ok(response.url)
    }
}
