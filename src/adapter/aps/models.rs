//! APS Wire Models
//!
//! リクエスト/レスポンスのJSON表現

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::work_item::{WorkItemId, WorkItemSnapshot, WorkItemStatus};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketRequest<'a> {
    pub bucket_key: &'a str,
    pub policy_key: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketDetailsResponse {
    pub bucket_key: String,
    #[serde(default)]
    pub policy_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadResponse {
    pub upload_key: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest<'a> {
    pub upload_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SignedDownloadResponse {
    #[serde(alias = "signedUrl")]
    pub url: String,
}

/// Extract the id assigned to a freshly created work item
pub fn work_item_id(payload: &Value) -> Result<WorkItemId, ApiError> {
    payload
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(WorkItemId::new)
        .ok_or_else(|| ApiError::InvalidResponse("work item response has no id".to_string()))
}

/// Build a status snapshot, keeping the whole payload
pub fn work_item_snapshot(requested: &WorkItemId, payload: Value) -> Result<WorkItemSnapshot, ApiError> {
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .map(WorkItemStatus::parse)
        .ok_or_else(|| {
            ApiError::InvalidResponse(format!("work item {} response has no status", requested))
        })?;

    let id = payload
        .get("id")
        .and_then(Value::as_str)
        .map(WorkItemId::new)
        .unwrap_or_else(|| requested.clone());

    let report_url = payload
        .get("reportUrl")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(WorkItemSnapshot {
        id,
        status,
        report_url,
        payload,
    })
}
