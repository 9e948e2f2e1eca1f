//! Design Automation Work Item Repository Implementation
//!
//! WorkItemRepositoryのAPS Design Automation v3実装

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::adapter::aps::client::ApsClient;
use crate::adapter::aps::models::{work_item_id, work_item_snapshot};
use crate::domain::entities::work_item::{WorkItemDescription, WorkItemId, WorkItemSnapshot};
use crate::domain::errors::{JobError, JobResult};
use crate::domain::repositories::work_item_repository::WorkItemRepository;

/// Design Automationワークアイテムリポジトリ
pub struct DaWorkItemRepository {
    client: Arc<ApsClient>,
    region: String,
}

impl DaWorkItemRepository {
    /// 新しいリポジトリを作成
    ///
    /// # Arguments
    ///
    /// * `client` - APSクライアント
    /// * `region` - Design Automationのリージョン（例: `us-east`）
    pub fn new(client: Arc<ApsClient>, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

#[async_trait]
impl WorkItemRepository for DaWorkItemRepository {
    async fn submit(&self, description: &WorkItemDescription) -> JobResult<WorkItemId> {
        let url = self
            .client
            .endpoint(&["da", self.region.as_str(), "v3", "workitems"])
            .map_err(|e| e.into_job_error(JobError::Submission))?;
        let body = description.body();

        let payload: Value = self
            .client
            .execute_json("work item submission", false, |http| {
                http.post(url.clone()).json(body)
            })
            .await
            .map_err(|e| e.into_job_error(JobError::Submission))?;

        work_item_id(&payload).map_err(|e| e.into_job_error(JobError::Submission))
    }

    async fn status(&self, id: &WorkItemId) -> JobResult<WorkItemSnapshot> {
        let url = self
            .client
            .endpoint(&["da", self.region.as_str(), "v3", "workitems", id.as_str()])
            .map_err(|e| e.into_job_error(JobError::Poll))?;

        let payload: Value = self
            .client
            .execute_json("work item status", true, |http| http.get(url.clone()))
            .await
            .map_err(|e| e.into_job_error(JobError::Poll))?;

        let snapshot =
            work_item_snapshot(id, payload).map_err(|e| e.into_job_error(JobError::Poll))?;
        debug!("Work item {} reported status {}", id, snapshot.status);
        Ok(snapshot)
    }
}
