//! # Work Item Orchestration Use Case
//!
//! ワークアイテムの投入と、終端状態までのポーリング

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::domain::entities::work_item::{
    WorkItemDescription, WorkItemId, WorkItemResult, WorkItemStatus,
};
use crate::domain::errors::{JobError, JobResult};
use crate::domain::repositories::work_item_repository::WorkItemRepository;

/// デフォルトのポーリング間隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// ワークアイテムオーケストレーター
///
/// ステータスは値でポーリングする（プッシュ通知なし）
pub struct WorkItemOrchestrator<W: WorkItemRepository> {
    repository: Arc<W>,
    poll_interval: Duration,
}

impl<W: WorkItemRepository> WorkItemOrchestrator<W> {
    /// 新しいオーケストレーターを作成
    pub fn new(repository: Arc<W>) -> Self {
        Self {
            repository,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// ポーリング間隔を指定
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// ワークアイテムを投入する
    ///
    /// # Errors
    ///
    /// 投入が拒否された場合に `JobError::Submission`
    pub async fn submit(&self, description: &WorkItemDescription) -> JobResult<WorkItemId> {
        let id = self.repository.submit(description).await?;
        info!(
            "Submitted work item {} (activity: {})",
            id,
            description.activity_id().unwrap_or("<unspecified>")
        );
        Ok(id)
    }

    /// 終端状態に到達するまでポーリングする
    ///
    /// 最初のポーリングは即座に行う。待機は期限を越えず、
    /// キャンセルされた場合は次のティックを待たずに戻る。
    /// タイムアウトしてもリモートジョブのキャンセルは要求しない。
    ///
    /// # Arguments
    ///
    /// * `id` - ワークアイテムID
    /// * `timeout` - 経過時間の上限
    /// * `cancel` - 外部キャンセルシグナル
    ///
    /// # Errors
    ///
    /// - `Failed` / `Cancelled` の場合は `JobError::JobFailed`
    /// - 期限切れの場合は `JobError::JobTimeout`
    /// - キャンセルされた場合は `JobError::Cancelled`
    pub async fn await_completion(
        &self,
        id: &WorkItemId,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> JobResult<WorkItemResult> {
        let deadline = Instant::now() + timeout;
        let mut polls: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(JobError::Cancelled);
            }

            // 応答待ちのリクエストも期限で打ち切る
            let snapshot = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(JobError::Cancelled),
                snapshot = self.repository.status(id) => snapshot?,
                _ = sleep_until(deadline) => {
                    warn!(
                        "Status request for work item {} did not finish within {}s",
                        id,
                        timeout.as_secs()
                    );
                    return Err(JobError::JobTimeout { timeout });
                }
            };
            polls += 1;
            debug!("Work item {} status: {} (poll {})", id, snapshot.status, polls);

            match snapshot.status {
                WorkItemStatus::Succeeded => {
                    info!("Work item {} succeeded after {} poll(s)", id, polls);
                    return Ok(snapshot.into());
                }
                WorkItemStatus::Failed(_) | WorkItemStatus::Cancelled => {
                    warn!("Work item {} finished with status {}", id, snapshot.status);
                    return Err(JobError::JobFailed {
                        status: snapshot.status,
                        report_url: snapshot.report_url,
                    });
                }
                WorkItemStatus::Pending
                | WorkItemStatus::InProgress
                | WorkItemStatus::Unknown(_) => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(JobError::JobTimeout { timeout });
            }

            let wake_at = std::cmp::min(now + self.poll_interval, deadline);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(JobError::Cancelled),
                _ = sleep_until(wake_at) => {}
            }

            if Instant::now() >= deadline {
                warn!(
                    "Work item {} still running after {}s, giving up (remote job left running)",
                    id,
                    timeout.as_secs()
                );
                return Err(JobError::JobTimeout { timeout });
            }
        }
    }
}
