//! # Work Item Repository Trait
//!
//! ワークアイテムの投入とステータス取得を抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::work_item::{WorkItemDescription, WorkItemId, WorkItemSnapshot};
use crate::domain::errors::JobResult;

/// ワークアイテムリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// ワークアイテムを投入する（1回のみ、リトライしない）
    ///
    /// # Errors
    ///
    /// 非成功レスポンス、またはIDを含まないレスポンスの場合に `JobError::Submission`
    async fn submit(&self, description: &WorkItemDescription) -> JobResult<WorkItemId>;

    /// 現在のステータスを取得する
    ///
    /// # Errors
    ///
    /// 取得に失敗した場合に `JobError::Poll`
    async fn status(&self, id: &WorkItemId) -> JobResult<WorkItemSnapshot>;
}
