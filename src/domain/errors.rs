//! # Job Errors
//!
//! ジョブライフサイクル全体で使用するエラー分類
//!
//! 各ステージ（認証、ステージング、投入、ポーリング）の失敗は
//! この閉じた列挙型のいずれかとして呼び出し元へ伝播する。

use std::time::Duration;

use thiserror::Error;

use super::entities::work_item::WorkItemStatus;

/// ジョブ実行エラー
#[derive(Debug, Error)]
pub enum JobError {
    /// クライアント資格情報の交換に失敗
    #[error("authentication failed: {0}")]
    Auth(String),

    /// バケットまたはオブジェクト操作に失敗
    #[error("staging failed: {0}")]
    Staging(String),

    /// ワークアイテムの投入に失敗（不正なジョブ記述または拒否）
    #[error("work item submission failed: {0}")]
    Submission(String),

    /// ワークアイテムのステータス取得に失敗
    #[error("work item status request failed: {0}")]
    Poll(String),

    /// ワークアイテムが失敗系の終端状態に到達
    #[error("work item failed: {status}")]
    JobFailed {
        status: WorkItemStatus,
        report_url: Option<String>,
    },

    /// タイムアウト（リモートジョブは実行中のまま残る）
    #[error("work item timeout: {}s", .timeout.as_secs())]
    JobTimeout { timeout: Duration },

    /// 外部からのキャンセル
    #[error("work item polling was cancelled")]
    Cancelled,
}

/// ジョブ実行結果
pub type JobResult<T> = Result<T, JobError>;

impl JobError {
    /// リモートジョブ自体の失敗かどうか
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::errors::JobError;
    /// use da_runner::domain::entities::work_item::WorkItemStatus;
    ///
    /// let failed = JobError::JobFailed {
    ///     status: WorkItemStatus::Cancelled,
    ///     report_url: None,
    /// };
    /// assert!(failed.is_remote_failure());
    /// assert!(!JobError::Staging("boom".to_string()).is_remote_failure());
    /// ```
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, JobError::JobFailed { .. })
    }
}
