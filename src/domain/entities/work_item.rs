//! # WorkItem Entity
//!
//! リモートジョブ（ワークアイテム）のエンティティ

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::{JobError, JobResult};

/// ワークアイテムID
///
/// リモートサービスが投入時に一度だけ採番する。以降は不変。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(String);

impl WorkItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ワークアイテムのステータス
///
/// 終端状態は `Succeeded`, `Failed`, `Cancelled` のみ。
/// 未知のステータスは実行中として扱う（将来追加される中間状態への前方互換）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkItemStatus {
    Pending,
    InProgress,
    Succeeded,
    /// 失敗（`failedDownload` などの詳細な理由を保持）
    Failed(String),
    Cancelled,
    Unknown(String),
}

impl WorkItemStatus {
    /// サービスが返すステータス文字列を解釈する
    ///
    /// 大文字小文字は区別しない。
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::entities::work_item::WorkItemStatus;
    ///
    /// assert_eq!(WorkItemStatus::parse("success"), WorkItemStatus::Succeeded);
    /// assert_eq!(WorkItemStatus::parse("Succeeded"), WorkItemStatus::Succeeded);
    /// assert!(WorkItemStatus::parse("failedInstructions").is_terminal());
    /// assert!(!WorkItemStatus::parse("queued").is_terminal());
    /// ```
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "pending" => WorkItemStatus::Pending,
            "inprogress" | "in_progress" => WorkItemStatus::InProgress,
            "success" | "succeeded" => WorkItemStatus::Succeeded,
            "cancelled" | "canceled" => WorkItemStatus::Cancelled,
            s if s.starts_with("failed") => WorkItemStatus::Failed(raw.trim().to_string()),
            _ => WorkItemStatus::Unknown(raw.to_string()),
        }
    }

    /// 終端状態かどうか
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkItemStatus::Succeeded | WorkItemStatus::Failed(_) | WorkItemStatus::Cancelled
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WorkItemStatus::Succeeded)
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItemStatus::Pending => f.write_str("Pending"),
            WorkItemStatus::InProgress => f.write_str("InProgress"),
            WorkItemStatus::Succeeded => f.write_str("Succeeded"),
            WorkItemStatus::Failed(reason) => f.write_str(reason),
            WorkItemStatus::Cancelled => f.write_str("Cancelled"),
            WorkItemStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for WorkItemStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for WorkItemStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<WorkItemStatus> for String {
    fn from(status: WorkItemStatus) -> Self {
        status.to_string()
    }
}

/// ワークアイテムの記述（投入するJSONボディ）
///
/// テンプレートから生成された文字列をJSONオブジェクトとして検証したもの
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItemDescription {
    body: Value,
}

impl WorkItemDescription {
    /// JSON文字列からワークアイテム記述を作成
    ///
    /// # Errors
    ///
    /// JSONとして不正、またはオブジェクトでない場合に `JobError::Submission`
    pub fn from_json(rendered: &str) -> JobResult<Self> {
        let body: Value = serde_json::from_str(rendered)
            .map_err(|e| JobError::Submission(format!("malformed work item description: {}", e)))?;
        Self::from_value(body)
    }

    pub fn from_value(body: Value) -> JobResult<Self> {
        if !body.is_object() {
            return Err(JobError::Submission(
                "work item description must be a JSON object".to_string(),
            ));
        }
        Ok(Self { body })
    }

    /// アクティビティID（リモート処理パイプラインの識別子）
    pub fn activity_id(&self) -> Option<&str> {
        self.body.get("activityId").and_then(Value::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// ポーリングで取得したステータスのスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItemSnapshot {
    pub id: WorkItemId,
    pub status: WorkItemStatus,
    /// 実行レポートのURL（サービスが返した場合のみ）
    pub report_url: Option<String>,
    /// レスポンス全体
    pub payload: Value,
}

/// 成功したワークアイテムの結果
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItemResult {
    pub id: WorkItemId,
    pub report_url: Option<String>,
    pub payload: Value,
}

impl From<WorkItemSnapshot> for WorkItemResult {
    fn from(snapshot: WorkItemSnapshot) -> Self {
        Self {
            id: snapshot.id,
            report_url: snapshot.report_url,
            payload: snapshot.payload,
        }
    }
}
