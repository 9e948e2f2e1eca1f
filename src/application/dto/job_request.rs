//! # Job Request DTO
//!
//! ジョブ実行要求のData Transfer Object

use std::time::Duration;

use crate::domain::entities::object_key::ObjectKey;
use crate::domain::services::template::{TemplateBindings, TemplateService};

/// ワークアイテム記述テンプレートのファイル名
pub const WORK_ITEM_TEMPLATE_NAME: &str = "work_item.json";
/// スクリプトラッパーのファイル名（テンプレートとアップロード先で共通）
pub const SCRIPT_WRAPPER_NAME: &str = "execute_script.scr";

/// 入力ファイル
#[derive(Debug, Clone)]
pub struct InputFile {
    /// ファイル名（オブジェクトキーに使用）
    pub name: String,
    /// ファイル内容
    pub content: Vec<u8>,
}

/// 描画前のテンプレートとスクリプト本文
#[derive(Debug, Clone)]
pub struct JobTemplates {
    /// ワークアイテム記述（JSON）のテンプレート
    pub work_item: String,
    /// スクリプトラッパーのテンプレート
    pub script_wrapper: String,
    /// 実行するスクリプト本文（置換しない）
    pub script: String,
}

/// ジョブ実行要求
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// バケットキー
    pub bucket_name: String,
    /// アクティビティID（リモート処理パイプライン）
    pub activity_id: String,
    /// 入力ファイル
    pub input: InputFile,
    /// スクリプトのファイル名
    pub script_name: String,
    /// 出力ファイル名
    pub output_name: String,
    /// テンプレート
    pub templates: JobTemplates,
    /// ポーリングのタイムアウト
    pub timeout: Duration,
    /// ダウンロードURLの有効期限（秒）
    pub url_expiry_secs: u64,
}

impl JobRequest {
    /// テンプレート描画用のバインディングを作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use std::time::Duration;
    /// use da_runner::application::dto::job_request::{InputFile, JobRequest, JobTemplates};
    /// use da_runner::domain::entities::object_key::ObjectKey;
    ///
    /// let request = JobRequest {
    ///     bucket_name: "da-bucket".to_string(),
    ///     activity_id: "AutoCAD.ModifyTitleBlock+prod".to_string(),
    ///     input: InputFile { name: "plan.dwg".to_string(), content: vec![] },
    ///     script_name: "modify_title.lsp".to_string(),
    ///     output_name: "result.pdf".to_string(),
    ///     templates: JobTemplates {
    ///         work_item: String::new(),
    ///         script_wrapper: String::new(),
    ///         script: String::new(),
    ///     },
    ///     timeout: Duration::from_secs(300),
    ///     url_expiry_secs: 3600,
    /// };
    ///
    /// let bindings = request.bindings(&ObjectKey::input("plan.dwg").unwrap());
    /// assert_eq!(bindings["input_file_key"], "input/plan.dwg");
    /// assert_eq!(bindings["lisp_file"], "modify_title.lsp");
    /// ```
    pub fn bindings(&self, input_key: &ObjectKey) -> TemplateBindings {
        TemplateService::bindings([
            ("bucket_name", self.bucket_name.as_str()),
            ("input_file_key", input_key.as_str()),
            ("lisp_file", self.script_name.as_str()),
            ("output_file", self.output_name.as_str()),
            ("activity_id", self.activity_id.as_str()),
        ])
    }
}
