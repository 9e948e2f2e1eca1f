//! # Template Repository Trait
//!
//! ジョブ記述テンプレートとスクリプトの読み込みを抽象化

use anyhow::Result;

/// テンプレートリポジトリ
pub trait TemplateRepository: Send + Sync {
    /// 名前を指定してテンプレート（またはスクリプト本文）を読み込む
    ///
    /// # Arguments
    ///
    /// * `name` - ファイル名（例: `work_item.json`）
    ///
    /// # Errors
    ///
    /// 読み込みに失敗した場合にエラーを返す
    fn load(&self, name: &str) -> Result<String>;
}
