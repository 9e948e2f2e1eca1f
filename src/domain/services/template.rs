//! # Template Service
//!
//! プレースホルダー置換によるテンプレート描画

use std::collections::BTreeMap;

/// テンプレートのバインディング（プレースホルダー名 → 値）
pub type TemplateBindings = BTreeMap<String, String>;

/// テンプレートサービス
///
/// `{name}` 形式のプレースホルダーを置換する。テンプレートの構文解析は行わない。
pub struct TemplateService;

impl TemplateService {
    /// テンプレートを描画する
    ///
    /// バインディングに存在するプレースホルダーのみ置換し、
    /// 未知のプレースホルダーはそのまま残す。
    ///
    /// # Arguments
    ///
    /// * `template` - テンプレート文字列
    /// * `bindings` - プレースホルダー名と値の対応
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::services::template::{TemplateBindings, TemplateService};
    ///
    /// let mut bindings = TemplateBindings::new();
    /// bindings.insert("lisp_file".to_string(), "modify_title.lsp".to_string());
    ///
    /// let rendered = TemplateService::render("(load \"{lisp_file}\") {other}", &bindings);
    /// assert_eq!(rendered, "(load \"modify_title.lsp\") {other}");
    /// ```
    pub fn render(template: &str, bindings: &TemplateBindings) -> String {
        bindings
            .iter()
            .fold(template.to_string(), |rendered, (name, value)| {
                rendered.replace(&format!("{{{}}}", name), value)
            })
    }

    /// バインディングを作成するヘルパー
    pub fn bindings<'a, I>(pairs: I) -> TemplateBindings
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
