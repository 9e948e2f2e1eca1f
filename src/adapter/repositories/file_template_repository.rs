//! File Template Repository Implementation
//!
//! TemplateRepositoryのファイルシステム実装（スクリプトディレクトリから読み込む）

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::adapter::config::expand_path;
use crate::domain::repositories::template_repository::TemplateRepository;

/// ファイルベースのテンプレートリポジトリ
pub struct FileTemplateRepository {
    root: PathBuf,
}

impl FileTemplateRepository {
    /// 新しいリポジトリを作成
    ///
    /// # Arguments
    ///
    /// * `root` - テンプレートを置くディレクトリ（`~` は展開される）
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(expand_path(root)),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl TemplateRepository for FileTemplateRepository {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        debug!("Loading template {}", path.display());
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template: {}", path.display()))
    }
}
