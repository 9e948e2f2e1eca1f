//! # ObjectKey Value Object
//!
//! バケット内のオブジェクトキー
//!
//! 論理的な役割（入力・出力・スクリプト）からキーへの対応は命名規則のみで決まる。

use std::fmt;

use crate::domain::errors::{JobError, JobResult};

const INPUT_PREFIX: &str = "input";
const OUTPUT_PREFIX: &str = "output";
const SCRIPT_PREFIX: &str = "scripts";

/// オブジェクトキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// 任意のキーを作成
    ///
    /// # Errors
    ///
    /// 空文字列の場合に `JobError::Staging`
    pub fn new(key: impl Into<String>) -> JobResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(JobError::Staging("object key must not be empty".to_string()));
        }
        Ok(Self(key))
    }

    /// 入力ファイルのキー（`input/<filename>`）
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::entities::object_key::ObjectKey;
    ///
    /// let key = ObjectKey::input("drawing.dwg").unwrap();
    /// assert_eq!(key.as_str(), "input/drawing.dwg");
    /// assert_eq!(key.file_name(), "drawing.dwg");
    /// ```
    pub fn input(file_name: &str) -> JobResult<Self> {
        Self::with_prefix(INPUT_PREFIX, file_name)
    }

    /// 出力ファイルのキー（`output/<filename>`）
    pub fn output(file_name: &str) -> JobResult<Self> {
        Self::with_prefix(OUTPUT_PREFIX, file_name)
    }

    /// スクリプトアセットのキー（`scripts/<filename>`）
    pub fn script(file_name: &str) -> JobResult<Self> {
        Self::with_prefix(SCRIPT_PREFIX, file_name)
    }

    fn with_prefix(prefix: &str, file_name: &str) -> JobResult<Self> {
        if file_name.trim().is_empty() {
            return Err(JobError::Staging(format!(
                "file name for '{}' object must not be empty",
                prefix
            )));
        }
        Self::new(format!("{}/{}", prefix, file_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 最後のパス要素
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
