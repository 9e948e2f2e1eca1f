//! # UploadSession Value Object
//!
//! 署名付きアップロードセッション（1回のアップロードの間だけ存在する）

/// 署名付きアップロードセッション
///
/// 1つ以上の署名付きPUT URLと `uploadKey` の組。
/// 完了時に値として消費されるため、別のオブジェクトで再利用できない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    upload_key: String,
    urls: Vec<String>,
}

impl UploadSession {
    pub fn new(upload_key: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            upload_key: upload_key.into(),
            urls,
        }
    }

    pub fn upload_key(&self) -> &str {
        &self.upload_key
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn part_count(&self) -> usize {
        self.urls.len()
    }

    /// セッションを消費してURLと `uploadKey` を取り出す
    pub fn into_parts(self) -> (Vec<String>, String) {
        (self.urls, self.upload_key)
    }

    /// コンテンツ長とパートサイズから必要なパート数を計算
    ///
    /// 空のコンテンツでも1パートは必要
    ///
    /// # 例
    ///
    /// ```
    /// use da_runner::domain::entities::upload_session::UploadSession;
    ///
    /// assert_eq!(UploadSession::required_parts(0, 100), 1);
    /// assert_eq!(UploadSession::required_parts(100, 100), 1);
    /// assert_eq!(UploadSession::required_parts(101, 100), 2);
    /// ```
    pub fn required_parts(content_len: usize, part_size: usize) -> usize {
        if part_size == 0 {
            return 1;
        }
        content_len.div_ceil(part_size).max(1)
    }

    /// コンテンツをパートに分割
    ///
    /// 最後のパート以外は `part_size` バイト
    pub fn split_content(content: &[u8], part_size: usize) -> Vec<&[u8]> {
        if content.is_empty() || part_size == 0 {
            return vec![content];
        }
        content.chunks(part_size).collect()
    }
}
