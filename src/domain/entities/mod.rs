//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **Credentials / AccessToken**: 資格情報とベアラートークン
//! - **Bucket**: ストレージバケット
//! - **ObjectKey**: バケット内のオブジェクトキー
//! - **UploadSession**: 署名付きアップロードセッション
//! - **WorkItem**: リモートジョブとそのステータス
//! - **DownloadGrant**: 署名付きダウンロードURL

pub mod bucket;
pub mod credentials;
pub mod download_grant;
pub mod object_key;
pub mod upload_session;
pub mod work_item;
