//! # Domain Services
//!
//! エンティティに属さないビジネスルール
//!
//! - **TemplateService**: プレースホルダー置換
//! - **ExpiryPolicy**: ダウンロードURL有効期限の変換

pub mod expiry;
pub mod template;
