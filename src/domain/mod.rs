//! # Domain Layer
//!
//! このモジュールはジョブライフサイクルの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - HTTPやファイルシステムについて何も知らない
//! - フレームワークに依存しない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（WorkItem, UploadSessionなど）
//! - **errors**: ジョブ実行エラーの分類
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（ビジネスルール）

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
