//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **ObjectStagingClient**: バケット確保とオブジェクトのステージング
//! - **WorkItemOrchestrator**: ワークアイテムの投入とポーリング
//! - **JobRunner**: ジョブ全体の実行

pub mod await_work_item;
pub mod run_job;
pub mod stage_objects;
