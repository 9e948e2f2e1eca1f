//! Repository Implementations
//!
//! Domain層のRepositoryトレイトの実装

pub mod da_work_item_repository;
pub mod file_template_repository;
pub mod oss_storage_repository;
