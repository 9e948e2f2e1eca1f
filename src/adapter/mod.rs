//! Adapter Layer
//!
//! 外部システム（APS API, ファイルシステム）との統合

pub mod aps;
pub mod auth;
pub mod config;
pub mod repositories;
