//! APS HTTP Module
//!
//! APS API（OSS, Design Automation）へのHTTPアクセス

pub mod client;
pub mod error;
pub mod models;
pub mod retry;

pub use client::ApsClient;
pub use error::ApiError;
