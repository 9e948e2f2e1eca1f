//! # Data Transfer Objects
//!
//! ユースケースに渡すデータ

pub mod job_request;
