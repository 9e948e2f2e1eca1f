//! Authentication Module
//!
//! APS認証関連の機能

pub mod aps_auth;
pub mod token_provider;

pub use aps_auth::ApsTokenRepository;
pub use token_provider::TokenProvider;
