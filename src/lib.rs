//! # Auth Broker Library
//!
//! 카카오 / 네이버 / Google 第三方登录代理：把提供商的授权码流程
//! 统一转换为内部签发的 HS256 会话令牌，并重定向回前端。

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod provider;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{BrokerError, Result};
