//! # 认证模块
//!
//! 提供商登录结果到内部会话的转换：OAuth 客户端、身份规范化、会话令牌。

pub mod identity;
pub mod jwt;
pub mod oauth_client;
pub mod types;
pub mod utils;

pub use identity::normalize;
pub use jwt::SessionTokenManager;
pub use oauth_client::{HttpOAuthGateway, OAuthGateway};
pub use types::{NormalizedIdentity, SessionClaims};
