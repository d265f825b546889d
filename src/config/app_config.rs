//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use super::provider_config::ProvidersConfig;

/// 会话令牌默认有效期（秒）
pub const DEFAULT_JWT_EXPIRES_IN: i64 = 86_400;

/// HS256 密钥最短长度（字节）
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 前端回调配置
    #[serde(default)]
    pub frontend: FrontendConfig,
    /// 会话令牌配置
    pub jwt: JwtConfig,
    /// 第三方调用参数
    #[serde(default)]
    pub oauth: OAuthSettings,
    /// 各登录提供商凭据
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 是否启用CORS
    pub enable_cors: bool,
    /// 允许的CORS源地址
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// 前端回调配置
///
/// `callback_url` 允许为空：启动时不校验，回调时按未配置处理。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// 登录结束后浏览器被重定向到的前端地址
    pub callback_url: String,
}

/// 会话令牌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC 签名密钥
    pub secret: String,
    /// 有效期（秒）
    #[serde(default = "default_jwt_expires_in")]
    pub expires_in: i64,
}

const fn default_jwt_expires_in() -> i64 {
    DEFAULT_JWT_EXPIRES_IN
}

/// 第三方 HTTP 调用参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    /// 单次 HTTP 请求超时（秒）
    pub http_timeout_secs: u64,
    /// 换取令牌 + 拉取资料整体截止时间（秒）
    pub request_deadline_secs: u64,
    /// 请求第三方时使用的 User-Agent
    pub user_agent: String,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            http_timeout_secs: 10,
            request_deadline_secs: 20,
            user_agent: concat!("auth-broker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AppConfig {
    /// 以给定密钥构建其余字段取默认值的配置
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            frontend: FrontendConfig::default(),
            jwt: JwtConfig {
                secret: secret.into(),
                expires_in: DEFAULT_JWT_EXPIRES_IN,
            },
            oauth: OAuthSettings::default(),
            providers: ProvidersConfig::default(),
        }
    }
}
