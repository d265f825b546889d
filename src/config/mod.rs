//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod manager;
mod provider_config;

pub use app_config::{
    AppConfig, DEFAULT_JWT_EXPIRES_IN, FrontendConfig, JwtConfig, MIN_JWT_SECRET_LEN,
    OAuthSettings, ServerConfig,
};
pub use manager::{CONFIG_PATH_ENV, ConfigManager, ENV_OVERRIDE_PREFIX};
pub use provider_config::{ProviderCredentials, ProviderEndpoints, ProvidersConfig};

use crate::error::Result;

/// 验证配置有效性
///
/// 前端回调地址不在此校验：为空时由回调重定向按未配置处理。
pub fn validate_config(config: &AppConfig) -> Result<()> {
    crate::ensure_config!(config.server.port != 0, "无效的服务器端口: 0");
    crate::ensure_config!(
        config.jwt.secret.len() >= MIN_JWT_SECRET_LEN,
        "JWT 密钥长度不足: 需要至少 {} 字节",
        MIN_JWT_SECRET_LEN
    );
    crate::ensure_config!(config.jwt.expires_in > 0, "JWT 有效期必须大于0");
    crate::ensure_config!(config.oauth.http_timeout_secs > 0, "HTTP超时必须大于0");
    crate::ensure_config!(
        config.oauth.request_deadline_secs > 0,
        "登录截止时间必须大于0"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn default_config_with_long_secret_is_valid() {
        assert!(validate_config(&AppConfig::with_secret(SECRET)).is_ok());
    }

    #[test]
    fn blank_frontend_url_is_accepted_at_load() {
        let mut config = AppConfig::with_secret(SECRET);
        config.frontend.callback_url = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::with_secret("short");
        assert!(validate_config(&config).is_err());

        config.jwt.secret = SECRET.to_string();
        config.jwt.expires_in = 0;
        assert!(validate_config(&config).is_err());

        config.jwt.expires_in = 60;
        config.server.port = 0;
        assert!(validate_config(&config).is_err());

        config.server.port = 8080;
        config.oauth.request_deadline_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
