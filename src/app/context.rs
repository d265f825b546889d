//! 应用上下文（DI 容器）
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use crate::auth::jwt::SessionTokenManager;
use crate::auth::oauth_client::{HttpOAuthGateway, OAuthGateway};
use crate::config::{AppConfig, ProviderEndpoints, validate_config};
use crate::error::Result;
use crate::management::redirect::CallbackResponder;
use crate::provider::types::ProviderKind;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub token_manager: Arc<SessionTokenManager>,
    pub oauth: Arc<dyn OAuthGateway>,
    pub responder: CallbackResponder,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("token_manager", &self.token_manager)
            .field("responder", &self.responder)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(
        config: Arc<AppConfig>,
        token_manager: Arc<SessionTokenManager>,
        oauth: Arc<dyn OAuthGateway>,
    ) -> Self {
        let responder = CallbackResponder::new(config.frontend.callback_url.clone());
        Self {
            config,
            token_manager,
            oauth,
            responder,
        }
    }

    /// 校验配置并构建默认的 HTTP 网关
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self> {
        validate_config(&config)?;
        let token_manager = Arc::new(SessionTokenManager::new(&config.jwt)?);
        let oauth: Arc<dyn OAuthGateway> = Arc::new(HttpOAuthGateway::new(&config.oauth)?);
        Ok(Self::new(config, token_manager, oauth))
    }

    /// 某个提供商合并默认值后的端点
    #[must_use]
    pub fn endpoints(&self, kind: ProviderKind) -> ProviderEndpoints {
        self.config.providers.endpoints(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrokerError;

    #[test]
    fn from_config_rejects_short_secret() {
        let config = Arc::new(AppConfig::with_secret("short"));
        let err = AppContext::from_config(config).unwrap_err();
        assert!(matches!(err, BrokerError::Config { .. }));
    }

    #[test]
    fn from_config_builds_with_valid_secret() {
        let config = Arc::new(AppConfig::with_secret("0123456789abcdef0123456789abcdef"));
        let context = AppContext::from_config(config).unwrap();
        assert_eq!(context.token_manager.ttl_seconds(), 86_400);
        assert_eq!(
            context.endpoints(ProviderKind::Google).token_uri,
            "https://oauth2.googleapis.com/token"
        );
    }
}
