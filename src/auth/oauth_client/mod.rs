//! # `OAuth客户端模块`
//!
//! 授权码流程中与提供商交互的两步：
//! - `token_exchange`：授权码换访问令牌
//! - `user_info`：访问令牌换用户资料
//!
//! 两者共用一个带连接池的 `reqwest::Client`，通过 `OAuthGateway` 暴露给登录流程。

pub mod token_exchange;
pub mod user_info;

pub use token_exchange::{ProviderTokenResponse, TokenExchangeClient};
pub use user_info::UserInfoClient;

use std::time::Duration;

use async_trait::async_trait;
use oauth2::{AccessToken, AuthorizationCode};

use crate::config::{OAuthSettings, ProviderEndpoints};
use crate::error::{BrokerError, OAuthResult, Result};
use crate::provider::profile::ProviderProfile;

/// 登录流程依赖的提供商网关
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthGateway: Send + Sync {
    /// 授权码换访问令牌
    async fn exchange_code(
        &self,
        endpoints: &ProviderEndpoints,
        code: &AuthorizationCode,
    ) -> OAuthResult<ProviderTokenResponse>;

    /// 访问令牌换用户资料
    async fn fetch_profile(
        &self,
        endpoints: &ProviderEndpoints,
        access_token: &AccessToken,
    ) -> OAuthResult<ProviderProfile>;
}

/// 基于 HTTP 的网关实现
#[derive(Debug, Clone)]
pub struct HttpOAuthGateway {
    token_client: TokenExchangeClient,
    user_info_client: UserInfoClient,
}

impl HttpOAuthGateway {
    /// 按 `[oauth]` 配置构建共享 HTTP 客户端
    pub fn new(settings: &OAuthSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| BrokerError::config_with_source("Failed to build OAuth HTTP client", e))?;

        Ok(Self::with_client(http_client))
    }

    #[must_use]
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self {
            token_client: TokenExchangeClient::new(http_client.clone()),
            user_info_client: UserInfoClient::new(http_client),
        }
    }
}

#[async_trait]
impl OAuthGateway for HttpOAuthGateway {
    async fn exchange_code(
        &self,
        endpoints: &ProviderEndpoints,
        code: &AuthorizationCode,
    ) -> OAuthResult<ProviderTokenResponse> {
        self.token_client.exchange_code(endpoints, code).await
    }

    async fn fetch_profile(
        &self,
        endpoints: &ProviderEndpoints,
        access_token: &AccessToken,
    ) -> OAuthResult<ProviderProfile> {
        self.user_info_client
            .fetch_profile(endpoints, access_token)
            .await
    }
}
