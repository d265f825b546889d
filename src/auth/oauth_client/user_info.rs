//! # 用户资料拉取
//!
//! 用提供商访问令牌调用资料接口，按提供商解析为 `ProviderProfile`。

use oauth2::AccessToken;
use reqwest::header::ACCEPT;

use crate::auth::utils::AuthUtils;
use crate::config::ProviderEndpoints;
use crate::error::{OAuthError, OAuthResult};
use crate::provider::profile::ProviderProfile;

/// 资料接口客户端
#[derive(Debug, Clone)]
pub struct UserInfoClient {
    http_client: reqwest::Client,
}

impl UserInfoClient {
    #[must_use]
    pub const fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// 拉取用户资料
    pub async fn fetch_profile(
        &self,
        endpoints: &ProviderEndpoints,
        access_token: &AccessToken,
    ) -> OAuthResult<ProviderProfile> {
        let response = self
            .http_client
            .get(&endpoints.user_info_uri)
            .bearer_auth(access_token.secret())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| OAuthError::ProfileFetchFailed(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            OAuthError::ProfileFetchFailed(format!("Failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(OAuthError::ProfileFetchFailed(format!(
                "HTTP {status}: {}",
                AuthUtils::body_excerpt(&String::from_utf8_lossy(&body))
            )));
        }

        ProviderProfile::parse(endpoints.kind, &body)
    }
}
