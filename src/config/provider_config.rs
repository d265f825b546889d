//! # 登录提供商凭据配置
//!
//! 配置文件只需填写凭据；端点地址缺省取描述表中的官方地址，可按需覆盖。

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::provider::registry::{SecretPolicy, descriptor};
use crate::provider::types::ProviderKind;

/// `[providers]` 配置段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub kakao: ProviderCredentials,
    pub naver: ProviderCredentials,
    pub google: ProviderCredentials,
}

/// 单个提供商的凭据与可选端点覆盖
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    /// 客户端 ID（카카오 REST API 키）
    #[serde(alias = "rest_api_key")]
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorization_uri: Option<String>,
    pub token_uri: Option<String>,
    pub user_info_uri: Option<String>,
}

/// 合并默认值后的提供商端点，启动后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub kind: ProviderKind,
    pub authorization_uri: String,
    pub token_uri: String,
    pub user_info_uri: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

impl ProvidersConfig {
    #[must_use]
    pub const fn credentials(&self, kind: ProviderKind) -> &ProviderCredentials {
        match kind {
            ProviderKind::Kakao => &self.kakao,
            ProviderKind::Naver => &self.naver,
            ProviderKind::Google => &self.google,
        }
    }

    pub fn credentials_mut(&mut self, kind: ProviderKind) -> &mut ProviderCredentials {
        match kind {
            ProviderKind::Kakao => &mut self.kakao,
            ProviderKind::Naver => &mut self.naver,
            ProviderKind::Google => &mut self.google,
        }
    }

    /// 解析出某个提供商的最终端点
    #[must_use]
    pub fn endpoints(&self, kind: ProviderKind) -> ProviderEndpoints {
        let creds = self.credentials(kind);
        let desc = descriptor(kind);
        let pick = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        ProviderEndpoints {
            kind,
            authorization_uri: pick(&creds.authorization_uri, desc.default_authorization_uri),
            token_uri: pick(&creds.token_uri, desc.default_token_uri),
            user_info_uri: pick(&creds.user_info_uri, desc.default_user_info_uri),
            client_id: creds.client_id.trim().to_string(),
            client_secret: creds
                .client_secret
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            redirect_uri: creds.redirect_uri.trim().to_string(),
        }
    }
}

impl ProviderEndpoints {
    /// 回调处理前的配置检查：缺失必填项时直接报配置错误
    pub fn ensure_complete(&self) -> Result<()> {
        crate::ensure_config!(
            !self.client_id.is_empty(),
            "{} client_id 未配置",
            self.kind
        );
        crate::ensure_config!(
            !self.redirect_uri.is_empty(),
            "{} redirect_uri 未配置",
            self.kind
        );
        crate::ensure_config!(
            !self.authorization_uri.is_empty(),
            "{} authorization_uri 未配置",
            self.kind
        );
        if descriptor(self.kind).secret_policy == SecretPolicy::Required {
            crate::ensure_config!(
                self.client_secret.is_some(),
                "{} client_secret 未配置",
                self.kind
            );
        }
        Ok(())
    }

    /// 是否发送 `client_secret`
    #[must_use]
    pub fn secret_to_send(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }
}
