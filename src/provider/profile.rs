//! # 提供商用户资料结构
//!
//! 三家的资料接口形状互不兼容，这里按原样反序列化，规范化交给 `auth::identity`。

use serde::{Deserialize, Serialize};

use crate::error::{OAuthError, OAuthResult};

use super::types::ProviderKind;

/// 카카오 `/v2/user/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KakaoProfile {
    pub id: i64,
    #[serde(default)]
    pub connected_at: Option<String>,
    #[serde(default)]
    pub kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KakaoAccount {
    #[serde(default)]
    pub profile: Option<KakaoAccountProfile>,
    #[serde(default)]
    pub profile_nickname_needs_agreement: Option<bool>,
    #[serde(default)]
    pub profile_image_needs_agreement: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KakaoAccountProfile {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub thumbnail_image_url: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub is_default_image: Option<bool>,
}

/// 네이버 `/v1/nid/me`，外层是 `resultcode` 包装
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaverEnvelope {
    #[serde(default)]
    pub resultcode: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<NaverProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaverProfile {
    pub id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Google `/oauth2/v2/userinfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// 单次回调内的提供商资料
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderProfile {
    Kakao(KakaoProfile),
    Naver(NaverProfile),
    Google(GoogleProfile),
}

impl ProviderProfile {
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::Kakao(_) => ProviderKind::Kakao,
            Self::Naver(_) => ProviderKind::Naver,
            Self::Google(_) => ProviderKind::Google,
        }
    }

    /// 按提供商解析资料接口的响应体
    pub fn parse(kind: ProviderKind, body: &[u8]) -> OAuthResult<Self> {
        let malformed =
            |e: serde_json::Error| OAuthError::ProfileFetchFailed(format!("{kind} 资料响应无法解析: {e}"));

        match kind {
            ProviderKind::Kakao => serde_json::from_slice(body).map(Self::Kakao).map_err(malformed),
            ProviderKind::Google => {
                serde_json::from_slice(body).map(Self::Google).map_err(malformed)
            }
            ProviderKind::Naver => {
                let envelope: NaverEnvelope = serde_json::from_slice(body).map_err(malformed)?;
                let code = envelope.resultcode.as_deref().unwrap_or_default();
                if code != "00" {
                    return Err(OAuthError::ProfileFetchFailed(format!(
                        "naver resultcode={code} message={}",
                        envelope.message.unwrap_or_default()
                    )));
                }
                envelope.response.map(Self::Naver).ok_or_else(|| {
                    OAuthError::ProfileFetchFailed("naver 资料响应缺少 response 字段".to_string())
                })
            }
        }
    }
}
