//! # 认证类型定义
//!
//! 规范化身份与会话令牌载荷

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::types::ProviderKind;

/// 会话令牌签发者
pub const SESSION_ISSUER: &str = "auth-broker";

/// 昵称缺失时使用的占位昵称
pub const PLACEHOLDER_NICKNAME: &str = "사용자";

/// 规范化后的内部身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIdentity {
    /// 内部主体ID，同一提供商账号恒定
    pub subject_id: i64,
    /// 昵称
    pub nickname: String,
    /// 来源提供商
    pub provider: ProviderKind,
}

impl NormalizedIdentity {
    #[must_use]
    pub fn new(subject_id: i64, nickname: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            subject_id,
            nickname: nickname.into(),
            provider,
        }
    }
}

/// 会话令牌载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 主体ID（字符串形式）
    pub sub: String,
    /// 昵称
    pub nickname: String,
    /// 来源提供商
    pub provider: ProviderKind,
    /// 提供商侧数字ID，网关据此注入 `X-{P}-Id`
    #[serde(rename = "providerId")]
    pub provider_id: i64,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl SessionClaims {
    /// 以给定签发时间构建载荷，`exp = iat + ttl`
    #[must_use]
    pub fn new(identity: &NormalizedIdentity, issued_at: DateTime<Utc>, ttl_seconds: i64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: identity.subject_id.to_string(),
            nickname: identity.nickname.clone(),
            provider: identity.provider,
            provider_id: identity.subject_id,
            iat,
            exp: iat + ttl_seconds,
            iss: SESSION_ISSUER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn claims_expire_after_ttl() {
        let identity = NormalizedIdentity::new(123, "Alice", ProviderKind::Google);
        let issued_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let claims = SessionClaims::new(&identity, issued_at, 86_400);

        assert_eq!(claims.sub, "123");
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(claims.provider_id, 123);
    }

    #[test]
    fn claims_serialize_provider_fields() {
        let identity = NormalizedIdentity::new(987_654_321, "n", ProviderKind::Naver);
        let claims = SessionClaims::new(&identity, Utc::now(), 60);
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["provider"], "naver");
        assert_eq!(value["providerId"], 987_654_321_i64);
    }
}
