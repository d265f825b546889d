//! # 登录提供商描述表
//!
//! 每个提供商的固定差异（默认端点、scope、state、密钥策略、回调方式）集中在这里，
//! 登录流程只按描述表分派，不再为每家写一套控制器。

use crate::error::Result;

use super::types::ProviderKind;

/// `client_secret` 在换取令牌时的携带策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretPolicy {
    /// 必须配置并总是发送
    Required,
    /// 配置了且非空才发送
    Optional,
}

/// 单个提供商的静态描述
#[derive(Debug)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    /// 面向用户的名称
    pub display_name: &'static str,
    pub default_authorization_uri: &'static str,
    pub default_token_uri: &'static str,
    pub default_user_info_uri: &'static str,
    /// 授权地址中携带的 scope，空表示不发送
    pub scopes: &'static [&'static str],
    /// 授权地址中携带的固定 state。未与会话绑定，也不在回调中校验。
    pub fixed_state: Option<&'static str>,
    pub secret_policy: SecretPolicy,
    /// 共享回调路径是否接受 POST（授权码在请求体中）
    pub accepts_post_callback: bool,
    /// 网关透传的提供商数字 ID 请求头
    pub provider_id_header: &'static str,
}

static KAKAO: ProviderDescriptor = ProviderDescriptor {
    kind: ProviderKind::Kakao,
    display_name: "카카오",
    default_authorization_uri: "https://kauth.kakao.com/oauth/authorize",
    default_token_uri: "https://kauth.kakao.com/oauth/token",
    default_user_info_uri: "https://kapi.kakao.com/v2/user/me",
    scopes: &[],
    fixed_state: None,
    secret_policy: SecretPolicy::Optional,
    accepts_post_callback: true,
    provider_id_header: "x-kakao-id",
};

static NAVER: ProviderDescriptor = ProviderDescriptor {
    kind: ProviderKind::Naver,
    display_name: "네이버",
    default_authorization_uri: "https://nid.naver.com/oauth2.0/authorize",
    default_token_uri: "https://nid.naver.com/oauth2.0/token",
    default_user_info_uri: "https://openapi.naver.com/v1/nid/me",
    scopes: &[],
    fixed_state: Some("STATE"),
    secret_policy: SecretPolicy::Required,
    accepts_post_callback: false,
    provider_id_header: "x-naver-id",
};

static GOOGLE: ProviderDescriptor = ProviderDescriptor {
    kind: ProviderKind::Google,
    display_name: "구글",
    default_authorization_uri: "https://accounts.google.com/o/oauth2/v2/auth",
    default_token_uri: "https://oauth2.googleapis.com/token",
    default_user_info_uri: "https://www.googleapis.com/oauth2/v2/userinfo",
    scopes: &["openid", "profile", "email"],
    fixed_state: None,
    secret_policy: SecretPolicy::Required,
    accepts_post_callback: false,
    provider_id_header: "x-google-id",
};

/// 取得提供商描述
#[must_use]
pub fn descriptor(kind: ProviderKind) -> &'static ProviderDescriptor {
    match kind {
        ProviderKind::Kakao => &KAKAO,
        ProviderKind::Naver => &NAVER,
        ProviderKind::Google => &GOOGLE,
    }
}

/// 按路径中的提供商名称解析描述
pub fn get_provider_by_name(provider_name: &str) -> Result<&'static ProviderDescriptor> {
    let kind = ProviderKind::parse(provider_name)?;
    Ok(descriptor(kind))
}
