//! # 身份规范化
//!
//! 把三家形状各异的资料映射为统一的 `(subject_id, nickname)`。

use sha2::{Digest, Sha256};

use crate::auth::types::{NormalizedIdentity, PLACEHOLDER_NICKNAME};
use crate::provider::profile::ProviderProfile;

/// 规范化提供商资料
#[must_use]
pub fn normalize(profile: &ProviderProfile) -> NormalizedIdentity {
    let kind = profile.kind();
    match profile {
        ProviderProfile::Kakao(p) => {
            let nickname = p
                .kakao_account
                .as_ref()
                .and_then(|account| account.profile.as_ref())
                .and_then(|profile| profile.nickname.as_deref());
            NormalizedIdentity::new(p.id, nickname_or_placeholder(nickname), kind)
        }
        ProviderProfile::Naver(p) => NormalizedIdentity::new(
            subject_id_from_str(&p.id),
            nickname_or_placeholder(p.nickname.as_deref().or(p.name.as_deref())),
            kind,
        ),
        ProviderProfile::Google(p) => NormalizedIdentity::new(
            subject_id_from_str(&p.id),
            nickname_or_placeholder(p.name.as_deref()),
            kind,
        ),
    }
}

/// 字符串ID转主体ID：能按 `i64` 解析则直接使用，否则取 SHA-256 前 8 字节（大端，清除符号位）。
#[must_use]
pub fn subject_id_from_str(provider_user_id: &str) -> i64 {
    provider_user_id
        .trim()
        .parse::<i64>()
        .unwrap_or_else(|_| hashed_subject_id(provider_user_id))
}

/// 非数字ID的确定性哈希
#[must_use]
pub fn hashed_subject_id(provider_user_id: &str) -> i64 {
    let digest = Sha256::digest(provider_user_id.as_bytes());
    let mut prefix = [0_u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(prefix) & i64::MAX
}

fn nickname_or_placeholder(nickname: Option<&str>) -> String {
    nickname
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(PLACEHOLDER_NICKNAME)
        .to_string()
}
