//! # 请求头身份
//!
//! `/user` 接口信任上游网关已完成令牌校验，只读取它注入的请求头，不做二次验证。

use axum::http::HeaderMap;

use crate::auth::utils::AuthUtils;
use crate::error::{BrokerError, Result};
use crate::management::response::UserData;
use crate::provider::registry::descriptor;
use crate::provider::types::ProviderKind;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NICKNAME_HEADER: &str = "x-user-nickname";

/// 从网关注入的请求头读取身份
pub fn user_from_headers(kind: ProviderKind, headers: &HeaderMap) -> Result<UserData> {
    let id = AuthUtils::extract_header_value(headers, USER_ID_HEADER)
        .ok_or_else(|| BrokerError::validation("X-User-Id 헤더가 없습니다", Some("X-User-Id")))?;
    let nickname = AuthUtils::extract_header_value(headers, USER_NICKNAME_HEADER).ok_or_else(
        || BrokerError::validation("X-User-Nickname 헤더가 없습니다", Some("X-User-Nickname")),
    )?;

    let provider_header = descriptor(kind).provider_id_header;
    let provider_id = AuthUtils::extract_header_value(headers, provider_header)
        .map(|value| {
            value.parse::<i64>().map_err(|_| {
                BrokerError::validation(
                    format!("{provider_header} 헤더는 숫자여야 합니다"),
                    Some(provider_header),
                )
            })
        })
        .transpose()?;

    Ok(UserData {
        id,
        provider_id,
        nickname,
    })
}
