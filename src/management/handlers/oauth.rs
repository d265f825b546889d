//! # 第三方登录处理器
//!
//! 解析请求并委托 `LoginService` 执行业务逻辑。回调类接口无论成败都以重定向结束。

use axum::body::Bytes;
use axum::extract::{Extension, Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use crate::error::BrokerError;
use crate::logging::{LogComponent, LogStage};
use crate::management::middleware::RequestId;
use crate::management::redirect::{RedirectOutcome, error_codes};
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::{CallbackParams, LoginService, user_from_headers};
use crate::provider::registry::descriptor;
use crate::provider::types::ProviderKind;
use crate::{lwarn, linfo};

/// 生成授权地址
pub async fn login(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(provider): Path<String>,
) -> Response {
    let result = ProviderKind::parse(&provider)
        .map_err(BrokerError::from)
        .and_then(|kind| LoginService::new(&state).authorization_url(&request_id, kind));

    match result {
        Ok(auth_url) => response::login_success(auth_url),
        Err(err) => {
            err.log();
            response::login_error(&err)
        }
    }
}

/// GET 回调：`/auth/{provider}/callback` 与 `/oauth2/{provider}/callback`
pub async fn callback(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let Ok(kind) = ProviderKind::parse(&provider) else {
        return unsupported_provider(&state, &request_id, &provider);
    };

    let outcome = LoginService::new(&state)
        .handle_callback(&request_id, kind, query_params(query.as_deref()))
        .await;
    state.responder.respond(&request_id, &outcome)
}

/// POST 回调，仅 카카오 使用；授权码可来自 JSON 或表单请求体
pub async fn post_callback(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Ok(kind) = ProviderKind::parse(&provider) else {
        return unsupported_provider(&state, &request_id, &provider);
    };
    if !descriptor(kind).accepts_post_callback {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let params = query_params(query.as_deref())
        .merged_with(parse_callback_body(&request_id, &headers, &body));
    let outcome = LoginService::new(&state)
        .handle_callback(&request_id, kind, params)
        .await;
    state.responder.respond(&request_id, &outcome)
}

/// 读取网关注入的身份
pub async fn user(
    Extension(request_id): Extension<RequestId>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> Response {
    let result = ProviderKind::parse(&provider)
        .map_err(BrokerError::from)
        .and_then(|kind| user_from_headers(kind, &headers));

    match result {
        Ok(user) => response::user_success(user),
        Err(err) => {
            lwarn!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "user_headers_rejected",
                "身份请求头无效",
                error = err
            );
            response::user_error(&err)
        }
    }
}

/// 无状态登出，令牌由前端丢弃
pub async fn logout(
    Extension(request_id): Extension<RequestId>,
    Path(provider): Path<String>,
) -> Response {
    match ProviderKind::parse(&provider) {
        Ok(kind) => {
            linfo!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "logout",
                "用户登出",
                provider = kind
            );
            response::success_without_data(response::LOGOUT_SUCCEEDED)
        }
        Err(err) => response::app_error(&err.into()),
    }
}

fn unsupported_provider(state: &AppState, request_id: &str, provider: &str) -> Response {
    lwarn!(
        request_id,
        LogStage::Callback,
        LogComponent::Login,
        "provider_not_supported",
        "不支持的提供商",
        provider = provider
    );
    state.responder.respond(
        request_id,
        &RedirectOutcome::failure(error_codes::PROVIDER_NOT_SUPPORTED),
    )
}

/// 解析 POST 请求体中的回调参数；无法解析时视为空
fn parse_callback_body(request_id: &str, headers: &HeaderMap, body: &[u8]) -> CallbackParams {
    if body.is_empty() {
        return CallbackParams::default();
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        return serde_json::from_slice(body).unwrap_or_else(|e| {
            lwarn!(
                request_id,
                LogStage::Callback,
                LogComponent::Login,
                "callback_body_invalid",
                "回调请求体不是合法 JSON",
                error = e
            );
            CallbackParams::default()
        });
    }

    CallbackParams::from_urlencoded(body)
}

/// 查询串手工解析，重复参数不会让提取器直接返回 400
fn query_params(query: Option<&str>) -> CallbackParams {
    query
        .map(|query| CallbackParams::from_urlencoded(query.as_bytes()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_json_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let params = parse_callback_body("t", &headers, br#"{"code":"json-code"}"#);
        assert_eq!(params.code.as_deref(), Some("json-code"));
    }

    #[test]
    fn parses_form_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let params = parse_callback_body("t", &headers, b"code=form%20code&extra=1");
        assert_eq!(params.code.as_deref(), Some("form code"));
    }

    #[test]
    fn missing_query_is_empty() {
        assert!(query_params(None).code.is_none());
        assert_eq!(query_params(Some("code=a&code=b")).code.as_deref(), Some("a"));
    }

    #[test]
    fn invalid_json_body_is_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let params = parse_callback_body("t", &headers, b"{not json");
        assert!(params.code.is_none());
    }
}
