//! # 回调重定向
//!
//! 登录结果只通过一次 302 交还给前端：成功带 `token`，失败带 `error`。
//! 每一步都有兜底地址，保证调用方总能收到某种响应。

use std::borrow::Cow;

use axum::http::{HeaderValue, StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::logging::{LogComponent, LogStage};
use crate::{lerror, linfo, lwarn};

/// 前端回调地址未配置时使用的默认地址
pub const DEFAULT_FRONTEND_CALLBACK_URL: &str = "http://localhost:3000/dashboard";

/// 拼出的地址不合法时的最终兜底
pub const INVALID_REDIRECT_FALLBACK_URL: &str =
    "http://localhost:3000/dashboard?error=redirect_url_invalid";

/// 发给前端的错误码
pub mod error_codes {
    pub const MISSING_CODE: &str = "missing_code";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const FRONTEND_CALLBACK_URL_NOT_CONFIGURED: &str = "FRONTEND_CALLBACK_URL_NOT_CONFIGURED";
    pub const REDIRECT_URL_INVALID: &str = "redirect_url_invalid";
    pub const PROVIDER_NOT_SUPPORTED: &str = "provider_not_supported";
}

/// 单次回调的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Success {
        token: String,
    },
    Failure {
        error_code: String,
        description: Option<String>,
    },
}

impl RedirectOutcome {
    #[must_use]
    pub fn success(token: impl Into<String>) -> Self {
        Self::Success {
            token: token.into(),
        }
    }

    #[must_use]
    pub fn failure(error_code: impl Into<String>) -> Self {
        Self::Failure {
            error_code: error_code.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn failure_with_description(
        error_code: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self::Failure {
            error_code: error_code.into(),
            description: description.filter(|d| !d.trim().is_empty()),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// 计算重定向地址（纯函数）
///
/// 基础地址已带查询串时以 `&` 追加参数。非 ASCII 字符按 URL 规则百分号编码，
/// 纯 ASCII 地址原样保留。
#[must_use]
pub fn build_redirect_url(frontend_base: &str, outcome: &RedirectOutcome) -> String {
    let trimmed = frontend_base.trim();
    let (base, outcome) = if trimmed.is_empty() {
        (
            DEFAULT_FRONTEND_CALLBACK_URL,
            Cow::Owned(RedirectOutcome::failure(
                error_codes::FRONTEND_CALLBACK_URL_NOT_CONFIGURED,
            )),
        )
    } else {
        (trimmed, Cow::Borrowed(outcome))
    };

    let query = match &*outcome {
        RedirectOutcome::Success { token } => format!("token={}", urlencoding::encode(token)),
        RedirectOutcome::Failure {
            error_code,
            description,
        } => {
            let mut query = format!("error={}", urlencoding::encode(error_code));
            if let Some(description) = description {
                query.push_str("&error_description=");
                query.push_str(&urlencoding::encode(description));
            }
            query
        }
    };

    let separator = if base.contains('?') { '&' } else { '?' };
    let candidate = format!("{base}{separator}{query}");

    match Url::parse(&candidate) {
        Ok(url) if url.has_host() => {
            if candidate.is_ascii() {
                candidate
            } else {
                url.into()
            }
        }
        _ => INVALID_REDIRECT_FALLBACK_URL.to_string(),
    }
}

/// 回调响应器
#[derive(Debug, Clone)]
pub struct CallbackResponder {
    frontend_callback_url: String,
}

impl CallbackResponder {
    #[must_use]
    pub fn new(frontend_callback_url: impl Into<String>) -> Self {
        Self {
            frontend_callback_url: frontend_callback_url.into(),
        }
    }

    /// 把结果转换为 302 响应；`Location` 无法构造时返回 500
    pub fn respond(&self, request_id: &str, outcome: &RedirectOutcome) -> Response {
        if self.frontend_callback_url.trim().is_empty() {
            lerror!(
                request_id,
                LogStage::Redirect,
                LogComponent::Responder,
                "frontend_url_missing",
                "前端回调地址未配置，使用默认地址"
            );
        }

        let location = build_redirect_url(&self.frontend_callback_url, outcome);
        if location == INVALID_REDIRECT_FALLBACK_URL {
            lwarn!(
                request_id,
                LogStage::Redirect,
                LogComponent::Responder,
                "redirect_url_invalid",
                "重定向地址不合法，使用兜底地址"
            );
        }

        match HeaderValue::from_str(&location) {
            Ok(value) => {
                linfo!(
                    request_id,
                    LogStage::Redirect,
                    LogComponent::Responder,
                    "redirect",
                    "回调重定向",
                    success = outcome.is_success()
                );
                (StatusCode::FOUND, [(LOCATION, value)]).into_response()
            }
            Err(e) => {
                lerror!(
                    request_id,
                    LogStage::Redirect,
                    LogComponent::Responder,
                    "location_header_invalid",
                    "无法构造 Location 头",
                    error = e
                );
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://app.example.com/login/callback";

    #[test]
    fn success_carries_encoded_token() {
        let url = build_redirect_url(BASE, &RedirectOutcome::success("a.b+c/d"));
        assert_eq!(url, "https://app.example.com/login/callback?token=a.b%2Bc%2Fd");
    }

    #[test]
    fn failure_with_description_uses_percent_twenty() {
        let outcome = RedirectOutcome::failure_with_description(
            "access_denied",
            Some("User cancelled".to_string()),
        );
        assert_eq!(
            build_redirect_url(BASE, &outcome),
            "https://app.example.com/login/callback?error=access_denied&error_description=User%20cancelled"
        );
    }

    #[test]
    fn blank_description_is_dropped() {
        let outcome = RedirectOutcome::failure_with_description("access_denied", Some(" ".into()));
        assert_eq!(
            build_redirect_url(BASE, &outcome),
            "https://app.example.com/login/callback?error=access_denied"
        );
    }

    #[test]
    fn blank_base_reports_missing_frontend_url() {
        let url = build_redirect_url("   ", &RedirectOutcome::success("token"));
        assert_eq!(
            url,
            "http://localhost:3000/dashboard?error=FRONTEND_CALLBACK_URL_NOT_CONFIGURED"
        );
    }

    #[test]
    fn base_with_query_appends_with_ampersand() {
        let url = build_redirect_url(
            "https://app.example.com/cb?lang=ko",
            &RedirectOutcome::failure(error_codes::MISSING_CODE),
        );
        assert_eq!(url, "https://app.example.com/cb?lang=ko&error=missing_code");
    }

    #[test]
    fn unparsable_base_falls_back() {
        let url = build_redirect_url("not a url", &RedirectOutcome::success("t"));
        assert_eq!(url, INVALID_REDIRECT_FALLBACK_URL);
    }

    #[test]
    fn building_is_idempotent() {
        let outcome = RedirectOutcome::success("eyJ.abc.def");
        assert_eq!(
            build_redirect_url(BASE, &outcome),
            build_redirect_url(BASE, &outcome)
        );
    }

    #[test]
    fn respond_returns_found_with_location() {
        let responder = CallbackResponder::new(BASE);
        let response = responder.respond("test", &RedirectOutcome::failure(error_codes::LOGIN_FAILED));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://app.example.com/login/callback?error=login_failed"
        );
    }

    #[test]
    fn non_ascii_base_is_percent_encoded() {
        let url = build_redirect_url(
            "https://app.example.com/로그인",
            &RedirectOutcome::failure(error_codes::MISSING_CODE),
        );
        assert_eq!(
            url,
            "https://app.example.com/%EB%A1%9C%EA%B7%B8%EC%9D%B8?error=missing_code"
        );
    }

    #[test]
    fn non_ascii_location_is_ascii_redirect() {
        let responder = CallbackResponder::new("http://localhost:3000/대시보드");
        let response = responder.respond("test", &RedirectOutcome::success("t"));
        assert_eq!(response.status(), StatusCode::FOUND);

        let location = response.headers()[LOCATION].as_bytes();
        assert!(location.is_ascii());
        assert_eq!(
            location,
            b"http://localhost:3000/%EB%8C%80%EC%8B%9C%EB%B3%B4%EB%93%9C?token=t"
        );
    }
}
