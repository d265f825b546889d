//! # Token交换逻辑
//!
//! 授权码换取提供商访问令牌。三家都走标准 form 表单 POST，
//! 差异只在是否携带 `client_secret`。

use oauth2::{AccessToken, AuthorizationCode};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::auth::utils::AuthUtils;
use crate::config::ProviderEndpoints;
use crate::error::{OAuthError, OAuthResult};
use crate::provider::types::ProviderKind;

/// 令牌响应结构（来自OAuth服务器的原始响应）
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    // 네이버 以字符串形式返回
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    expires_in: Option<i64>,
    // 错误响应字段
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// 换取成功后的提供商令牌
#[derive(Debug, Clone)]
pub struct ProviderTokenResponse {
    pub access_token: AccessToken,
    pub token_type: String,
    pub expires_in: Option<i64>,
}

/// Token交换客户端
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    http_client: reqwest::Client,
}

impl TokenExchangeClient {
    /// 基于共享的 HTTP 客户端创建
    #[must_use]
    pub const fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// 交换授权码获取访问令牌
    pub async fn exchange_code(
        &self,
        endpoints: &ProviderEndpoints,
        code: &AuthorizationCode,
    ) -> OAuthResult<ProviderTokenResponse> {
        let mut form_params: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("client_id", endpoints.client_id.as_str()),
            ("redirect_uri", endpoints.redirect_uri.as_str()),
            ("code", code.secret().as_str()),
        ];

        // 카카오 的密钥可选，未配置就不发
        if let Some(client_secret) = endpoints.secret_to_send() {
            form_params.push(("client_secret", client_secret));
        }

        let body = self
            .send_token_request(&endpoints.token_uri, &form_params)
            .await?;

        process_token_response(endpoints.kind, &body)
    }

    /// 发送令牌请求，返回成功响应的原始文本
    async fn send_token_request(
        &self,
        token_uri: &str,
        form_params: &[(&str, &str)],
    ) -> OAuthResult<String> {
        let response = self
            .http_client
            .post(token_uri)
            .header(ACCEPT, "application/json")
            .form(form_params)
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            OAuthError::TokenExchangeFailed(format!("Failed to read response text: {e}"))
        })?;

        if !status.is_success() {
            // 尝试解析错误响应
            if let Ok(error_response) = serde_json::from_str::<TokenResponse>(&text)
                && let Some(error) = error_response.error
            {
                return Err(OAuthError::TokenExchangeFailed(format!(
                    "HTTP {status} {error}: {}",
                    error_response.error_description.unwrap_or_default()
                )));
            }
            return Err(OAuthError::TokenExchangeFailed(format!(
                "HTTP {status}: {}",
                AuthUtils::body_excerpt(&text)
            )));
        }

        Ok(text)
    }
}

/// 解析 2xx 响应体；带 `error` 字段或缺少令牌同样视为失败
fn process_token_response(kind: ProviderKind, body: &str) -> OAuthResult<ProviderTokenResponse> {
    let response = serde_json::from_str::<TokenResponse>(body).map_err(|e| {
        OAuthError::TokenExchangeFailed(format!("Failed to parse {kind} token response: {e}"))
    })?;

    if let Some(error) = response.error {
        return Err(OAuthError::TokenExchangeFailed(format!(
            "{kind} returned {error}: {}",
            response.error_description.unwrap_or_default()
        )));
    }

    let access_token = response
        .access_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| {
            OAuthError::TokenExchangeFailed(format!("{kind} token response has no access_token"))
        })?;

    Ok(ProviderTokenResponse {
        access_token: AccessToken::new(access_token),
        token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
        expires_in: response.expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoints(kind: ProviderKind, token_uri: String, secret: Option<&str>) -> ProviderEndpoints {
        ProviderEndpoints {
            kind,
            authorization_uri: "https://example.com/authorize".to_string(),
            token_uri,
            user_info_uri: "https://example.com/me".to_string(),
            client_id: "client-1".to_string(),
            client_secret: secret.map(str::to_string),
            redirect_uri: "http://localhost:8080/oauth2/kakao/callback".to_string(),
        }
    }

    #[test]
    fn naver_string_expires_in_is_accepted() {
        let token = process_token_response(
            ProviderKind::Naver,
            r#"{"access_token":"AAAA","refresh_token":"r","token_type":"bearer","expires_in":"3600"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token.secret(), "AAAA");
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn numeric_expires_in_is_accepted() {
        let token = process_token_response(
            ProviderKind::Google,
            r#"{"access_token":"ya29","token_type":"Bearer","expires_in":3599,"scope":"openid"}"#,
        )
        .unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, Some(3599));
    }

    #[test]
    fn error_field_in_success_body_is_a_failure() {
        let err = process_token_response(
            ProviderKind::Naver,
            r#"{"error":"invalid_request","error_description":"no valid data in session key"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OAuthError::TokenExchangeFailed(msg) if msg.contains("invalid_request")));
    }

    #[test]
    fn missing_access_token_is_a_failure() {
        let err = process_token_response(ProviderKind::Kakao, r#"{"token_type":"bearer"}"#)
            .unwrap_err();
        assert!(matches!(err, OAuthError::TokenExchangeFailed(_)));
    }

    #[tokio::test]
    async fn kakao_without_secret_omits_client_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "kakao-access-token",
                "token_type": "bearer",
                "expires_in": 21599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new(reqwest::Client::new());
        let endpoints = endpoints(
            ProviderKind::Kakao,
            format!("{}/oauth/token", server.uri()),
            None,
        );
        let token = client
            .exchange_code(&endpoints, &AuthorizationCode::new("abc123".to_string()))
            .await
            .unwrap();
        assert_eq!(token.access_token.secret(), "kakao-access-token");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(!body.contains("client_secret"));
        assert!(body.contains("client_id=client-1"));
    }

    #[tokio::test]
    async fn configured_secret_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("client_secret=s3cret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "t", "expires_in": "3600"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new(reqwest::Client::new());
        let endpoints = endpoints(ProviderKind::Naver, server.uri(), Some("s3cret"));
        let token = client
            .exchange_code(&endpoints, &AuthorizationCode::new("c".to_string()))
            .await
            .unwrap();
        assert_eq!(token.expires_in, Some(3600));
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "authorization code not found"
            })))
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new(reqwest::Client::new());
        let endpoints = endpoints(ProviderKind::Kakao, server.uri(), None);
        let err = client
            .exchange_code(&endpoints, &AuthorizationCode::new("bad".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, OAuthError::TokenExchangeFailed(msg) if msg.contains("invalid_grant")));
    }

    #[tokio::test]
    async fn long_error_body_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>".repeat(500)))
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new(reqwest::Client::new());
        let endpoints = endpoints(ProviderKind::Naver, server.uri(), Some("s"));
        let err = client
            .exchange_code(&endpoints, &AuthorizationCode::new("c".to_string()))
            .await
            .unwrap_err();
        let OAuthError::TokenExchangeFailed(msg) = err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(msg.starts_with("HTTP 502 Bad Gateway: <html>"));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300);
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_is_a_failure() {
        let client = TokenExchangeClient::new(reqwest::Client::new());
        // 端口 9 (discard) 上没有监听者
        let endpoints = endpoints(ProviderKind::Google, "http://127.0.0.1:9/token".to_string(), Some("s"));
        let err = client
            .exchange_code(&endpoints, &AuthorizationCode::new("c".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, OAuthError::TokenExchangeFailed(_)));
    }
}
