//! # 登录 / 用户信息 / 登出接口测试

use std::sync::Arc;

use auth_broker::{
    app::AppContext,
    config::AppConfig,
    management::{
        middleware::request_id::REQUEST_ID_HEADER,
        server::{AppState, create_router},
    },
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

fn app_config() -> AppConfig {
    let mut config = AppConfig::with_secret("integration-test-secret-0123456789abcdef");
    config.frontend.callback_url = "https://app.example.com/cb".to_string();
    config.providers.google.client_id = "google-client".to_string();
    config.providers.google.client_secret = Some("google-secret".to_string());
    config.providers.google.redirect_uri = "http://localhost:8080/auth/google/callback".to_string();
    config
}

fn router(config: AppConfig) -> Router {
    let server_config = config.server.clone();
    let context = AppContext::from_config(Arc::new(config)).unwrap();
    create_router(AppState::new(Arc::new(context)), &server_config)
}

async fn send(request: Request<Body>) -> Response {
    router(app_config()).oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn login_returns_authorization_url() {
    let response = send(
        Request::post("/auth/google/login")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "로그인 URL 생성 성공");
    let auth_url = body["authUrl"].as_str().unwrap();
    assert!(auth_url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?client_id=google-client"));
    assert!(auth_url.contains(
        "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"
    ));
    assert!(auth_url.contains("scope=openid%20profile%20email"));
    assert!(!auth_url.contains("state="));
}

#[tokio::test]
async fn login_without_credentials_is_a_server_error() {
    let response = send(Request::post("/auth/kakao/login").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["authUrl"], Value::Null);
}

#[tokio::test]
async fn login_for_unknown_provider_is_not_found() {
    let response = send(Request::post("/auth/github/login").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn user_echoes_gateway_headers() {
    let response = send(
        Request::get("/auth/kakao/user")
            .header("X-User-Id", "123")
            .header("X-User-Nickname", "Alice")
            .header("X-Kakao-Id", "987654321")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["message"], "사용자 정보 조회 성공");
    assert_eq!(body["user"]["id"], "123");
    assert_eq!(body["user"]["providerId"], 987_654_321_i64);
    assert_eq!(body["user"]["nickname"], "Alice");
}

#[tokio::test]
async fn user_without_headers_is_a_bad_request() {
    let response = send(Request::get("/auth/naver/user").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["user"], Value::Null);
}

#[tokio::test]
async fn logout_is_stateless() {
    let response = send(Request::get("/auth/naver/logout").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "로그아웃 성공");
}

#[tokio::test]
async fn ping_returns_pong_with_request_id() {
    let response = send(Request::get("/ping").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"pong");
}
