//! # 路由配置
//!
//! `{provider}` 路径段在处理器内解析，未知提供商由处理器统一应答。

use axum::Router;
use axum::routing::{get, post};

use crate::management::handlers::oauth;
use crate::management::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 前端直接调用的登录接口
        .nest("/auth", auth_routes())
        // 提供商控制台登记的共享回调
        .nest("/oauth2", oauth2_routes())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/{provider}/login", post(oauth::login))
        .route("/{provider}/callback", get(oauth::callback))
        .route("/{provider}/user", get(oauth::user))
        .route("/{provider}/logout", get(oauth::logout))
}

fn oauth2_routes() -> Router<AppState> {
    Router::new().route(
        "/{provider}/callback",
        get(oauth::callback).post(oauth::post_callback),
    )
}
