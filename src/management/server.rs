//! # HTTP 服务器
//!
//! Axum HTTP服务器，承载登录与回调接口

use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::error::{BrokerError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::management::handlers::system;
use crate::management::middleware::request_id_middleware;
use crate::{linfo, lwarn};

/// 服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 登录代理服务器
pub struct BrokerServer {
    config: ServerConfig,
    router: Router,
}

impl BrokerServer {
    /// 创建新的服务器
    #[must_use]
    pub fn new(context: Arc<AppContext>) -> Self {
        let config = context.config.server.clone();
        let router = create_router(AppState::new(context), &config);
        Self { config, router }
    }

    /// 启动服务器，收到 Ctrl-C 后优雅退出
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("Starting auth broker on {addr}")
        );

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            BrokerError::server_start_with_source(format!("Failed to bind {addr}"), e)
        })?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| BrokerError::network_with_source("HTTP server error", e))?;

        Ok(())
    }

    /// 获取绑定地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let host = self.config.host.as_str();
        let ip = host.parse::<std::net::IpAddr>().map_err(|e| {
            BrokerError::config_with_source(format!("Invalid bind address '{host}'"), e)
        })?;
        Ok(SocketAddr::new(ip, self.config.port))
    }
}

/// 创建路由器（集成测试直接使用）
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = super::routes::create_routes(state)
        .route("/ping", get(system::ping_handler))
        .route("/", get(system::root_handler));

    let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    // 配置CORS
    if config.enable_cors {
        app = app.layer(service_builder.layer(cors_layer(&config.cors_origins)));
    } else {
        app = app.layer(service_builder);
    }

    app.layer(axum::middleware::from_fn(request_id_middleware))
}

fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ]);

    // 配置允许的源
    if cors_origins.iter().any(|origin| origin == "*") {
        return cors_layer.allow_origin(Any);
    }

    let origins = cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>();

    match origins {
        Ok(origins) => cors_layer.allow_origin(origins),
        Err(e) => {
            lwarn!(
                "system",
                LogStage::Startup,
                LogComponent::ServerSetup,
                "cors_config_fail",
                &format!("Invalid CORS origin configuration: {e}, falling back to allow any")
            );
            cors_layer.allow_origin(Any)
        }
    }
}

async fn shutdown_signal() {
    // 等待 Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::ServerSetup,
        "shutdown_signal",
        "收到关闭信号"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn invalid_host_is_a_config_error() {
        let mut config = AppConfig::with_secret("0123456789abcdef0123456789abcdef");
        config.server.host = "localhost:nope".to_string();
        let context = Arc::new(AppContext::from_config(Arc::new(config)).unwrap());

        let err = BrokerServer::new(context).bind_address().unwrap_err();
        assert!(matches!(err, BrokerError::Config { .. }));
    }

    #[test]
    fn bind_address_uses_server_section() {
        let config = AppConfig::with_secret("0123456789abcdef0123456789abcdef");
        let context = Arc::new(AppContext::from_config(Arc::new(config)).unwrap());

        let addr = BrokerServer::new(context).bind_address().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }
}
