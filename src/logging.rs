//! # 日志配置模块
//!
//! 初始化 tracing 订阅器，并提供带阶段/组件字段的结构化日志宏
//! (`ldebug!` / `linfo!` / `lwarn!` / `lerror!`)。

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 请求处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 服务启动
    Startup,
    /// 服务关闭
    Shutdown,
    /// 配置加载
    Configuration,
    /// 构建授权地址
    Authorization,
    /// 处理第三方回调
    Callback,
    /// 授权码换取令牌
    TokenExchange,
    /// 拉取用户资料
    ProfileFetch,
    /// 身份规范化与会话令牌签发
    Authentication,
    /// 重定向响应
    Redirect,
    /// 内部错误
    Internal,
}

impl LogStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::Authorization => "authorization",
            Self::Callback => "callback",
            Self::TokenExchange => "token_exchange",
            Self::ProfileFetch => "profile_fetch",
            Self::Authentication => "authentication",
            Self::Redirect => "redirect",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 日志来源组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 主程序
    Main,
    /// 配置管理
    Config,
    /// HTTP 服务器装配
    ServerSetup,
    /// OAuth 第三方交互
    OAuth,
    /// 登录流程编排
    Login,
    /// 回调重定向
    Responder,
    /// 请求头身份透传
    Auth,
}

impl LogComponent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::ServerSetup => "server_setup",
            Self::OAuth => "oauth",
            Self::Login => "login",
            Self::Responder => "responder",
            Self::Auth => "auth",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_event {
    ($level:expr, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        ::tracing::event!(
            $level,
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($key = %$value,)*
            "{}",
            $message
        )
    };
}

/// 调试级别结构化日志
#[macro_export]
macro_rules! ldebug {
    ($($arg:tt)+) => {
        $crate::__log_event!(::tracing::Level::DEBUG, $($arg)+)
    };
}

/// 信息级别结构化日志
#[macro_export]
macro_rules! linfo {
    ($($arg:tt)+) => {
        $crate::__log_event!(::tracing::Level::INFO, $($arg)+)
    };
}

/// 警告级别结构化日志（预期内的失败，例如用户取消授权）
#[macro_export]
macro_rules! lwarn {
    ($($arg:tt)+) => {
        $crate::__log_event!(::tracing::Level::WARN, $($arg)+)
    };
}

/// 错误级别结构化日志（网络、解析、签名等非预期失败）
#[macro_export]
macro_rules! lerror {
    ($($arg:tt)+) => {
        $crate::__log_event!(::tracing::Level::ERROR, $($arg)+)
    };
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先；否则使用 `{level},auth_broker=debug`。
pub fn init_optimized_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", std::string::String::as_str);
    let default_filter = format!("{level},auth_broker=debug,hyper=warn,reqwest=warn");

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    // 测试中可能重复初始化，忽略二次注册失败
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// 环境变量设置指南
pub fn print_logging_help() {
    println!("📋 日志配置指南:");
    println!("  RUST_LOG=info                      # 标准日志级别");
    println!("  RUST_LOG=debug                     # 调试级别");
    println!("  RUST_LOG=auth_broker=trace         # 应用详细追踪");
    println!("  RUST_LOG=info,reqwest=debug        # 查看第三方请求细节");
}
