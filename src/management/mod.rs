//! # HTTP 接口模块
//!
//! 登录、回调、用户信息与登出接口，以及回调重定向。

pub mod handlers;
pub mod middleware;
pub mod redirect;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use redirect::{CallbackResponder, RedirectOutcome, build_redirect_url};
pub use routes::create_routes;
pub use server::{AppState, BrokerServer};
