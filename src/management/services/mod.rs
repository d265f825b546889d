//! # 业务服务层
//!
//! 处理器只负责解析请求，业务逻辑集中在这里。

pub mod login;
pub mod user;

pub use login::{CallbackParams, LoginService};
pub use user::user_from_headers;
