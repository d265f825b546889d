//! # 请求处理器

pub mod oauth;
pub mod system;
