//! # 应用层
//!
//! 启动时构建、全程只读共享的依赖。

pub mod context;

pub use context::AppContext;
