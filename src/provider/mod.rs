//! Provider capability module。
//!
//! - `types`：提供商标识
//! - `registry`：各提供商的静态描述（默认端点、scope、state、密钥策略）
//! - `authorize`：构建授权 URL
//! - `profile`：三家资料接口的原始响应结构

pub mod authorize;
pub mod profile;
pub mod registry;
pub mod types;

pub use authorize::build_authorize_url;
pub use profile::ProviderProfile;
pub use registry::{ProviderDescriptor, SecretPolicy, descriptor, get_provider_by_name};
pub use types::ProviderKind;
