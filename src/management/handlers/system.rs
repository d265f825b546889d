//! # 系统信息处理器

use axum::Json;
use serde::Serialize;

use crate::provider::registry::descriptor;
use crate::provider::types::ProviderKind;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub providers: Vec<ProviderInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: &'static str,
    pub display_name: &'static str,
}

/// Ping 处理器
pub async fn ping_handler() -> &'static str {
    "pong"
}

/// 根路径：服务名称、版本与支持的提供商
pub async fn root_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        providers: ProviderKind::ALL
            .iter()
            .map(|&kind| ProviderInfo {
                name: kind.as_str(),
                display_name: descriptor(kind).display_name,
            })
            .collect(),
    })
}
