//! # API 响应结构
//!
//! 登录、用户信息、登出三个 JSON 接口的响应格式。字段名沿用前端约定的 camelCase。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

pub const LOGIN_URL_CREATED: &str = "로그인 URL 생성 성공";
pub const USER_INFO_FOUND: &str = "사용자 정보 조회 성공";
pub const LOGOUT_SUCCEEDED: &str = "로그아웃 성공";

/// # 登录地址响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub auth_url: Option<String>,
}

/// # 用户信息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub success: bool,
    pub message: String,
    pub user: Option<UserData>,
}

/// 网关注入的身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<i64>,
    pub nickname: String,
}

/// # 通用消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// # 便捷函数：登录地址生成成功
pub fn login_success(auth_url: String) -> Response {
    (
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: LOGIN_URL_CREATED.to_string(),
            auth_url: Some(auth_url),
        }),
    )
        .into_response()
}

/// # 便捷函数：登录地址生成失败，状态码取自错误类型
pub fn login_error(error: &BrokerError) -> Response {
    let (status, _) = error.to_http_response_parts();
    (
        status,
        Json(LoginResponse {
            success: false,
            message: error.to_string(),
            auth_url: None,
        }),
    )
        .into_response()
}

/// # 便捷函数：用户信息
pub fn user_success(user: UserData) -> Response {
    (
        StatusCode::OK,
        Json(UserInfoResponse {
            success: true,
            message: USER_INFO_FOUND.to_string(),
            user: Some(user),
        }),
    )
        .into_response()
}

/// # 便捷函数：用户信息错误
pub fn user_error(error: &BrokerError) -> Response {
    let (status, _) = error.to_http_response_parts();
    (
        status,
        Json(UserInfoResponse {
            success: false,
            message: error.to_string(),
            user: None,
        }),
    )
        .into_response()
}

/// # 便捷函数：无数据体的成功响应
pub fn success_without_data(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            success: true,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// # 便捷函数：按错误类型返回消息响应
pub fn app_error(error: &BrokerError) -> Response {
    let (status, _) = error.to_http_response_parts();
    (
        status,
        Json(MessageResponse {
            success: false,
            message: error.to_string(),
        }),
    )
        .into_response()
}
