//! # 认证工具函数

use axum::http::HeaderMap;

/// 错误信息中保留的响应体长度
pub const MAX_BODY_EXCERPT_CHARS: usize = 200;

/// 认证工具类
pub struct AuthUtils;

impl AuthUtils {
    /// 脱敏令牌用于日志记录，格式: "eyJhbGci***Xb3kQ9w0"
    #[must_use]
    pub fn sanitize_token_for_logging(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() > 20 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 8..].iter().collect();
            format!("{head}***{tail}")
        } else if chars.len() > 8 {
            let head: String = chars[..4].iter().collect();
            format!("{head}***")
        } else {
            "***".to_string()
        }
    }

    /// 截取提供商响应体用于错误信息，最多保留 `MAX_BODY_EXCERPT_CHARS` 个字符
    #[must_use]
    pub fn body_excerpt(body: &str) -> String {
        let body = body.trim();
        match body.char_indices().nth(MAX_BODY_EXCERPT_CHARS) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        }
    }

    /// 读取非空请求头值（去除首尾空白）
    ///
    /// 昵称可能是 UTF-8 原文，所以不用只接受可见 ASCII 的 `to_str`。
    #[must_use]
    pub fn extract_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}
