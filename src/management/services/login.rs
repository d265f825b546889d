//! # 登录流程服务
//!
//! 所有提供商共用一条流水线，差异由 `ProviderKind` 与描述表决定：
//! 错误参数 / 缺少授权码直接失败；否则检查配置、换取令牌、拉取资料、
//! 规范化身份、签发会话令牌。每次调用恰好产生一个 `RedirectOutcome`。

use std::time::Duration;

use oauth2::AuthorizationCode;
use serde::Deserialize;

use crate::app::AppContext;
use crate::auth::identity::normalize;
use crate::auth::utils::AuthUtils;
use crate::error::{OAuthError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::management::redirect::{RedirectOutcome, error_codes};
use crate::provider::authorize::build_authorize_url;
use crate::provider::types::ProviderKind;
use crate::{ldebug, lerror, linfo, lwarn};

/// 回调参数（查询串，或 카카오 POST 请求体）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// 从 `application/x-www-form-urlencoded` 串解析；同名参数只取第一次出现的值
    #[must_use]
    pub fn from_urlencoded(input: &[u8]) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(input) {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// 查询串优先，缺失字段从请求体补齐
    #[must_use]
    pub fn merged_with(self, body: Self) -> Self {
        Self {
            code: non_blank(self.code).or_else(|| non_blank(body.code)),
            state: self.state.or(body.state),
            error: non_blank(self.error).or_else(|| non_blank(body.error)),
            error_description: self.error_description.or(body.error_description),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 登录流程服务
pub struct LoginService<'a> {
    context: &'a AppContext,
}

impl<'a> LoginService<'a> {
    #[must_use]
    pub const fn new(context: &'a AppContext) -> Self {
        Self { context }
    }

    /// 生成提供商授权地址
    pub fn authorization_url(&self, request_id: &str, kind: ProviderKind) -> Result<String> {
        let endpoints = self.context.endpoints(kind);
        let url = build_authorize_url(&endpoints)?;
        linfo!(
            request_id,
            LogStage::Authorization,
            LogComponent::Login,
            "authorize_url_built",
            "로그인 URL 생성",
            provider = kind
        );
        Ok(url)
    }

    /// 处理一次回调，返回唯一的重定向结果
    pub async fn handle_callback(
        &self,
        request_id: &str,
        kind: ProviderKind,
        params: CallbackParams,
    ) -> RedirectOutcome {
        if let Some(error) = non_blank(params.error) {
            lwarn!(
                request_id,
                LogStage::Callback,
                LogComponent::Login,
                "provider_error",
                "提供商返回错误",
                provider = kind,
                error = error
            );
            return RedirectOutcome::failure_with_description(error, params.error_description);
        }

        let Some(code) = non_blank(params.code) else {
            lwarn!(
                request_id,
                LogStage::Callback,
                LogComponent::Login,
                "missing_code",
                "回调缺少授权码",
                provider = kind
            );
            return RedirectOutcome::failure(error_codes::MISSING_CODE);
        };

        // 授权码只能用一次，前端地址缺失时不再消耗它
        if self.context.config.frontend.callback_url.trim().is_empty() {
            lerror!(
                request_id,
                LogStage::Callback,
                LogComponent::Login,
                "frontend_url_missing",
                "前端回调地址未配置，跳过令牌交换",
                provider = kind
            );
            return RedirectOutcome::failure(error_codes::FRONTEND_CALLBACK_URL_NOT_CONFIGURED);
        }

        match self
            .complete_login(request_id, kind, AuthorizationCode::new(code))
            .await
        {
            Ok(token) => RedirectOutcome::success(token),
            Err(e) => {
                lerror!(
                    request_id,
                    LogStage::Authentication,
                    LogComponent::Login,
                    "login_failed",
                    "登录失败",
                    provider = kind,
                    error = e
                );
                RedirectOutcome::failure(error_codes::LOGIN_FAILED)
            }
        }
    }

    async fn complete_login(
        &self,
        request_id: &str,
        kind: ProviderKind,
        code: AuthorizationCode,
    ) -> Result<String> {
        let endpoints = self.context.endpoints(kind);
        endpoints.ensure_complete()?;

        let deadline_secs = self.context.config.oauth.request_deadline_secs;
        let gateway = &self.context.oauth;

        let profile = tokio::time::timeout(Duration::from_secs(deadline_secs), async {
            ldebug!(
                request_id,
                LogStage::TokenExchange,
                LogComponent::OAuth,
                "exchange_start",
                "开始换取访问令牌",
                provider = kind
            );
            let token = gateway.exchange_code(&endpoints, &code).await?;

            ldebug!(
                request_id,
                LogStage::ProfileFetch,
                LogComponent::OAuth,
                "profile_fetch_start",
                "访问令牌已获取，开始拉取用户资料",
                provider = kind,
                access_token = AuthUtils::sanitize_token_for_logging(token.access_token.secret()),
                expires_in = token
                    .expires_in
                    .map_or_else(|| "-".to_string(), |secs| secs.to_string())
            );
            gateway.fetch_profile(&endpoints, &token.access_token).await
        })
        .await
        .map_err(|_| OAuthError::DeadlineExceeded(deadline_secs))??;

        let identity = normalize(&profile);
        let session_token = self.context.token_manager.mint(&identity)?;

        linfo!(
            request_id,
            LogStage::Authentication,
            LogComponent::Login,
            "login_succeeded",
            "登录成功",
            provider = kind,
            subject_id = identity.subject_id,
            session_token = AuthUtils::sanitize_token_for_logging(&session_token)
        );
        Ok(session_token)
    }
}
